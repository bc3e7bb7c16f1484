// セッション全体のエンドツーエンドテスト（実際のJPEGエンコードを使用）
use crate::fixtures::*;
use image_squeeze::{
    codec::jpeg::JpegCodec,
    core::{CompressionOutcome, CompressionState, CompressorConfig, UploadCandidate},
    download::MemoryDownloadSink,
    notify::{MemoryNotifier, Notification},
    utils::format::{encoded_size_from_payload, format_size},
    view::{COMPRESSING_LABEL, PENDING_LABEL},
    CompressorApp, UploadSurface,
};
use std::sync::Arc;

type Session = CompressorApp<JpegCodec, MemoryNotifier, MemoryDownloadSink>;

fn session() -> Session {
    CompressorApp::new(
        JpegCodec::new(),
        MemoryNotifier::new(),
        MemoryDownloadSink::new(),
        CompressorConfig::default(),
    )
}

#[test]
fn test_duplicate_upload_creates_single_record() {
    let app = session();
    let bytes = gradient_png(16, 16);

    app.upload(vec![UploadCandidate::new("same.png", "image/png", bytes.clone())]);
    let report = app.upload(vec![UploadCandidate::new("same.png", "image/png", bytes)]);

    assert!(report.added.is_empty());
    assert_eq!(report.duplicates, vec!["same.png"]);
    assert_eq!(app.store().len(), 1);
    assert_eq!(
        app.notifier().last(),
        Some(Notification::DuplicateUpload {
            file_name: "same.png".to_string()
        })
    );
}

#[tokio::test]
async fn test_compressed_size_matches_payload() {
    let app = session();
    let id = app.upload(vec![png_candidate("photo.png", 64, 48)]).added[0];

    let outcome = app.compress_one(id).await.unwrap();

    let record = app.store().get(id).unwrap();
    let compressed = record.compressed.clone().unwrap();
    assert!(record.compressed_size > 0);
    assert_eq!(record.compressed_size as usize, compressed.len());
    assert_eq!(record.state(), CompressionState::Compressed(compressed.len() as u64));
    assert!(matches!(outcome, CompressionOutcome::Compressed { compressed_size, .. } if compressed_size == compressed.len() as u64));
    // JPEGのSOIマーカー
    assert_eq!(&compressed[..2], &[0xFF, 0xD8]);

    let preview = app.compressed_preview(id).unwrap();
    assert_eq!(encoded_size_from_payload(&preview), compressed.len() as u64);

    let view = &app.views()[0];
    assert_eq!(view.compressed_size_label, format_size(compressed.len() as u64));
    assert!(view.ratio_label.is_some());
    assert!(view.download_enabled);
}

#[tokio::test]
async fn test_lower_quality_produces_smaller_output() {
    let app = session();
    let id = app.upload(vec![png_candidate("photo.png", 128, 128)]).added[0];

    app.set_quality(id, 95).unwrap();
    app.compress_one(id).await.unwrap();
    let high = app.store().get(id).unwrap().compressed_size;

    app.set_quality(id, 10).unwrap();
    app.compress_one(id).await.unwrap();
    let low = app.store().get(id).unwrap().compressed_size;

    assert!(low > 0);
    assert!(low < high, "quality 10 ({low}) should be smaller than 95 ({high})");
}

#[tokio::test]
async fn test_download_uses_prefixed_name() {
    let app = session();
    let id = app.upload(vec![png_candidate("cat.png", 20, 20)]).added[0];
    app.compress_one(id).await.unwrap();

    app.download_one(id).await.unwrap();

    let saved = app.sink().get("compressed-cat.png").unwrap();
    let record = app.store().get(id).unwrap();
    assert_eq!(saved.len() as i64, record.compressed_size);
}

#[tokio::test]
async fn test_deleting_only_record_resets_session() {
    let app = session();
    let id = app.upload(vec![png_candidate("only.png", 8, 8)]).added[0];
    assert!(app.upload_surface().preview_visible);

    app.remove(id).unwrap();

    assert!(app.store().is_empty());
    assert_eq!(app.upload_surface(), UploadSurface::default());

    // リセット後も同じファイルを再アップロードできる
    let report = app.upload(vec![png_candidate("only.png", 8, 8)]);
    assert_eq!(report.added.len(), 1);
}

#[tokio::test]
async fn test_record_deleted_while_compressing_stays_deleted() {
    let codec = GatedCodec::new();
    let app = Arc::new(CompressorApp::new(
        codec.clone(),
        MemoryNotifier::new(),
        MemoryDownloadSink::new(),
        CompressorConfig::default(),
    ));
    let id = app.upload(vec![png_candidate("gone.png", 16, 16)]).added[0];

    let task = tokio::spawn({
        let app = Arc::clone(&app);
        async move { app.compress_one(id).await }
    });

    codec.wait_started().await;
    let view = &app.views()[0];
    assert_eq!(view.compressed_size_label, COMPRESSING_LABEL);
    assert!(!view.compress_enabled);

    app.remove(id).unwrap();
    codec.release();

    let outcome = task.await.unwrap().unwrap();
    assert!(matches!(outcome, CompressionOutcome::Discarded { .. }));
    assert!(app.store().get(id).is_none());
    assert!(app.store().is_empty());
    assert!(app.notifier().received().is_empty());
}

#[tokio::test]
async fn test_quality_change_does_not_trigger_compression() {
    let app = session();
    let id = app.upload(vec![png_candidate("a.png", 8, 8)]).added[0];

    app.set_quality(id, 35).unwrap();

    let record = app.store().get(id).unwrap();
    assert_eq!(record.quality, 35);
    assert_eq!(record.compressed_size, 0);
    assert_eq!(app.views()[0].compressed_size_label, PENDING_LABEL);
}
