// 一括圧縮・一括エクスポートの統合テスト
use crate::fixtures::*;
use image_squeeze::{
    archive::{MockArchiveWriter, ZipArchiveWriter},
    batch::{BatchControl, BatchOrchestrator},
    codec::jpeg::JpegCodec,
    compressor::Compressor,
    core::{CompressorConfig, CompressorError},
    download::MemoryDownloadSink,
    notify::{MemoryNotifier, Notification},
    store::ImageStore,
    CompressorApp,
};
use std::io::{Cursor, Read};
use std::sync::Arc;

fn session() -> CompressorApp<JpegCodec, MemoryNotifier, MemoryDownloadSink> {
    CompressorApp::new(
        JpegCodec::new(),
        MemoryNotifier::new(),
        MemoryDownloadSink::new(),
        CompressorConfig::default(),
    )
}

fn archive_files(bytes: Vec<u8>) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut files = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        if entry.is_dir() {
            continue;
        }
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        files.push((entry.name().to_string(), data));
    }
    files
}

#[tokio::test]
async fn test_compress_all_skips_failed_records() {
    let app = session();
    let ids = app
        .upload(vec![
            png_candidate("first.png", 32, 32),
            broken_candidate("broken.png"),
            png_candidate("third.png", 24, 24),
        ])
        .added;
    app.compress_one(ids[1]).await.unwrap();
    assert_eq!(app.store().get(ids[1]).unwrap().compressed_size, -1);

    let summary = app.compress_all().await;

    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert!(app.store().get(ids[0]).unwrap().compressed_size > 0);
    assert!(app.store().get(ids[2]).unwrap().compressed_size > 0);
    assert_eq!(app.store().get(ids[1]).unwrap().compressed_size, -1);
    assert_eq!(
        app.notifier().last(),
        Some(Notification::BatchComplete {
            succeeded: 2,
            failed: 0
        })
    );
    assert!(app.is_available(BatchControl::CompressAll));
}

#[tokio::test]
async fn test_compress_all_with_nothing_pending() {
    let app = session();
    let id = app.upload(vec![png_candidate("a.png", 8, 8)]).added[0];
    app.compress_one(id).await.unwrap();

    let summary = app.compress_all().await;

    assert_eq!(summary.attempted, 0);
    assert_eq!(app.notifier().last(), Some(Notification::NothingToCompress));
}

#[tokio::test]
async fn test_compress_all_records_per_image_failures() {
    let app = session();
    app.upload(vec![png_candidate("ok.png", 16, 16), broken_candidate("bad.png")]);

    let summary = app.compress_all().await;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    let last = app.notifier().last().unwrap();
    assert!(last.is_error());
}

#[tokio::test]
async fn test_export_all_includes_only_compressed_records() {
    let app = session();
    let ids = app
        .upload(vec![
            png_candidate("a.png", 16, 16),
            png_candidate("b.png", 20, 20),
            png_candidate("c.png", 24, 24),
        ])
        .added;
    app.compress_one(ids[0]).await.unwrap();
    app.compress_one(ids[2]).await.unwrap();

    let summary = app.export_all().await.unwrap().unwrap();

    assert_eq!(summary.archive_name, "compressed_images.zip");
    let files = archive_files(app.sink().get("compressed_images.zip").unwrap());
    let names: Vec<_> = files.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "compressed_images/compressed-a.png",
            "compressed_images/compressed-c.png"
        ]
    );

    let stored = app.store().get(ids[0]).unwrap().compressed.unwrap();
    assert_eq!(files[0].1, stored.to_vec());
    assert_eq!(
        app.notifier().last(),
        Some(Notification::ExportComplete {
            archive_name: "compressed_images.zip".to_string(),
            entries: 2
        })
    );
}

#[tokio::test]
async fn test_export_all_with_nothing_compressed() {
    let app = session();
    app.upload(vec![png_candidate("a.png", 8, 8)]);

    let result = app.export_all().await.unwrap();

    assert!(result.is_none());
    assert!(app.sink().file_names().is_empty());
    assert_eq!(app.notifier().last(), Some(Notification::NothingToExport));
}

#[tokio::test]
async fn test_archive_failure_reenables_export() {
    let store = Arc::new(ImageStore::new());
    let batch = BatchOrchestrator::new(
        Arc::clone(&store),
        Arc::new(Compressor::new(JpegCodec::new())),
        MemoryNotifier::new(),
        MemoryDownloadSink::new(),
        CompressorConfig::default(),
    );
    let id = store.add(png_candidate("a.png", 16, 16)).unwrap().id;
    batch.compressor().compress(&store, id).await;

    let mut failing = MockArchiveWriter::new();
    failing.expect_add_entry().times(1).return_const(());
    failing
        .expect_finalize()
        .times(1)
        .returning(|| Err(anyhow::anyhow!("out of memory")));

    let error = batch.export_all(&mut failing).await.unwrap_err();

    assert!(matches!(error, CompressorError::ArchiveFinalizationError { .. }));
    assert!(batch.is_available(BatchControl::ExportAll));
    assert!(matches!(
        batch.notifier().last(),
        Some(Notification::ExportFailed { .. })
    ));
    assert!(batch.sink().file_names().is_empty());

    // 再試行は成功する
    let mut writer = ZipArchiveWriter::new();
    let summary = batch.export_all(&mut writer).await.unwrap().unwrap();
    assert_eq!(summary.entries.len(), 1);
}

#[tokio::test]
async fn test_archive_name_collision_keeps_last_entry() {
    let app = session();
    // 同じ名前でもサイズが違えば別の画像として登録される
    let ids = app
        .upload(vec![
            png_candidate("same.png", 16, 16),
            png_candidate("same.png", 40, 40),
        ])
        .added;
    assert_eq!(ids.len(), 2);
    app.compress_all().await;

    let summary = app.export_all().await.unwrap().unwrap();

    assert_eq!(summary.entries, vec!["compressed_images/compressed-same.png"]);
    let files = archive_files(app.sink().get("compressed_images.zip").unwrap());
    assert_eq!(files.len(), 1);
    let last = app.store().get(ids[1]).unwrap().compressed.unwrap();
    assert_eq!(files[0].1, last.to_vec());
}
