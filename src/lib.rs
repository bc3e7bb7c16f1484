pub mod archive;
pub mod batch;
pub mod cli;
pub mod codec;
pub mod compressor;
pub mod core;
pub mod download;
pub mod logging;
pub mod notify;
pub mod source;
pub mod store;
pub mod utils;
pub mod view;

use crate::archive::ZipArchiveWriter;
use crate::batch::{BatchControl, BatchOrchestrator};
use crate::codec::ImageCodec;
use crate::compressor::Compressor;
use crate::core::{
    BatchSummary, CompressionOutcome, CompressorConfig, CompressorError, CompressorResult,
    ExportSummary, ImageRecord, RecordId, UploadCandidate, UploadReport,
};
use crate::download::DownloadSink;
use crate::notify::{Notification, Notifier};
use crate::store::{ImageStore, StoreEvent};
use crate::utils::format::is_image_mime;
use crate::view::RecordView;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// アップロード欄の状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSurface {
    /// プレビュー領域を表示しているか（ストアが空でない間）
    pub preview_visible: bool,
    /// ファイル入力に選択されているファイル名
    pub staged_files: Vec<String>,
}

// 1セッション分の状態と依存関係を所有する構造体
// ストアはセッション開始時に作成され、グローバルな状態は持たない
pub struct CompressorApp<C, N, D>
where
    C: ImageCodec + 'static,
    N: Notifier,
    D: DownloadSink,
{
    batch: BatchOrchestrator<C, N, D>,
    surface: Mutex<UploadSurface>,
}

impl<C, N, D> CompressorApp<C, N, D>
where
    C: ImageCodec + 'static,
    N: Notifier,
    D: DownloadSink,
{
    /// 新しいセッションを作成（コンストラクタインジェクション）
    pub fn new(codec: C, notifier: N, sink: D, config: CompressorConfig) -> Self {
        let store = Arc::new(ImageStore::with_default_quality(config.default_quality));
        let compressor = Arc::new(Compressor::new(codec));
        Self {
            batch: BatchOrchestrator::new(store, compressor, notifier, sink, config),
            surface: Mutex::new(UploadSurface::default()),
        }
    }

    pub fn store(&self) -> &ImageStore {
        self.batch.store()
    }

    pub fn config(&self) -> &CompressorConfig {
        self.batch.config()
    }

    pub fn notifier(&self) -> &N {
        self.batch.notifier()
    }

    pub fn sink(&self) -> &D {
        self.batch.sink()
    }

    pub fn batch(&self) -> &BatchOrchestrator<C, N, D> {
        &self.batch
    }

    pub fn is_available(&self, control: BatchControl) -> bool {
        self.batch.is_available(control)
    }

    fn surface(&self) -> MutexGuard<'_, UploadSurface> {
        self.surface.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn upload_surface(&self) -> UploadSurface {
        self.surface().clone()
    }

    /// 選択されたファイルをストアに追加する
    ///
    /// 画像以外のMIMEタイプは通知せずに除外する。重複は通知して破棄する。
    pub fn upload(&self, candidates: Vec<UploadCandidate>) -> UploadReport {
        let mut report = UploadReport::default();
        let staged: Vec<String> = candidates.iter().map(|c| c.file_name.clone()).collect();

        for candidate in candidates {
            if !is_image_mime(&candidate.mime_type) {
                debug!(file = %candidate.file_name, mime = %candidate.mime_type, "not an image, skipped");
                report.skipped.push(candidate.file_name);
                continue;
            }

            let file_name = candidate.file_name.clone();
            match self.store().add(candidate) {
                Ok(record) => {
                    debug!(record = %record.id, file = %record.file_name, "uploaded");
                    report.added.push(record.id);
                }
                Err(CompressorError::DuplicateUpload { file_name, .. }) => {
                    self.notifier().notify(Notification::DuplicateUpload {
                        file_name: file_name.clone(),
                    });
                    report.duplicates.push(file_name);
                }
                Err(error) => {
                    warn!(file = %file_name, %error, "upload rejected");
                    report.skipped.push(file_name);
                }
            }
        }

        let mut surface = self.surface();
        surface.staged_files = staged;
        surface.preview_visible = !self.store().is_empty();
        report
    }

    pub fn set_quality(&self, id: RecordId, quality: u8) -> CompressorResult<()> {
        self.store().set_quality(id, quality)
    }

    /// 1枚の画像を現在の品質で圧縮する
    pub async fn compress_one(&self, id: RecordId) -> CompressorResult<CompressionOutcome> {
        let record = self.record(id)?;
        let outcome = self
            .batch
            .compressor()
            .compress(self.batch.store(), id)
            .await;

        if let CompressionOutcome::Failed { error, .. } = &outcome {
            self.notifier().notify(Notification::CompressionFailed {
                file_name: record.file_name,
                reason: error.to_string(),
            });
        }
        Ok(outcome)
    }

    /// 圧縮済みの画像を`compressed-<元のファイル名>`として保存する
    pub async fn download_one(&self, id: RecordId) -> CompressorResult<String> {
        let record = self.record(id)?;
        let compressed = record
            .compressed
            .as_ref()
            .filter(|_| record.download_enabled())
            .ok_or_else(|| CompressorError::download_unavailable(&record.file_name))?;

        let download_name = self.config().download_name(&record.file_name);
        match self.sink().save(&download_name, compressed).await {
            Ok(location) => {
                debug!(record = %id, %location, "downloaded");
                Ok(location)
            }
            Err(error) => {
                warn!(record = %id, %error, "download failed");
                self.notifier().notify(Notification::DownloadFailed {
                    file_name: download_name.clone(),
                    reason: error.to_string(),
                });
                Err(CompressorError::io(download_name, std::io::Error::other(error)))
            }
        }
    }

    /// 画像を削除する。ストアが空になったらアップロード欄をリセットする
    pub fn remove(&self, id: RecordId) -> CompressorResult<ImageRecord> {
        let outcome = self.store().remove(id)?;
        if let Some(event) = outcome.event {
            self.on_store_event(event);
        }
        Ok(outcome.removed)
    }

    pub fn clear(&self) {
        let event = self.store().clear();
        self.on_store_event(event);
    }

    fn on_store_event(&self, event: StoreEvent) {
        match event {
            StoreEvent::Emptied => *self.surface() = UploadSurface::default(),
        }
    }

    pub async fn compress_all(&self) -> BatchSummary {
        self.batch.compress_all().await
    }

    /// 圧縮済みの画像をZIPにまとめて保存する
    pub async fn export_all(&self) -> CompressorResult<Option<ExportSummary>> {
        let mut writer = ZipArchiveWriter::new();
        self.batch.export_all(&mut writer).await
    }

    /// 表示用データ（表示順）
    pub fn views(&self) -> Vec<RecordView> {
        view::project_all(&self.store().list())
    }

    pub fn original_preview(&self, id: RecordId) -> Option<String> {
        self.store().get(id).map(|record| view::original_preview(&record))
    }

    pub fn compressed_preview(&self, id: RecordId) -> Option<String> {
        let output_mime_type = self.batch.compressor().codec().output_mime_type();
        self.store()
            .get(id)
            .and_then(|record| view::compressed_preview(&record, output_mime_type))
    }

    fn record(&self, id: RecordId) -> CompressorResult<ImageRecord> {
        self.store()
            .get(id)
            .ok_or_else(|| CompressorError::record_not_found(id))
    }
}
