// 一括操作のオーケストレーション
//
// 完了検知はタスクの終了（settle）を直接待つ。状態のポーリングはしない。

use crate::archive::ArchiveWriter;
use crate::codec::ImageCodec;
use crate::compressor::Compressor;
use crate::core::{
    BatchSummary, CompressionOutcome, CompressorConfig, CompressorError, CompressorResult,
    ExportSummary,
};
use crate::download::DownloadSink;
use crate::notify::{Notification, Notifier};
use crate::store::ImageStore;
use std::sync::Arc;
use tracing::{info, warn};

pub mod controls;

pub use controls::{BatchControl, BatchControls, ControlGuard};

/// 一括圧縮・一括エクスポートを実行するオーケストレーター
pub struct BatchOrchestrator<C, N, D> {
    store: Arc<ImageStore>,
    compressor: Arc<Compressor<C>>,
    notifier: N,
    sink: D,
    config: CompressorConfig,
    controls: BatchControls,
}

impl<C, N, D> BatchOrchestrator<C, N, D>
where
    C: ImageCodec + 'static,
    N: Notifier,
    D: DownloadSink,
{
    pub fn new(
        store: Arc<ImageStore>,
        compressor: Arc<Compressor<C>>,
        notifier: N,
        sink: D,
        config: CompressorConfig,
    ) -> Self {
        Self {
            store,
            compressor,
            notifier,
            sink,
            config,
            controls: BatchControls::new(),
        }
    }

    pub fn store(&self) -> &Arc<ImageStore> {
        &self.store
    }

    pub fn compressor(&self) -> &Arc<Compressor<C>> {
        &self.compressor
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    pub fn is_available(&self, control: BatchControl) -> bool {
        self.controls.is_available(control)
    }

    /// 未圧縮（`compressed_size == 0`）の画像をすべて並行に圧縮する
    ///
    /// 失敗済み（-1）の画像は再試行しない。
    pub async fn compress_all(&self) -> BatchSummary {
        let Some(_guard) = self.controls.acquire(BatchControl::CompressAll) else {
            self.notifier.notify(Notification::BatchBusy);
            return BatchSummary::default();
        };

        let jobs = self.store.claim_pending();
        if jobs.is_empty() {
            self.notifier.notify(Notification::NothingToCompress);
            return BatchSummary::default();
        }

        info!(count = jobs.len(), "compress all started");

        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let id = job.id;
                let store = Arc::clone(&self.store);
                let compressor = Arc::clone(&self.compressor);
                let handle = tokio::spawn(async move { compressor.compress_job(&store, job).await });
                (id, handle)
            })
            .collect();

        let mut summary = BatchSummary {
            attempted: handles.len(),
            ..BatchSummary::default()
        };

        for (id, handle) in handles {
            match handle.await {
                Ok(CompressionOutcome::Compressed { .. }) => summary.succeeded += 1,
                Ok(CompressionOutcome::Failed { .. }) => summary.failed += 1,
                Ok(CompressionOutcome::Discarded { .. } | CompressionOutcome::AlreadyRunning { .. }) => {
                    summary.discarded += 1
                }
                Err(join_error) => {
                    let error = CompressorError::task(join_error);
                    warn!(record = %id, %error, "compression task aborted");
                    if self.store.fail_compression(id) {
                        summary.failed += 1;
                    } else {
                        summary.discarded += 1;
                    }
                }
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            discarded = summary.discarded,
            "compress all finished"
        );
        self.notifier.notify(Notification::BatchComplete {
            succeeded: summary.succeeded,
            failed: summary.failed,
        });
        summary
    }

    /// 圧縮済みの画像をアーカイブにまとめて保存する
    ///
    /// 対象がない場合や実行中の場合は`Ok(None)`。
    pub async fn export_all(
        &self,
        writer: &mut dyn ArchiveWriter,
    ) -> CompressorResult<Option<ExportSummary>> {
        let Some(_guard) = self.controls.acquire(BatchControl::ExportAll) else {
            self.notifier.notify(Notification::BatchBusy);
            return Ok(None);
        };

        let exportable = self.store.exportable();
        if exportable.is_empty() {
            self.notifier.notify(Notification::NothingToExport);
            return Ok(None);
        }

        let mut entries: Vec<String> = Vec::with_capacity(exportable.len());
        for (file_name, bytes) in &exportable {
            let path = self.config.archive_entry_path(file_name);
            writer.add_entry(&path, bytes);
            if !entries.contains(&path) {
                entries.push(path);
            }
        }

        let payload = writer.finalize().map_err(|e| self.export_failed(e))?;
        let archive_size = payload.len() as u64;

        let location = self
            .sink
            .save(&self.config.archive_name, &payload)
            .await
            .map_err(|e| self.export_failed(e))?;

        info!(entries = entries.len(), archive_size, %location, "archive exported");
        self.notifier.notify(Notification::ExportComplete {
            archive_name: self.config.archive_name.clone(),
            entries: entries.len(),
        });

        Ok(Some(ExportSummary {
            archive_name: self.config.archive_name.clone(),
            entries,
            archive_size,
        }))
    }

    fn export_failed(&self, source: anyhow::Error) -> CompressorError {
        warn!(error = %source, "archive export failed");
        self.notifier.notify(Notification::ExportFailed {
            reason: source.to_string(),
        });
        CompressorError::archive_finalization(source)
    }
}
