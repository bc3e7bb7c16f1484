// 単一画像の圧縮パイプライン
// デコード → 指定品質で再エンコード → サイズ計測 → ストア更新

use crate::codec::{quality_fraction, ImageCodec};
use crate::core::{CompressionJob, CompressionOutcome, CompressorError, CompressorResult, RecordId};
use crate::store::ImageStore;
use crate::utils::format::compression_ratio;
use tracing::{debug, info, warn};

/// 1枚の画像を圧縮するコンポーネント
///
/// 失敗は画像ごとに閉じ込め、呼び出し元には`CompressionOutcome`として返す。
pub struct Compressor<C> {
    codec: C,
}

impl<C> Compressor<C>
where
    C: ImageCodec,
{
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// ストア内のレコードを圧縮する
    pub async fn compress(&self, store: &ImageStore, id: RecordId) -> CompressionOutcome {
        match store.begin_compression(id) {
            Ok(Some(job)) => self.compress_job(store, job).await,
            Ok(None) => {
                debug!(record = %id, "already compressing, skipped");
                CompressionOutcome::AlreadyRunning { id }
            }
            Err(_) => CompressionOutcome::Discarded { id },
        }
    }

    /// 確保済みのジョブを圧縮してストアに反映する
    pub async fn compress_job(&self, store: &ImageStore, job: CompressionJob) -> CompressionOutcome {
        let id = job.id;
        debug!(record = %id, file = %job.file_name, quality = job.quality, "compressing");

        // 途中でフューチャーが破棄されても圧縮中フラグを戻す
        let claim = ClaimGuard::new(store, id);
        let result = self.reencode(&job).await;
        claim.disarm();

        match result {
            Ok(encoded) => {
                let compressed_size = encoded.len() as u64;
                if !store.complete_compression(id, encoded) {
                    debug!(record = %id, "record removed while compressing, result discarded");
                    return CompressionOutcome::Discarded { id };
                }

                let ratio = compression_ratio(job.original_size, compressed_size);
                info!(
                    record = %id,
                    file = %job.file_name,
                    original_size = job.original_size,
                    compressed_size,
                    ratio,
                    "compressed"
                );
                CompressionOutcome::Compressed {
                    id,
                    compressed_size,
                    ratio,
                }
            }
            Err(error) => {
                if !store.fail_compression(id) {
                    debug!(record = %id, "record removed while compressing, failure discarded");
                    return CompressionOutcome::Discarded { id };
                }

                warn!(record = %id, file = %job.file_name, %error, "compression failed");
                CompressionOutcome::Failed { id, error }
            }
        }
    }

    async fn reencode(&self, job: &CompressionJob) -> CompressorResult<Vec<u8>> {
        let decoded = self.codec.decode(&job.source).await?;
        let encoded = self
            .codec
            .encode(&decoded, quality_fraction(job.quality))
            .await?;
        if encoded.is_empty() {
            return Err(CompressorError::encode("エンコード結果が空です"));
        }
        Ok(encoded)
    }
}

/// 圧縮中フラグの確保。`disarm`されずにドロップされたらフラグを戻す
struct ClaimGuard<'a> {
    store: &'a ImageStore,
    id: RecordId,
    armed: bool,
}

impl<'a> ClaimGuard<'a> {
    fn new(store: &'a ImageStore, id: RecordId) -> Self {
        Self {
            store,
            id,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.store.release_compression(self.id) {
            debug!(record = %self.id, "compression cancelled, claim released");
        }
    }
}
