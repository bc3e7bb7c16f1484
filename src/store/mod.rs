// アップロード済み画像のレジストリ
//
// レコードは挿入順（＝表示順）で保持する。ロックは同期的な読み書きの間だけ保持し、
// `.await`をまたがない。

use crate::core::{
    CompressionJob, CompressorError, CompressorResult, ImageRecord, RecordId, UploadCandidate,
    COMPRESSION_FAILED, DEFAULT_QUALITY, MAX_QUALITY, NOT_COMPRESSED,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// ストアから協調オブジェクトへの通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// ストアが空になった
    Emptied,
}

/// 削除結果
#[derive(Debug, Clone)]
pub struct RemoveOutcome {
    pub removed: ImageRecord,
    pub event: Option<StoreEvent>,
}

/// 画像レコードのストア
#[derive(Debug)]
pub struct ImageStore {
    records: Mutex<Vec<ImageRecord>>,
    next_id: AtomicU64,
    default_quality: u8,
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageStore {
    pub fn new() -> Self {
        Self::with_default_quality(DEFAULT_QUALITY)
    }

    /// 新規レコードの品質を指定してストアを作成
    pub fn with_default_quality(default_quality: u8) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            default_quality: default_quality.min(MAX_QUALITY),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ImageRecord>> {
        // ロック中にパニックしても中身は常に整合している
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 画像を追加する（ファイル名とサイズが一致するものは重複として拒否）
    pub fn add(&self, candidate: UploadCandidate) -> CompressorResult<ImageRecord> {
        let mut records = self.lock();
        let size = candidate.data.len() as u64;

        let is_duplicate = records
            .iter()
            .any(|r| r.file_name == candidate.file_name && r.original_size == size);
        if is_duplicate {
            return Err(CompressorError::duplicate_upload(candidate.file_name, size));
        }

        let record = ImageRecord {
            id: RecordId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            file_name: candidate.file_name,
            mime_type: candidate.mime_type,
            source: Arc::from(candidate.data),
            original_size: size,
            compressed: None,
            compressed_size: NOT_COMPRESSED,
            quality: self.default_quality,
            is_compressing: false,
        };
        records.push(record.clone());
        Ok(record)
    }

    /// レコードを削除する
    pub fn remove(&self, id: RecordId) -> CompressorResult<RemoveOutcome> {
        let mut records = self.lock();
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CompressorError::record_not_found(id))?;

        let removed = records.remove(index);
        let event = records.is_empty().then_some(StoreEvent::Emptied);
        Ok(RemoveOutcome { removed, event })
    }

    /// 全レコードを削除する
    pub fn clear(&self) -> StoreEvent {
        self.lock().clear();
        StoreEvent::Emptied
    }

    /// 全レコードのスナップショット（表示順）
    pub fn list(&self) -> Vec<ImageRecord> {
        self.lock().clone()
    }

    pub fn get(&self, id: RecordId) -> Option<ImageRecord> {
        self.lock().iter().find(|r| r.id == id).cloned()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.lock().iter().any(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// 品質を変更する
    pub fn set_quality(&self, id: RecordId, quality: u8) -> CompressorResult<()> {
        if quality > MAX_QUALITY {
            return Err(CompressorError::validation(
                "quality",
                format!("0〜{MAX_QUALITY}の範囲で指定してください: {quality}"),
            ));
        }

        let mut records = self.lock();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| CompressorError::record_not_found(id))?;
        record.quality = quality;
        Ok(())
    }

    /// 単一レコードの圧縮を開始する
    ///
    /// 既に圧縮中なら`Ok(None)`を返す。
    pub fn begin_compression(&self, id: RecordId) -> CompressorResult<Option<CompressionJob>> {
        let mut records = self.lock();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| CompressorError::record_not_found(id))?;

        if record.is_compressing {
            return Ok(None);
        }
        record.is_compressing = true;
        Ok(Some(job_for(record)))
    }

    /// 未圧縮のレコードを一度に確保する
    ///
    /// 失敗済み（-1）と圧縮中のレコードは対象外。
    pub fn claim_pending(&self) -> Vec<CompressionJob> {
        let mut records = self.lock();
        records
            .iter_mut()
            .filter(|r| r.compressed_size == NOT_COMPRESSED && !r.is_compressing)
            .map(|r| {
                r.is_compressing = true;
                job_for(r)
            })
            .collect()
    }

    /// 圧縮結果を反映する。レコードが削除済みなら`false`
    pub fn complete_compression(&self, id: RecordId, compressed: Vec<u8>) -> bool {
        let mut records = self.lock();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.compressed_size = compressed.len() as i64;
                record.compressed = Some(Arc::from(compressed));
                record.is_compressing = false;
                true
            }
            None => false,
        }
    }

    /// 圧縮失敗を反映する。レコードが削除済みなら`false`
    pub fn fail_compression(&self, id: RecordId) -> bool {
        let mut records = self.lock();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.compressed_size = COMPRESSION_FAILED;
                record.compressed = None;
                record.is_compressing = false;
                true
            }
            None => false,
        }
    }

    /// 結果を反映せずに圧縮中フラグだけを戻す。戻した場合は`true`
    pub fn release_compression(&self, id: RecordId) -> bool {
        let mut records = self.lock();
        match records.iter_mut().find(|r| r.id == id && r.is_compressing) {
            Some(record) => {
                record.is_compressing = false;
                true
            }
            None => false,
        }
    }

    /// エクスポート可能な（圧縮成功済みの）レコードのスナップショット
    pub fn exportable(&self) -> Vec<(String, Arc<[u8]>)> {
        self.lock()
            .iter()
            .filter(|r| r.compressed_size > 0)
            .filter_map(|r| r.compressed.clone().map(|bytes| (r.file_name.clone(), bytes)))
            .collect()
    }
}

fn job_for(record: &ImageRecord) -> CompressionJob {
    CompressionJob {
        id: record.id,
        file_name: record.file_name.clone(),
        source: Arc::clone(&record.source),
        original_size: record.original_size,
        quality: record.quality,
    }
}
