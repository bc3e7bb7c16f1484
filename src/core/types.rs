// 圧縮セッションのデータ型定義

use crate::utils::format::compression_ratio;
use std::fmt;
use std::sync::Arc;

/// 未圧縮を表す`compressed_size`の番兵値
pub const NOT_COMPRESSED: i64 = 0;

/// 圧縮失敗を表す`compressed_size`の番兵値
pub const COMPRESSION_FAILED: i64 = -1;

/// 画像品質のデフォルト値
pub const DEFAULT_QUALITY: u8 = 80;

/// 画像品質の上限
pub const MAX_QUALITY: u8 = 100;

/// ストア内で一意なレコード識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image-{}", self.0)
    }
}

/// アップロード候補のファイル
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl UploadCandidate {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// `compressed_size`から導出される圧縮状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionState {
    /// 未圧縮（`compressed_size == 0`）
    Pending,
    /// 圧縮成功（圧縮後のバイト数）
    Compressed(u64),
    /// 圧縮失敗（`compressed_size == -1`）
    Failed,
}

/// アップロードされた1枚の画像とその圧縮状態
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub id: RecordId,
    pub file_name: String,
    pub mime_type: String,
    /// 元のファイル内容（不変）
    pub source: Arc<[u8]>,
    pub original_size: u64,
    /// 直近の圧縮結果
    pub compressed: Option<Arc<[u8]>>,
    /// 0 = 未圧縮, -1 = 失敗, 正の値 = 圧縮後のバイト数
    pub compressed_size: i64,
    pub quality: u8,
    /// 圧縮中フラグ（表示用）
    pub is_compressing: bool,
}

impl ImageRecord {
    pub fn state(&self) -> CompressionState {
        match self.compressed_size {
            NOT_COMPRESSED => CompressionState::Pending,
            size if size > 0 => CompressionState::Compressed(size as u64),
            _ => CompressionState::Failed,
        }
    }

    /// 個別ダウンロードが可能かどうか
    pub fn download_enabled(&self) -> bool {
        self.compressed_size > 0 && self.compressed.is_some()
    }

    /// 保存済みのサイズから圧縮率を計算
    pub fn compression_ratio(&self) -> Option<f64> {
        match self.state() {
            CompressionState::Compressed(size) => Some(compression_ratio(self.original_size, size)),
            _ => None,
        }
    }
}

/// 圧縮1回分の入力スナップショット
#[derive(Debug, Clone)]
pub struct CompressionJob {
    pub id: RecordId,
    pub file_name: String,
    pub source: Arc<[u8]>,
    pub original_size: u64,
    pub quality: u8,
}

/// 単一画像の圧縮結果
#[derive(Debug)]
pub enum CompressionOutcome {
    Compressed {
        id: RecordId,
        compressed_size: u64,
        ratio: f64,
    },
    Failed {
        id: RecordId,
        error: crate::core::error::CompressorError,
    },
    /// 処理中にレコードが削除されたため結果を破棄した
    Discarded { id: RecordId },
    /// 既に圧縮中のため実行しなかった
    AlreadyRunning { id: RecordId },
}

impl CompressionOutcome {
    pub fn id(&self) -> RecordId {
        match self {
            Self::Compressed { id, .. }
            | Self::Failed { id, .. }
            | Self::Discarded { id }
            | Self::AlreadyRunning { id } => *id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Compressed { .. })
    }
}

/// 一括圧縮のサマリー
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub discarded: usize,
}

/// 一括エクスポートのサマリー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub archive_name: String,
    pub entries: Vec<String>,
    pub archive_size: u64,
}

/// アップロード処理のレポート
#[derive(Debug, Clone, Default)]
pub struct UploadReport {
    pub added: Vec<RecordId>,
    pub duplicates: Vec<String>,
    /// 画像以外のMIMEタイプで除外されたファイル
    pub skipped: Vec<String>,
}
