// コアレイヤー - 型、設定、エラー定義
// 他のレイヤーから参照される基本的な定義を提供

pub mod config;
pub mod error;
pub mod types;

// 公開API - 明示的にエクスポートして曖昧性を回避
pub use config::CompressorConfig;
pub use error::{CompressorError, CompressorResult, ErrorSeverity};
pub use types::{
    BatchSummary, CompressionJob, CompressionOutcome, CompressionState, ExportSummary,
    ImageRecord, RecordId, UploadCandidate, UploadReport, COMPRESSION_FAILED, DEFAULT_QUALITY,
    MAX_QUALITY, NOT_COMPRESSED,
};
