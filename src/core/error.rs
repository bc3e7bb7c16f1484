// 圧縮セッション全体で使うエラー型定義

use thiserror::Error;

/// 圧縮処理のエラー型
#[derive(Error, Debug)]
pub enum CompressorError {
    #[error("重複アップロード: {file_name} ({size} bytes) は既に存在します")]
    DuplicateUpload { file_name: String, size: u64 },

    #[error("デコードエラー: {source}")]
    DecodeError {
        #[source]
        source: anyhow::Error,
    },

    #[error("エンコードエラー: {reason}")]
    EncodeError { reason: String },

    #[error("アーカイブ生成エラー: {source}")]
    ArchiveFinalizationError {
        #[source]
        source: anyhow::Error,
    },

    #[error("レコードが見つかりません: {id}")]
    RecordNotFound { id: String },

    #[error("ダウンロード不可: {file_name} はまだ圧縮されていません")]
    DownloadUnavailable { file_name: String },

    #[error("バリデーションエラー: {field} - {reason}")]
    ValidationError { field: String, reason: String },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("I/Oエラー: {path} - {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl CompressorError {
    /// 重複アップロードエラーの作成
    pub fn duplicate_upload(file_name: impl Into<String>, size: u64) -> Self {
        Self::DuplicateUpload {
            file_name: file_name.into(),
            size,
        }
    }

    /// デコードエラーの作成
    pub fn decode(source: anyhow::Error) -> Self {
        Self::DecodeError { source }
    }

    /// エンコードエラーの作成
    pub fn encode(reason: impl Into<String>) -> Self {
        Self::EncodeError {
            reason: reason.into(),
        }
    }

    /// アーカイブ生成エラーの作成
    pub fn archive_finalization(source: anyhow::Error) -> Self {
        Self::ArchiveFinalizationError { source }
    }

    pub fn record_not_found(id: impl ToString) -> Self {
        Self::RecordNotFound { id: id.to_string() }
    }

    pub fn download_unavailable(file_name: impl Into<String>) -> Self {
        Self::DownloadUnavailable {
            file_name: file_name.into(),
        }
    }

    /// バリデーションエラーの作成
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DuplicateUpload { .. } | Self::DownloadUnavailable { .. } => ErrorSeverity::Low,
            Self::DecodeError { .. } | Self::EncodeError { .. } | Self::RecordNotFound { .. } => {
                ErrorSeverity::Medium
            }
            Self::ArchiveFinalizationError { .. } | Self::IoError { .. } => ErrorSeverity::High,
            Self::ValidationError { .. } | Self::ConfigurationError { .. } => ErrorSeverity::High,
            Self::TaskError { .. } => ErrorSeverity::Critical,
        }
    }

    /// エラーが回復可能かどうかを判定
    ///
    /// 設定エラー以外はセッションを継続できる
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ConfigurationError { .. })
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 低重要度 - ユーザー通知のみ
    Low,
    /// 中重要度 - 警告レベル
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的
    Critical,
}

impl ErrorSeverity {
    /// 重要度の文字列表現を取得
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// 圧縮処理の結果型
pub type CompressorResult<T> = std::result::Result<T, CompressorError>;

impl From<tokio::task::JoinError> for CompressorError {
    fn from(error: tokio::task::JoinError) -> Self {
        CompressorError::TaskError { source: error }
    }
}
