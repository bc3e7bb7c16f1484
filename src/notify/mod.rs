// ユーザー通知チャンネル
//
// - ToastNotifier   - 単一スロットで自動的に消える通知（画面表示モデル）
// - ConsoleNotifier - CLI向けのコンソール出力
// - NoOpNotifier    - 何もしない
// - MemoryNotifier  - 通知を記録する（テスト用）

use mockall::automock;
use std::fmt;
use std::sync::{Arc, Mutex};

pub mod console;
pub mod toast;

pub use console::ConsoleNotifier;
pub use toast::{ToastNotifier, ToastPhase, ToastView};

/// ユーザーに表示する通知
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    DuplicateUpload { file_name: String },
    NothingToCompress,
    NothingToExport,
    BatchBusy,
    BatchComplete { succeeded: usize, failed: usize },
    CompressionFailed { file_name: String, reason: String },
    ExportComplete { archive_name: String, entries: usize },
    ExportFailed { reason: String },
    DownloadFailed { file_name: String, reason: String },
}

impl Notification {
    /// 失敗を伝える通知かどうか
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::CompressionFailed { .. } | Self::ExportFailed { .. } | Self::DownloadFailed { .. }
        ) || matches!(self, Self::BatchComplete { failed, .. } if *failed > 0)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateUpload { file_name } => {
                write!(f, "画像 \"{file_name}\" は既に存在します。重複してアップロードしないでください")
            }
            Self::NothingToCompress => write!(f, "圧縮が必要な画像はありません"),
            Self::NothingToExport => write!(f, "ダウンロードできる圧縮済み画像はありません"),
            Self::BatchBusy => write!(f, "一括圧縮は実行中です"),
            Self::BatchComplete { succeeded, failed: 0 } => {
                write!(f, "すべての画像の圧縮が完了しました（{succeeded}枚）")
            }
            Self::BatchComplete { succeeded, failed } => {
                write!(f, "圧縮が完了しました（成功: {succeeded}枚, 失敗: {failed}枚）")
            }
            Self::CompressionFailed { file_name, reason } => {
                write!(f, "\"{file_name}\" の圧縮に失敗しました: {reason}")
            }
            Self::ExportComplete { archive_name, entries } => {
                write!(f, "{archive_name} のダウンロードが完了しました（{entries}件）")
            }
            Self::ExportFailed { reason } => {
                write!(f, "ダウンロードに失敗しました。再試行してください: {reason}")
            }
            Self::DownloadFailed { file_name, reason } => {
                write!(f, "\"{file_name}\" のダウンロードに失敗しました: {reason}")
            }
        }
    }
}

/// 通知の送信先を抽象化するトレイト
#[automock]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notification: Notification) {
        self.as_ref().notify(notification)
    }
}

/// 何もしない通知実装
#[derive(Debug, Default, Clone)]
pub struct NoOpNotifier;

impl NoOpNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for NoOpNotifier {
    fn notify(&self, _notification: Notification) {
        // 何もしない
    }
}

/// 通知をメモリに記録する実装（テスト用）
#[derive(Debug, Default, Clone)]
pub struct MemoryNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 受け取った通知を取得
    pub fn received(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.received().pop()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}
