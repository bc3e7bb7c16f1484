use super::{Notification, Notifier};
use crate::core::CompressorConfig;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::info;

/// 表示開始のトランジション時間
pub const ENTER_TRANSITION: Duration = Duration::from_millis(10);

/// 消去のトランジション時間
pub const EXIT_TRANSITION: Duration = Duration::from_millis(300);

/// 通知の表示段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Entering,
    Visible,
    Leaving,
}

/// 現在表示中の通知
#[derive(Debug, Clone, PartialEq)]
pub struct ToastView {
    pub message: String,
    pub is_error: bool,
    pub phase: ToastPhase,
}

struct ActiveToast {
    notification: Notification,
    shown_at: Instant,
}

/// 単一スロットの自動消去通知
///
/// 新しい通知は表示中のものを置き換える。表示段階は表示開始時刻から計算する。
pub struct ToastNotifier {
    slot: Mutex<Option<ActiveToast>>,
    display_duration: Duration,
}

impl Default for ToastNotifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

impl ToastNotifier {
    pub fn new(display_duration: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            display_duration,
        }
    }

    pub fn from_config(config: &CompressorConfig) -> Self {
        Self::new(config.toast_duration())
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveToast>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 指定時刻に通知を表示する
    pub fn show_at(&self, notification: Notification, at: Instant) {
        *self.lock() = Some(ActiveToast {
            notification,
            shown_at: at,
        });
    }

    pub fn current(&self) -> Option<ToastView> {
        self.current_at(Instant::now())
    }

    /// 指定時刻における表示状態。消去済みならスロットを空にする
    pub fn current_at(&self, now: Instant) -> Option<ToastView> {
        let mut slot = self.lock();
        let toast = slot.as_ref()?;
        let elapsed = now.saturating_duration_since(toast.shown_at);

        let phase = if elapsed < ENTER_TRANSITION {
            ToastPhase::Entering
        } else if elapsed < self.display_duration {
            ToastPhase::Visible
        } else if elapsed < self.display_duration + EXIT_TRANSITION {
            ToastPhase::Leaving
        } else {
            *slot = None;
            return None;
        };

        Some(ToastView {
            message: toast.notification.to_string(),
            is_error: toast.notification.is_error(),
            phase,
        })
    }

    pub fn dismiss(&self) {
        *self.lock() = None;
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        info!(message = %notification, "toast");
        self.show_at(notification, Instant::now());
    }
}
