use super::{Notification, Notifier};

/// コンソール出力による通知実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if self.quiet {
            return;
        }
        if notification.is_error() {
            eprintln!("❌ {notification}");
        } else {
            println!("ℹ️  {notification}");
        }
    }
}
