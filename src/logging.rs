// ログ出力の初期化
//
// ユーザー向けの表示は通知（Notifier）が担当し、ここで設定するのは診断用のログのみ。

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG`が未設定のときのフィルタ
pub const DEFAULT_FILTER: &str = "info";

/// 環境変数またはデフォルトからフィルタを作成
pub fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { DEFAULT_FILTER };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// グローバルなサブスクライバーを登録する
///
/// 二回目以降の呼び出しは何もしない。
pub fn init_logging(verbose: bool) {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(stderr_layer)
        .try_init();
}
