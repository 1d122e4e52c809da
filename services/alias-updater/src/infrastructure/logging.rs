/// ログ基盤モジュール
///
/// CloudWatch向けにJSON形式の構造化ログを出力する。
/// ログレベルは`RUST_LOG`で指定し、未設定時は`info`。
/// 受信した入力の全文は`debug`で出るため、詳細ログが必要なら`RUST_LOG=debug`にする。
use std::sync::Once;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG`未設定時のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info";

static INIT: Once = Once::new();

/// `RUST_LOG`を優先し、未設定または解釈できなければ`default`を使う
fn env_filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Lambda用のログサブスクライバーを初期化する（2回目以降は何もしない）
pub fn init_logging() {
    INIT.call_once(|| {
        // 時刻はCloudWatch側で付与される
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_target(false)
            .without_time();

        tracing_subscriber::registry()
            .with(env_filter_or(DEFAULT_LOG_FILTER))
            .with(json_layer)
            .init();
    });
}

/// テスト用のログサブスクライバーを初期化する
///
/// `cargo test -- --nocapture`で各テストのinfo/debugログを確認できる。
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter_or("debug"))
            .with(fmt_layer)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing_subscriber::filter::LevelFilter;

    // 安全性: serialで直列化したテストでのみ使用
    unsafe fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    #[serial]
    fn test_env_filter_default_level() {
        unsafe { remove_env("RUST_LOG") };

        let filter = env_filter_or(DEFAULT_LOG_FILTER);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    #[serial]
    fn test_env_filter_prefers_rust_log() {
        unsafe { set_env("RUST_LOG", "debug") };

        let filter = env_filter_or(DEFAULT_LOG_FILTER);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        unsafe { remove_env("RUST_LOG") };
    }

    #[test]
    #[serial]
    fn test_env_filter_module_directive() {
        unsafe { set_env("RUST_LOG", "warn,alias_updater=trace") };

        let filter = env_filter_or(DEFAULT_LOG_FILTER);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));

        unsafe { remove_env("RUST_LOG") };
    }
}
