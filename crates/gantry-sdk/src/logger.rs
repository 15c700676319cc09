use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// 初始化全局日志
///
/// 过滤规则读取 `RUST_LOG`，缺省为 `info`；`log` crate 的记录通过 `tracing-log` 转发。
/// 可以重复调用，只有第一次生效；已有全局 subscriber 时静默跳过。
pub fn init_logger() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            let _ = tracing_log::LogTracer::init();
        }
    });
}
