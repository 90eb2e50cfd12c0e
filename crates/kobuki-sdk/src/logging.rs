//! 日志初始化
//!
//! 安装 `tracing_subscriber` fmt 订阅者（`RUST_LOG` 优先于默认指令），
//! 并通过 `LogTracer` 把 `log` 记录转发到 tracing。

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// 日志初始化错误
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log directive: {0}")]
    Directive(#[from] tracing_subscriber::filter::ParseError),
    #[error("Global subscriber already set: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("log bridge already installed: {0}")]
    LogBridge(#[from] log::SetLoggerError),
}

/// 初始化全局日志
///
/// `default_directive` 在未设置 `RUST_LOG` 时生效，例如 `"kobuki_driver=debug"`。
/// 进程内只能成功调用一次。
pub fn init_logging(default_directive: &str) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}
