use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

/// 初始化日志
///
/// 控制台输出始终开启；配置了 `file` 时额外写入文件，
/// 返回的 guard 必须在进程生命周期内保持存活。
pub fn init_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console = match config.format.as_str() {
        "json" => fmt::layer().json().boxed(),
        _ => fmt::layer().pretty().boxed(),
    };

    let (file_layer, guard) = match config.file.as_deref().map(|path| file_writer(config, path)) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer).boxed();
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("[ERROR] 无法创建日志文件: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized with level: {}", config.level);
    guard
}

fn file_writer(
    config: &LogConfig,
    path: &str,
) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    let path = Path::new(path);
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("dmall.log");

    let rotation = if config.enable_rotation {
        Rotation::DAILY
    } else {
        Rotation::NEVER
    };

    RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(prefix)
        .max_log_files(config.max_backups.max(1) as usize)
        .build(directory)
}
