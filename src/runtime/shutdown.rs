use tokio::signal;
use tracing::warn;

/// 等待关闭信号（Ctrl+C）
pub async fn listen_for_shutdown() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    warn!("收到关闭信号，正在停止服务器...");
}
