use rtos_telemetry::{ListenerConfig, TelemetryListener};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logging goes to stdout; RUST_LOG only tunes verbosity.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut listener = TelemetryListener::bind(ListenerConfig::default()).await?;

    let shutdown = CancellationToken::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Ctrl+C received, shutting down");
        ctrl_c.cancel();
    });

    tracing::info!("Telemetry listener active. Press Ctrl+C to stop.");
    listener.run(shutdown).await?;
    Ok(())
}
