//! Launcher host entry point.

use launcher_host::{AppError, HostConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting launcher host");

    // Read configuration from environment.
    let config = HostConfig::from_env()?;
    let controller = launcher_host::build_controller(&config);

    // Ctrl-C tears the session down; the run then ends as aborted.
    let interrupt = controller.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, tearing down player session");
            if let Err(err) = interrupt.teardown() {
                tracing::warn!(error = %err, "teardown after interrupt failed");
            }
        }
    });

    let outcome = launcher_host::run_with(&controller, &config.launch).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
