use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use device_rest::error::Result;
use device_rest::registry::MemoryRegistry;

use device_rest_server::channel;

use device_rest_service::config::Config;
use device_rest_service::driver::RestDriver;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "device-rest")]
#[command(about = "A device service for generic REST end devices")]
#[command(version)]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "device-rest.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    ///
    /// If absent, the `RUST_LOG` environment variable is used.
    #[arg(short, long)]
    log_level: Option<String>,
}

// An invalid or absent filter falls back to `info`.
fn log_filter(log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("info"))
}

fn install_tracing(log_level: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(log_level))
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    install_tracing(args.log_level.as_deref());

    info!("device-rest v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&args.config)?;

    let mut driver = RestDriver::new(
        config.service.clone(),
        config.client.client(),
        Arc::new(MemoryRegistry::new()),
    );

    for device in config.devices() {
        driver.add_device(device)?;
    }

    let (sink, mut receiver) = channel(config.service.queue_capacity);
    driver.initialize(sink).await?;

    let consumer = tokio::spawn(async move {
        while let Some(values) = receiver.recv().await {
            for value in &values.command_values {
                info!(
                    device = %values.device_name,
                    resource = %value.resource_name(),
                    value_type = %value.value_type(),
                    origin = value.origin(),
                    "Async value received: {}",
                    value.value()
                );
            }
        }
    });

    tokio::signal::ctrl_c().await?;

    info!("Shutting down");

    driver.stop(false).await?;

    // The sink is dropped with the server, so the consumer drains the
    // remaining values and then exits.
    if let Err(e) = consumer.await {
        warn!("Async values consumer stopped abnormally: {e}");
    }

    Ok(())
}
