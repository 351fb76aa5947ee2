use std::io;

use tracing::info;

use innkeep::engine::Hotel;
use innkeep::shell::Shell;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    innkeep::observability::init_logging();

    let data_dir = std::env::var("INNKEEP_DATA_DIR").unwrap_or_else(|_| "./data".into());
    let metrics_enabled = std::env::var("INNKEEP_METRICS")
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);
    let metrics = innkeep::observability::init_metrics(metrics_enabled);

    let hotel = Hotel::open(&data_dir)?;
    info!("innkeep started");
    info!("  data_dir: {data_dir}");
    info!("  metrics: {}", if metrics.is_some() { "enabled" } else { "disabled" });

    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(hotel, stdin.lock(), stdout.lock())
        .with_metrics(metrics)
        .run()?;

    info!("innkeep stopped");
    Ok(())
}
