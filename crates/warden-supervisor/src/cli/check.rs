use super::commands::OutputFormat;
use serde_json::json;
use warden_supervisor::{probe_once, HttpHealthProbe, WardenConfig};
use warden_types::WardenResult;

pub async fn run_check(config: &WardenConfig, format: &OutputFormat) -> WardenResult<bool> {
    let probe = HttpHealthProbe::from_config(&config.supervisor)?;
    let result = probe_once(&probe, config.supervisor.watchdog_timeout()).await;

    match format {
        OutputFormat::Json => {
            let report = json!({
                "url": probe.url(),
                "healthy": result.is_healthy(),
                "result": result.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if result.is_healthy() {
                println!("\x1b[38;5;46m[+]\x1b[0m {} is healthy", probe.url());
            } else {
                println!("\x1b[38;5;196m[-]\x1b[0m {}: {}", probe.url(), result);
            }
        }
    }

    Ok(result.is_healthy())
}
