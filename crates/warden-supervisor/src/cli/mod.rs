mod check;
mod commands;
mod config_cmd;
mod reclaim_cmd;
mod run;
mod status;
mod utils;

pub use check::run_check;
pub use commands::{Cli, Commands};
pub use config_cmd::handle_config;
pub use reclaim_cmd::run_reclaim;
pub use run::run_supervisor;
pub use status::show_status;
pub use utils::{default_warden_dir, init_logging, show_version};

use warden_supervisor::WardenConfig;
use warden_types::WardenResult;

pub fn apply_cli_overrides(mut config: WardenConfig, cli: &Cli) -> WardenResult<WardenConfig> {
    if let Some(mode) = cli.mode {
        config.backend.mode = mode;
    }
    if let Some(port) = cli.port {
        config.supervisor.port = port;
    }
    config.validate()?;
    Ok(config)
}
