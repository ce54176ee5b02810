mod cli;

use clap::Parser;
use cli::{
    Cli, Commands, apply_cli_overrides, default_warden_dir, handle_config, init_logging,
    run_check, run_reclaim, run_supervisor, show_status, show_version,
};
use warden_supervisor::config::{CONFIG_FILE_NAME, STATUS_FILE_NAME};
use warden_supervisor::{LoggingConfig, SupervisorExit, WardenConfig};
use warden_types::WardenResult;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[38;5;196m[-]\x1b[0m {}", e);
            1
        }
    };

    // Exit without tearing down the runtime: a console prompt may still be
    // blocked on stdin.
    std::process::exit(code);
}

async fn run(cli: Cli) -> WardenResult<i32> {
    let warden_dir = cli.data_dir.clone().unwrap_or_else(default_warden_dir);
    let config_path = cli.config.clone().unwrap_or_else(|| warden_dir.join(CONFIG_FILE_NAME));

    let loaded = WardenConfig::load(&config_path);
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    init_logging(&cli, &logging)?;

    match cli.command {
        Commands::Run { headless, ref pid_file, ref status_file } => {
            let config = apply_cli_overrides(loaded?, &cli)?;
            match run_supervisor(config, &warden_dir, headless, pid_file.clone(), status_file.clone()).await? {
                SupervisorExit::Quit | SupervisorExit::Shutdown => Ok(0),
            }
        }
        Commands::Check => {
            let config = apply_cli_overrides(loaded?, &cli)?;
            let healthy = run_check(&config, &cli.format).await?;
            Ok(if healthy { 0 } else { 1 })
        }
        Commands::Reclaim => {
            let config = apply_cli_overrides(loaded?, &cli)?;
            run_reclaim(&config).await?;
            Ok(0)
        }
        Commands::Status { ref status_file } => {
            let path = status_file.clone().unwrap_or_else(|| warden_dir.join(STATUS_FILE_NAME));
            show_status(&path, &cli.format)?;
            Ok(0)
        }
        Commands::Config { ref action } => {
            handle_config(&config_path, action.as_ref())?;
            Ok(0)
        }
        Commands::Version => {
            show_version();
            Ok(0)
        }
    }
}
