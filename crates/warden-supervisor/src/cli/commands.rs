use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use warden_supervisor::RunMode;

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "warden")]
#[command(version = BUILD_VERSION)]
#[command(about = "Warden - Launches, health-checks and recovers the desktop backend")]
#[command(long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "FILE", help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(short = 'd', long, global = true, value_name = "DIR", env = "WARDEN_HOME", help = "Warden state directory (config, PID and status files)")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "MODE", value_parser = parse_mode, help = "Backend run mode (development, production)")]
    pub mode: Option<RunMode>,

    #[arg(long, global = true, value_name = "PORT", help = "Backend port on 127.0.0.1")]
    pub port: Option<u16>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Write logs to file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text", help = "Output format")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Supervise the backend until quit or shutdown")]
    #[command(long_about = "Reclaim stale resources, launch the backend, wait for it to become ready and keep it alive.\n\nCtrl+C or SIGTERM stops the backend and exits.")]
    Run {
        #[arg(long, help = "Restart automatically instead of prompting")]
        headless: bool,
        #[arg(long, value_name = "FILE", help = "Write PID to file")]
        pid_file: Option<PathBuf>,
        #[arg(long, value_name = "FILE", help = "Write status JSON to file on every change")]
        status_file: Option<PathBuf>,
    },

    #[command(about = "Probe the backend health endpoint once")]
    Check,

    #[command(about = "Terminate stale backend processes and free the port")]
    Reclaim,

    #[command(about = "Show the status written by a running supervisor")]
    Status {
        #[arg(long, value_name = "FILE", help = "Status file to read")]
        status_file: Option<PathBuf>,
    },

    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    #[command(about = "Show version information")]
    Version,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Show current configuration")]
    Show,
    #[command(about = "Validate configuration")]
    Validate,
    #[command(about = "Write the default configuration")]
    Init {
        #[arg(short, long, help = "Overwrite existing configuration")]
        force: bool,
    },
}

fn parse_mode(value: &str) -> Result<RunMode, String> {
    RunMode::parse(value).ok_or_else(|| format!("unknown mode '{}' (expected development or production)", value))
}
