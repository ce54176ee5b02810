use super::commands::Cli;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use warden_supervisor::LoggingConfig;
use warden_types::{WardenError, WardenResult};

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn init_logging(cli: &Cli, logging: &LoggingConfig) -> WardenResult<()> {
    let level = if cli.quiet {
        "warn".to_string()
    } else {
        match cli.verbose {
            0 => logging.level.to_string(),
            1 => "info,warden_supervisor=debug".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter);

    let log_file = cli.log_file.clone().or_else(|| logging.file.clone());

    if let Some(ref log_file) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .map_err(|e| WardenError::Config(format!("Failed to open log file {:?}: {}", log_file, e)))?;
        let file_layer = fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false);
        if logging.json {
            subscriber.with(file_layer.json()).init();
        } else {
            subscriber.with(file_layer).init();
        }
    } else if logging.json {
        subscriber.with(fmt::layer().json()).init();
    } else {
        let stdout_layer = fmt::layer()
            .with_target(cli.verbose >= 2);
        subscriber.with(stdout_layer).init();
    }

    Ok(())
}

pub fn default_warden_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("warden"))
        .unwrap_or_else(|| PathBuf::from(".warden"))
}

pub fn print_banner() {
    println!();
    println!("  \x1b[1;38;5;46mwarden\x1b[0m \x1b[38;5;245mv{} - backend supervisor\x1b[0m", BUILD_VERSION);
    println!();
}

pub fn show_version() {
    print_banner();
    println!("\x1b[38;5;46mBuild Information\x1b[0m");
    println!("\x1b[38;5;245m{}\x1b[0m", "═".repeat(50));
    println!("  Version:   \x1b[38;5;51m{}\x1b[0m", BUILD_VERSION);
    println!("  OS:        \x1b[38;5;245m{}\x1b[0m", std::env::consts::OS);
    println!("  Arch:      \x1b[38;5;245m{}\x1b[0m", std::env::consts::ARCH);
    println!("  Profile:   \x1b[38;5;245m{}\x1b[0m", if cfg!(debug_assertions) { "debug" } else { "release" });
    println!();
}
