use super::commands::OutputFormat;
use std::path::Path;
use warden_supervisor::SupervisorStatus;
use warden_types::{WardenError, WardenResult};

pub fn write_status_file(path: &Path, status: &SupervisorStatus) -> WardenResult<()> {
    let json = serde_json::to_string_pretty(status)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn read_status_file(path: &Path) -> WardenResult<SupervisorStatus> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| WardenError::Serialization(format!("Invalid status file {:?}: {}", path, e)))
}

pub fn show_status(path: &Path, format: &OutputFormat) -> WardenResult<()> {
    if !path.exists() {
        println!("\x1b[38;5;245mNo status file found at {:?}\x1b[0m", path);
        println!("Start the supervisor with '\x1b[38;5;51mwarden run --status-file {}\x1b[0m'", path.display());
        return Ok(());
    }

    let status = read_status_file(path)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Text => {
            let colour = if status.state.is_terminal() { "196" } else { "46" };
            println!("\x1b[38;5;{}m* Backend supervisor: {}\x1b[0m", colour, status.state.as_str().to_uppercase());
            println!("\x1b[38;5;245m{}\x1b[0m", "═".repeat(50));
            match status.pid {
                Some(pid) => println!("Backend PID:     \x1b[38;5;226m{}\x1b[0m", pid),
                None => println!("Backend PID:     \x1b[38;5;245mnone\x1b[0m"),
            }
            println!("Generation:      \x1b[38;5;51m{}\x1b[0m", status.generation);
            println!("Restarts:        \x1b[38;5;51m{}\x1b[0m", status.restart_count);
            println!("Failed checks:   \x1b[38;5;51m{}\x1b[0m", status.consecutive_failures);
            println!("Watchdog:        \x1b[38;5;51m{}\x1b[0m", if status.watchdog_active { "active" } else { "stopped" });
            let secs = status.uptime_secs();
            println!("Since start:     \x1b[38;5;51m{}h {}m {}s\x1b[0m", secs / 3600, (secs % 3600) / 60, secs % 60);
            if let Some(ref err) = status.last_error {
                println!("Last error:      \x1b[38;5;196m{}\x1b[0m", err);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use warden_types::SupervisorState;

    #[test]
    fn test_status_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warden-status.json");

        let mut status = SupervisorStatus::new(Utc::now());
        status.state = SupervisorState::Monitoring;
        status.pid = Some(4242);
        status.restart_count = 2;

        write_status_file(&path, &status).unwrap();
        assert_eq!(read_status_file(&path).unwrap(), status);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"monitoring\""));
    }

    #[test]
    fn test_corrupt_status_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warden-status.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(read_status_file(&path), Err(WardenError::Serialization(_))));
    }
}
