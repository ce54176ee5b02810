use super::commands::ConfigAction;
use std::path::Path;
use warden_supervisor::WardenConfig;
use warden_types::{WardenError, WardenResult};

pub fn handle_config(config_path: &Path, action: Option<&ConfigAction>) -> WardenResult<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            if config_path.exists() {
                let content = std::fs::read_to_string(config_path)
                    .map_err(|e| WardenError::Config(format!("Failed to read config: {}", e)))?;
                println!("{}", content);
            } else {
                println!("\x1b[38;5;245mNo configuration file found at {:?}, defaults apply:\x1b[0m", config_path);
                println!("{}", toml::to_string_pretty(&WardenConfig::default())?);
                println!("Run '\x1b[38;5;51mwarden config init\x1b[0m' to write them");
            }
        }
        Some(ConfigAction::Validate) => {
            let config = WardenConfig::load(config_path)?;
            println!("\x1b[38;5;46m[+]\x1b[0m Configuration is valid");
            println!("{}", config);
        }
        Some(ConfigAction::Init { force }) => {
            if config_path.exists() && !*force {
                println!("\x1b[38;5;226m[*]\x1b[0m Configuration already exists at {:?}", config_path);
                println!("Use '\x1b[38;5;51m--force\x1b[0m' to overwrite");
                return Ok(());
            }
            WardenConfig::default().save(config_path)?;
            println!("\x1b[38;5;46m[+]\x1b[0m Configuration written to {:?}", config_path);
        }
    }
    Ok(())
}
