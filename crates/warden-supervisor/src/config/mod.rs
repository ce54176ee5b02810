mod backend;
mod constants;
mod logging;
mod supervisor;
mod types;
mod warden;

pub use backend::BackendConfig;
pub use constants::*;
pub use logging::LoggingConfig;
pub use supervisor::SupervisorConfig;
pub use types::*;
pub use warden::WardenConfig;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_validation() {
        let config = WardenConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_health_url() {
        let config = SupervisorConfig::default();
        assert_eq!(config.health_url(), "http://127.0.0.1:8765/health");
    }

    #[test]
    fn test_invalid_port() {
        let mut config = SupervisorConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let mut config = SupervisorConfig::default();
        config.failure_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_durations_rejected() {
        let mut config = SupervisorConfig::default();
        config.watchdog_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = SupervisorConfig::default();
        config.readiness_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = SupervisorConfig::default();
        config.settle_delay_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_health_path_must_be_absolute() {
        let mut config = SupervisorConfig::default();
        config.health_path = "health".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_artifact_and_working_dir() {
        let mut backend = BackendConfig {
            root: PathBuf::from("/opt/app/backend"),
            entry: PathBuf::from("server/main.py"),
            executable: PathBuf::from("bin/backend"),
            ..Default::default()
        };

        backend.mode = RunMode::Development;
        assert_eq!(backend.artifact_path(), PathBuf::from("/opt/app/backend/server/main.py"));
        assert_eq!(backend.working_dir(), PathBuf::from("/opt/app/backend/server"));
        assert_eq!(backend.reclaimable_process_name(), None);

        backend.mode = RunMode::Production;
        assert_eq!(backend.artifact_path(), PathBuf::from("/opt/app/backend/bin/backend"));
        assert_eq!(backend.working_dir(), PathBuf::from("/opt/app/backend/bin"));
        assert_eq!(backend.reclaimable_process_name(), Some("backend".to_string()));
    }

    #[test]
    fn test_run_mode_parsing() {
        assert_eq!(RunMode::parse("dev"), Some(RunMode::Development));
        assert_eq!(RunMode::parse(" Production "), Some(RunMode::Production));
        assert_eq!(RunMode::parse("staging"), None);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: WardenConfig = toml::from_str(
            r#"
            [supervisor]
            port = 9100
            failure_threshold = 5

            [backend]
            mode = "development"
            "#,
        )
        .expect("Failed to parse");

        assert_eq!(parsed.supervisor.port, 9100);
        assert_eq!(parsed.supervisor.failure_threshold, 5);
        assert_eq!(parsed.supervisor.health_path, "/health");
        assert_eq!(parsed.backend.mode, RunMode::Development);
        assert!(parsed.logging.capture_backend_output);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = WardenConfig::default();
        config.supervisor.watchdog_interval_ms = 2_000;
        config.save(&path).expect("Failed to save");

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: WardenConfig = toml::from_str(&contents).expect("Failed to parse");
        assert_eq!(parsed.supervisor, config.supervisor);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[supervisor\nport = ").unwrap();

        let err = WardenConfig::load(&path).unwrap_err();
        assert!(matches!(err, warden_types::WardenError::Config(_)));
    }
}
