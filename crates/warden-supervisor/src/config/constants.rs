pub const CONFIG_FILE_NAME: &str = "warden.toml";
pub const STATUS_FILE_NAME: &str = "warden-status.json";

pub const DEFAULT_READINESS_MAX_ATTEMPTS: u32 = 60;
pub const DEFAULT_READINESS_INTERVAL_MS: u64 = 500;
pub const DEFAULT_READINESS_TIMEOUT_MS: u64 = 1_000;
pub const DEFAULT_WATCHDOG_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_WATCHDOG_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 500;
pub const DEFAULT_STOP_GRACE_MS: u64 = 3_000;

pub const DEFAULT_DATA_DIR_ENV: &str = "BACKEND_DATA_DIR";
pub const DEFAULT_ENTRY: &str = "main.py";

#[cfg(windows)]
pub const DEFAULT_INTERPRETER: &str = "python";
#[cfg(not(windows))]
pub const DEFAULT_INTERPRETER: &str = "python3";

#[cfg(windows)]
pub const DEFAULT_EXECUTABLE: &str = "backend.exe";
#[cfg(not(windows))]
pub const DEFAULT_EXECUTABLE: &str = "backend";
