use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use warden_types::{WardenError, WardenResult};

use crate::config::{BackendConfig, RunMode};

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
    pub envs: Vec<(String, OsString)>,
    pub mode: RunMode,
}

impl LaunchPlan {
    pub fn for_backend(config: &BackendConfig) -> WardenResult<Self> {
        let artifact = config.artifact_path();
        if !artifact.is_file() {
            return Err(WardenError::Launch(format!(
                "Backend {} not found at {}",
                match config.mode {
                    RunMode::Development => "entry module",
                    RunMode::Production => "executable",
                },
                artifact.display()
            )));
        }

        let cwd = config.working_dir();
        let extra_args = config.args.iter().map(OsString::from);

        let plan = match config.mode {
            RunMode::Development => {
                let mut args = vec![artifact.into_os_string()];
                args.extend(extra_args);
                LaunchPlan {
                    program: OsString::from(&config.interpreter),
                    args,
                    cwd,
                    envs: vec![("PYTHONUNBUFFERED".to_string(), OsString::from("1"))],
                    mode: RunMode::Development,
                }
            }
            RunMode::Production => LaunchPlan {
                program: artifact.into_os_string(),
                args: extra_args.collect(),
                cwd,
                envs: vec![(
                    config.data_dir_env.clone(),
                    config.data_dir.clone().into_os_string(),
                )],
                mode: RunMode::Production,
            },
        };

        Ok(plan)
    }

    pub fn command(&self, capture_output: bool) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.cwd)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if capture_output {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        #[cfg(target_os = "windows")]
        cmd.creation_flags(CREATE_NO_WINDOW);

        cmd
    }
}

impl fmt::Display for LaunchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        write!(f, " (cwd: {})", self.cwd.display())
    }
}
