use std::{path::PathBuf, time::Duration};

/// Grace period handed to the runtime when stopping a worker on shutdown.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);

/// How long the supervisor waits for the stop request itself before moving on.
pub const DEFAULT_STOP_WAIT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Append-mode file receiving every worker output line.
    pub log_path: PathBuf,
    pub stop_grace: Duration,
    /// Upper bound on a single stop call; never shorter than `stop_grace`.
    pub stop_wait: Duration,
    /// Prefix of generated worker container names.
    pub name_prefix: String,
}

impl SupervisorConfig {
    #[inline]
    pub fn stop_deadline(&self) -> Duration {
        self.stop_wait.max(self.stop_grace)
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("backup.log"),
            stop_grace: DEFAULT_STOP_GRACE,
            stop_wait: DEFAULT_STOP_WAIT,
            name_prefix: "backup-process".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_deadline_never_undercuts_grace() {
        let cfg = SupervisorConfig {
            stop_grace: Duration::from_secs(30),
            ..Default::default()
        };
        assert_eq!(cfg.stop_deadline(), Duration::from_secs(30));
        assert_eq!(SupervisorConfig::default().stop_deadline(), DEFAULT_STOP_WAIT);
    }
}
