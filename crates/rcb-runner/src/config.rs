use std::{path::PathBuf, time::Duration};

use anyhow::{Context, bail};

use rcb_core::SupervisorConfig;
use rcb_observe::{LoggerConfig, LoggerFormat, LoggerLevel};

pub const ENV_LOG_LEVEL: &str = "RCB_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "RCB_LOG_FORMAT";
pub const ENV_BACKUP_LOG: &str = "RCB_BACKUP_LOG";
pub const ENV_STOP_GRACE: &str = "RCB_STOP_GRACE_SECS";

pub const USAGE: &str = "usage: rcb-runner <launch-spec.json | ->";

/// Where the launch spec is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    File(PathBuf),
    Stdin,
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub spec: SpecSource,
    pub logger: LoggerConfig,
    pub supervisor: SupervisorConfig,
}

impl RunnerConfig {
    /// Build from process arguments (without argv[0]) and an environment lookup.
    pub fn from_parts<F>(args: &[String], var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let spec = match args {
            [one] if one == "-" => SpecSource::Stdin,
            [one] => SpecSource::File(PathBuf::from(one)),
            _ => bail!(USAGE),
        };

        let mut logger = LoggerConfig::default();
        if let Some(level) = var(ENV_LOG_LEVEL) {
            logger = logger.with_level(LoggerLevel::new(level).context(ENV_LOG_LEVEL)?);
        }
        if let Some(format) = var(ENV_LOG_FORMAT) {
            logger = logger.with_format(format.parse::<LoggerFormat>().context(ENV_LOG_FORMAT)?);
        }

        let mut supervisor = SupervisorConfig::default();
        if let Some(path) = var(ENV_BACKUP_LOG) {
            supervisor.log_path = PathBuf::from(path);
        }
        if let Some(secs) = var(ENV_STOP_GRACE) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("{ENV_STOP_GRACE}: expected whole seconds, got {secs:?}"))?;
            supervisor.stop_grace = Duration::from_secs(secs);
        }

        Ok(Self {
            spec,
            logger,
            supervisor,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let cfg = RunnerConfig::from_parts(&args(&["spec.json"]), env(&[])).unwrap();
        assert_eq!(cfg.spec, SpecSource::File(PathBuf::from("spec.json")));
        assert_eq!(cfg.supervisor.log_path, PathBuf::from("backup.log"));
        assert_eq!(cfg.supervisor.stop_grace, Duration::from_secs(5));
        assert_eq!(cfg.logger.level.as_str(), "info");
        assert_eq!(cfg.logger.format, LoggerFormat::Text);
    }

    #[test]
    fn dash_reads_stdin() {
        let cfg = RunnerConfig::from_parts(&args(&["-"]), env(&[])).unwrap();
        assert_eq!(cfg.spec, SpecSource::Stdin);
    }

    #[test]
    fn env_overrides() {
        let cfg = RunnerConfig::from_parts(
            &args(&["spec.json"]),
            env(&[
                (ENV_LOG_LEVEL, "debug"),
                (ENV_LOG_FORMAT, "json"),
                (ENV_BACKUP_LOG, "/var/log/rcb/backup.log"),
                (ENV_STOP_GRACE, "20"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.logger.level.as_str(), "debug");
        assert_eq!(cfg.logger.format, LoggerFormat::Json);
        assert_eq!(cfg.supervisor.log_path, PathBuf::from("/var/log/rcb/backup.log"));
        assert_eq!(cfg.supervisor.stop_grace, Duration::from_secs(20));
        assert_eq!(cfg.supervisor.stop_deadline(), Duration::from_secs(20));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(RunnerConfig::from_parts(&args(&[]), env(&[])).is_err());
        assert!(RunnerConfig::from_parts(&args(&["a", "b"]), env(&[])).is_err());
        assert!(
            RunnerConfig::from_parts(&args(&["a"]), env(&[(ENV_STOP_GRACE, "soon")])).is_err()
        );
        assert!(
            RunnerConfig::from_parts(&args(&["a"]), env(&[(ENV_LOG_FORMAT, "xml")])).is_err()
        );
    }
}
