use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Volume mounts keyed by host path.
pub type Volumes = BTreeMap<String, Mount>;

/// Access mode of a bind mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountMode {
    #[default]
    Rw,
    Ro,
}

impl MountMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MountMode::Rw => "rw",
            MountMode::Ro => "ro",
        }
    }
}

impl fmt::Display for MountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MountMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rw" => Ok(MountMode::Rw),
            "ro" => Ok(MountMode::Ro),
            _ => Err(ModelError::InvalidMountMode(s.to_string())),
        }
    }
}

/// Where a host path appears inside the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    /// Path inside the container.
    pub bind: String,
    #[serde(default)]
    pub mode: MountMode,
}

impl Mount {
    pub fn new(bind: impl Into<String>, mode: MountMode) -> Self {
        Self {
            bind: bind.into(),
            mode,
        }
    }

    /// Render as a runtime bind string: `host:bind:mode`.
    pub fn bind_for(&self, host: &str) -> String {
        format!("{host}:{}:{}", self.bind, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_string_layout() {
        let m = Mount::new("/volumes/app/data", MountMode::Ro);
        assert_eq!(m.bind_for("/srv/data"), "/srv/data:/volumes/app/data:ro");
    }

    #[test]
    fn mode_defaults_to_rw_when_absent() {
        let m: Mount = serde_json::from_str(r#"{"bind":"/volumes/x"}"#).unwrap();
        assert_eq!(m.mode, MountMode::Rw);
    }

    #[test]
    fn mode_parse() {
        assert_eq!(" RO ".parse::<MountMode>().unwrap(), MountMode::Ro);
        assert!(matches!(
            "rx".parse::<MountMode>(),
            Err(ModelError::InvalidMountMode(_))
        ));
    }
}
