use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Env, ModelError, Volumes};

/// Labels attached to the worker container.
pub type Labels = BTreeMap<String, String>;

/// Everything needed to start one backup worker container.
///
/// Produced by the caller (discovery/config layers) and consumed read-only by the supervisor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSpec {
    /// Image reference (e.g. `"zettaio/restic-compose-backup:0.7.1"`).
    pub image: String,
    /// Command to run.
    ///
    /// If `None`, the image's default command is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    /// Caller-supplied environment; the worker marker is added on launch.
    #[serde(default, skip_serializing_if = "Env::is_empty")]
    pub environment: Env,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub volumes: Volumes,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: Labels,
    /// Container whose network namespace the worker joins.
    pub network_attachment: String,
    /// Working directory inside the worker.
    ///
    /// If `None`, the supervising process's current working directory is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl LaunchSpec {
    pub fn new(image: impl Into<String>, network_attachment: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            network_attachment: network_attachment.into(),
            ..Default::default()
        }
    }

    pub fn with_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = Some(command.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.push(key, value);
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_volume(mut self, host: impl Into<String>, mount: crate::Mount) -> Self {
        self.volumes.insert(host.into(), mount);
        self
    }

    /// Reject specs the runtime could never start.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.image.trim().is_empty() {
            return Err(ModelError::Missing("image"));
        }
        if self.network_attachment.trim().is_empty() {
            return Err(ModelError::Missing("networkAttachment"));
        }
        Ok(())
    }

    /// Runtime network mode joining the attachment's network stack.
    pub fn network_mode(&self) -> String {
        format!("container:{}", self.network_attachment)
    }

    /// Volume mounts rendered as `host:bind:mode`.
    pub fn binds(&self) -> Vec<String> {
        self.volumes
            .iter()
            .map(|(host, mount)| mount.bind_for(host))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mount, MountMode};

    #[test]
    fn network_mode_reuses_attachment() {
        let spec = LaunchSpec::new("restic:latest", "abc123");
        assert_eq!(spec.network_mode(), "container:abc123");
    }

    #[test]
    fn validate_requires_image_and_attachment() {
        assert_eq!(
            LaunchSpec::new("", "abc").validate(),
            Err(ModelError::Missing("image"))
        );
        assert_eq!(
            LaunchSpec::new("img", " ").validate(),
            Err(ModelError::Missing("networkAttachment"))
        );
        assert!(LaunchSpec::new("img", "abc").validate().is_ok());
    }

    #[test]
    fn deserialize_camel_case_spec() {
        let json = r#"{
            "image": "zettaio/restic-compose-backup:0.7.1",
            "command": ["rcb", "start-backup-process"],
            "environment": [{"key": "RESTIC_REPOSITORY", "value": "/restic_data"}],
            "volumes": {"/srv/db": {"bind": "/volumes/db", "mode": "ro"}},
            "labels": {"restic-compose-backup.process": "true"},
            "networkAttachment": "f00dbabe"
        }"#;

        let spec: LaunchSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.command.as_deref().map(|c| c.len()), Some(2));
        assert_eq!(spec.environment.get("RESTIC_REPOSITORY"), Some("/restic_data"));
        assert_eq!(spec.binds(), vec!["/srv/db:/volumes/db:ro".to_string()]);
        assert_eq!(
            spec.volumes.get("/srv/db"),
            Some(&Mount::new("/volumes/db", MountMode::Ro))
        );
        assert!(spec.working_dir.is_none());
    }
}
