use serde::{Deserialize, Serialize};

use crate::{KeyValue, WORKER_MARKER_KEY, WORKER_MARKER_VALUE};

/// Environment variables passed to the worker container.
///
/// Internally stored as a list of key–value pairs and serialized as a transparent array wrapper.
/// Later entries override earlier ones with the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(pub Vec<KeyValue>);

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// Get the value for a key, returning the last matching entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|kv| kv.key() == key)
            .map(|kv| kv.value())
    }

    /// Append a key–value pair to the environment.
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push(KeyValue::new(key, value));
    }

    /// Effective worker environment: caller entries with the worker marker forced last.
    ///
    /// Any caller-supplied entry for [`WORKER_MARKER_KEY`] is dropped, so the marker value can never be overridden.
    pub fn with_worker_marker(&self) -> Env {
        let mut out: Vec<KeyValue> = self
            .0
            .iter()
            .filter(|kv| kv.key() != WORKER_MARKER_KEY)
            .cloned()
            .collect();
        out.push(KeyValue::new(WORKER_MARKER_KEY, WORKER_MARKER_VALUE));
        Env(out)
    }

    /// Render as `KEY=VALUE` strings.
    ///
    /// Duplicate keys collapse to their last value, keeping the position of the first occurrence.
    pub fn render(&self) -> Vec<String> {
        let mut latest: Vec<&KeyValue> = Vec::with_capacity(self.0.len());
        for kv in &self.0 {
            match latest.iter_mut().find(|seen| seen.key() == kv.key()) {
                Some(seen) => *seen = kv,
                None => latest.push(kv),
            }
        }
        latest.into_iter().map(KeyValue::render).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Env
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Env(iter
            .into_iter()
            .map(|(k, v)| KeyValue::new(k, v))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_override_last_wins() {
        let mut env = Env::new();
        env.push("FOO", "one");
        env.push("BAR", "x");
        env.push("FOO", "two");

        assert_eq!(env.get("FOO"), Some("two"));
        assert_eq!(env.get("BAR"), Some("x"));
        assert!(env.get("BAZ").is_none());
    }

    #[test]
    fn marker_is_added_to_empty_env() {
        let env = Env::new().with_worker_marker();
        assert_eq!(env.len(), 1);
        assert_eq!(env.get(WORKER_MARKER_KEY), Some(WORKER_MARKER_VALUE));
    }

    #[test]
    fn marker_cannot_be_overridden_by_caller() {
        let env: Env = [
            (WORKER_MARKER_KEY, "false"),
            ("RESTIC_REPOSITORY", "/restic_data"),
            (WORKER_MARKER_KEY, "nope"),
        ]
        .into_iter()
        .collect();

        let effective = env.with_worker_marker();
        assert_eq!(effective.get(WORKER_MARKER_KEY), Some(WORKER_MARKER_VALUE));
        assert_eq!(
            effective.iter().filter(|kv| kv.key() == WORKER_MARKER_KEY).count(),
            1
        );
        assert_eq!(effective.get("RESTIC_REPOSITORY"), Some("/restic_data"));
    }

    #[test]
    fn render_collapses_duplicates_in_first_seen_order() {
        let env: Env = [("A", "1"), ("B", "2"), ("A", "3")].into_iter().collect();
        assert_eq!(env.render(), vec!["A=3".to_string(), "B=2".to_string()]);
    }

    #[test]
    fn serde_is_a_plain_array() {
        let mut env = Env::new();
        env.push("FOO", "bar");

        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"[{"key":"FOO","value":"bar"}]"#);

        let back: Env = serde_json::from_str(&json).unwrap();
        assert_eq!(back, env);
    }
}
