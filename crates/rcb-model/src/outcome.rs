use serde::{Deserialize, Serialize};

use crate::SIGNALED_EXIT_STATUS;

/// Terminal result of one supervised worker run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    /// Worker ran to completion; exit code as reported by the runtime.
    Completed { exit_code: i64 },
    /// Worker was stopped because shutdown was requested.
    Signaled,
}

impl Outcome {
    /// Status the hosting process should exit with.
    ///
    /// Completed runs pass the worker's code through; a code outside `i32` maps to 1.
    /// Signaled runs map to [`SIGNALED_EXIT_STATUS`].
    pub fn exit_status(&self) -> i32 {
        match self {
            Outcome::Completed { exit_code } => i32::try_from(*exit_code).unwrap_or(1),
            Outcome::Signaled => SIGNALED_EXIT_STATUS,
        }
    }

    pub fn is_signaled(&self) -> bool {
        matches!(self, Outcome::Signaled)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed { exit_code: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_mapping() {
        assert_eq!(Outcome::Completed { exit_code: 0 }.exit_status(), 0);
        assert_eq!(Outcome::Completed { exit_code: 3 }.exit_status(), 3);
        assert_eq!(Outcome::Completed { exit_code: -1 }.exit_status(), -1);
        assert_eq!(Outcome::Signaled.exit_status(), 143);
    }

    #[test]
    fn out_of_range_exit_code_is_a_failure() {
        assert_eq!(Outcome::Completed { exit_code: 1 << 32 }.exit_status(), 1);
        assert_eq!(Outcome::Completed { exit_code: i64::MIN }.exit_status(), 1);
    }

    #[test]
    fn success_only_for_zero() {
        assert!(Outcome::Completed { exit_code: 0 }.is_success());
        assert!(!Outcome::Completed { exit_code: 1 }.is_success());
        assert!(!Outcome::Signaled.is_success());
        assert!(Outcome::Signaled.is_signaled());
    }
}
