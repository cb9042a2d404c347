//! Error types for the preemption core.

use thiserror::Error;

use crate::model::PoolName;

/// Result type for preemption operations.
pub type Result<T> = std::result::Result<T, PreemptionError>;

/// Errors the preemption core can surface. Per §7, the absence of
/// candidates and an infeasible candidate set are *not* errors — they are
/// encoded as `(0, None)` return values, not variants here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreemptionError {
    /// The incoming workload names a pool absent from the snapshot. This
    /// is a caller contract violation, not a runtime condition the core
    /// expects in normal operation.
    #[error("pool not found in snapshot: {pool}")]
    PoolNotFound {
        /// The missing pool's name.
        pool: PoolName,
    },

    /// The injected mutation hook failed to clear admission for a target
    /// workload. Surfaced as the dispatcher's first error (§4.6, §7).
    #[error("failed to clear admission for workload {workload_key}: {reason}")]
    MutationFailed {
        /// Key of the workload the mutation targeted.
        workload_key: String,
        /// Description of why the mutation failed.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_pool_not_found() {
        let err = PreemptionError::PoolNotFound {
            pool: PoolName::new("standalone"),
        };
        assert_eq!(err.to_string(), "pool not found in snapshot: standalone");
    }

    #[test]
    fn error_display_mutation_failed() {
        let err = PreemptionError::MutationFailed {
            workload_key: "job-1".into(),
            reason: "store unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to clear admission for workload job-1: store unavailable"
        );
    }

    #[test]
    fn error_clone_and_eq() {
        let err1 = PreemptionError::MutationFailed {
            workload_key: "job-1".into(),
            reason: "timeout".into(),
        };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
