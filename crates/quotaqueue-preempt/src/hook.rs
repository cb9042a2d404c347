//! The injectable collaborator the dispatcher drives (§6): a stable seam
//! for testing eviction dispatch without a real cluster store.

use parking_lot::Mutex;

use crate::error::Result;
use crate::model::Workload;

/// Names the pool a preempted workload's origin was attributed to, for the
/// event message emitted on successful eviction (§4.6, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The target's pool is the pool the incoming workload targets.
    ClusterQueue,
    /// The target's pool is a different member of the shared cohort.
    Cohort,
}

impl Origin {
    /// The event message naming this origin, per §6: `"Preempted by
    /// another workload in the <origin>"`.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::ClusterQueue => "Preempted by another workload in the ClusterQueue",
            Self::Cohort => "Preempted by another workload in the cohort",
        }
    }
}

/// The sole seam for testing eviction dispatch: persists "admission
/// cleared" to the authoritative store and records a `Preempted` event.
/// Both methods suspend only at the remote-store boundary (§5); the core
/// performs no I/O of its own. Implementations must make
/// `clear_admission` idempotent — an outer scheduler loop may retry the
/// same workload.
pub trait AdmissionHook: Send + Sync {
    /// Persist "admission cleared" for `workload` with a stable
    /// field-owner identity. Must be safe to call more than once for the
    /// same workload.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation could not be applied. The
    /// dispatcher treats this as the batch's first error and cancels
    /// remaining work (§4.6).
    fn clear_admission(&self, workload: &Workload) -> impl Future<Output = Result<()>> + Send;

    /// Record a normal-severity `Preempted` event on `workload` naming
    /// `origin`. Called only after a successful `clear_admission` (§4.6).
    fn record_preempted(&self, workload: &Workload, origin: Origin) -> impl Future<Output = ()> + Send;
}

/// A no-op hook for testing: every mutation succeeds, and both calls are
/// recorded for assertion. Mirrors the teacher lineage's
/// `NoOpEvictionHandler`.
#[derive(Debug, Default)]
pub struct NoOpAdmissionHook {
    cleared: Mutex<Vec<String>>,
    events: Mutex<Vec<(String, Origin)>>,
}

impl NoOpAdmissionHook {
    /// Build a fresh no-op hook with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys that `clear_admission` was called with, in call order.
    #[must_use]
    pub fn cleared_keys(&self) -> Vec<String> {
        self.cleared.lock().clone()
    }

    /// `(key, origin)` pairs that `record_preempted` was called with, in
    /// call order.
    #[must_use]
    pub fn recorded_events(&self) -> Vec<(String, Origin)> {
        self.events.lock().clone()
    }
}

impl AdmissionHook for NoOpAdmissionHook {
    async fn clear_admission(&self, workload: &Workload) -> Result<()> {
        self.cleared.lock().push(workload.key.as_str().to_string());
        Ok(())
    }

    async fn record_preempted(&self, workload: &Workload, origin: Origin) {
        self.events.lock().push((workload.key.as_str().to_string(), origin));
    }
}

/// A hook that fails `clear_admission` for one configured key and
/// succeeds for every other, for exercising first-error cancellation
/// (§4.6, §7).
#[derive(Debug)]
pub struct FailingAdmissionHook {
    failing_key: String,
    inner: NoOpAdmissionHook,
}

impl FailingAdmissionHook {
    /// Build a hook that fails whenever `clear_admission` is called for
    /// `failing_key`.
    #[must_use]
    pub fn new(failing_key: impl Into<String>) -> Self {
        Self {
            failing_key: failing_key.into(),
            inner: NoOpAdmissionHook::new(),
        }
    }

    /// Keys that `clear_admission` succeeded for, in call order.
    #[must_use]
    pub fn cleared_keys(&self) -> Vec<String> {
        self.inner.cleared_keys()
    }
}

impl AdmissionHook for FailingAdmissionHook {
    async fn clear_admission(&self, workload: &Workload) -> Result<()> {
        if workload.key.as_str() == self.failing_key {
            return Err(crate::error::PreemptionError::MutationFailed {
                workload_key: workload.key.as_str().to_string(),
                reason: "injected test failure".to_string(),
            });
        }
        self.inner.clear_admission(workload).await
    }

    async fn record_preempted(&self, workload: &Workload, origin: Origin) {
        self.inner.record_preempted(workload, origin).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PoolName, Workload, WorkloadKey};

    fn workload(key: &str) -> Workload {
        Workload::new(WorkloadKey::new(key), 0, PoolName::new("standalone"))
    }

    #[tokio::test]
    async fn origin_messages_match_spec_wording() {
        assert_eq!(
            Origin::ClusterQueue.message(),
            "Preempted by another workload in the ClusterQueue"
        );
        assert_eq!(Origin::Cohort.message(), "Preempted by another workload in the cohort");
    }

    #[tokio::test]
    async fn no_op_hook_records_calls() {
        let hook = NoOpAdmissionHook::new();
        hook.clear_admission(&workload("w1")).await.expect("no-op never fails");
        hook.record_preempted(&workload("w1"), Origin::ClusterQueue).await;
        assert_eq!(hook.cleared_keys(), vec!["w1".to_string()]);
        assert_eq!(hook.recorded_events(), vec![("w1".to_string(), Origin::ClusterQueue)]);
    }

    #[tokio::test]
    async fn failing_hook_fails_only_configured_key() {
        let hook = FailingAdmissionHook::new("bad");
        assert!(hook.clear_admission(&workload("good")).await.is_ok());
        assert!(hook.clear_admission(&workload("bad")).await.is_err());
        assert_eq!(hook.cleared_keys(), vec!["good".to_string()]);
    }
}
