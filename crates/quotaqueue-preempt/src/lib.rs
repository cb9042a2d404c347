//! Preemption core for a batch workload admission controller.
//!
//! When an incoming batch workload cannot be admitted to its target quota
//! pool because the pool (or the cohort it shares quota with) is
//! saturated, this crate decides which already-admitted workloads must be
//! evicted to make room, and issues those evictions.
//!
//! The entry point is [`preempt`], which glues together:
//!
//! - [`fit`]: can a workload's demand be admitted without borrowing?
//! - [`borrowing`]: is a pool consuming more than its nominal minimum?
//! - [`candidates`]: which admitted workloads are eligible for preemption?
//! - [`ordering`]: in what order should eligible candidates be preempted?
//! - [`solver`]: the minimal (not necessarily minimum) eviction set.
//! - [`dispatch`]: bounded-parallel application of the eviction mutation.
//!
//! Flavor assignment (deciding which named flavor an incoming workload
//! would run on, and whether that requires preemption), the authoritative
//! cluster store, and the quota snapshot builder are external
//! collaborators; this crate only consumes their output through
//! [`model::Assignment`], [`snapshot::Snapshot`], and the injectable
//! [`hook::AdmissionHook`].
//!
//! # Example
//!
//! ```
//! use quotaqueue_preempt::hook::NoOpAdmissionHook;
//! use quotaqueue_preempt::model::{
//!     Assignment, FlavorAssignmentMode, FlavorName, PodSet, PodSetAssignment, Pool, PoolName,
//!     QuotaLimits, ResourceName, Workload, WorkloadKey,
//! };
//! use quotaqueue_preempt::snapshot::Snapshot;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() {
//! let low_priority = Workload::new(WorkloadKey::new("low"), -1, PoolName::new("standalone"))
//!     .with_pod_set(
//!         PodSet::new("main")
//!             .with_request(ResourceName::new("cpu"), 2)
//!             .with_assigned_flavor(ResourceName::new("cpu"), FlavorName::new("default")),
//!     );
//! let pool = Pool::new(PoolName::new("standalone"))
//!     .with_quota(ResourceName::new("cpu"), FlavorName::new("default"), QuotaLimits::new(6))
//!     .with_admitted(low_priority);
//! let mut snapshot = Snapshot::new();
//! snapshot.insert_pool(pool);
//!
//! let incoming = Workload::new(WorkloadKey::new("incoming"), 1, PoolName::new("standalone"))
//!     .with_pod_set(PodSet::new("main").with_request(ResourceName::new("cpu"), 2));
//! let mut pod_set_assignment = PodSetAssignment::default();
//! pod_set_assignment.0.insert(
//!     ResourceName::new("cpu"),
//!     (FlavorName::new("default"), FlavorAssignmentMode::Preempt),
//! );
//! let assignment = Assignment(vec![pod_set_assignment]);
//!
//! let hook = NoOpAdmissionHook::new();
//! let cancellation = CancellationToken::new();
//! let (evicted, error) = quotaqueue_preempt::preempt(
//!     &hook,
//!     &incoming,
//!     &assignment,
//!     &mut snapshot,
//!     &cancellation,
//! )
//! .await
//! .expect("standalone pool is present in the snapshot");
//! assert_eq!(evicted, 1);
//! assert!(error.is_none());
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod borrowing;
pub mod candidates;
pub mod dispatch;
pub mod error;
pub mod fit;
pub mod hook;
pub mod model;
pub mod ordering;
pub mod preempt;
pub mod snapshot;
pub mod solver;

pub use dispatch::PARALLELISM;
pub use error::{PreemptionError, Result};
pub use hook::{AdmissionHook, FailingAdmissionHook, NoOpAdmissionHook, Origin};
pub use preempt::preempt;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dispatch::PARALLELISM;
    pub use crate::error::{PreemptionError, Result};
    pub use crate::hook::{AdmissionHook, FailingAdmissionHook, NoOpAdmissionHook, Origin};
    pub use crate::model::{
        Assignment, Cohort, CohortName, Demand, FlavorAssignmentMode, FlavorName, FlavorSet, Pool,
        PoolName, PoolPreemptionPolicy, QuotaLimits, ReclaimPolicy, ResourceName, Workload,
        WorkloadKey, WithinPoolPolicy,
    };
    pub use crate::preempt::preempt;
    pub use crate::snapshot::Snapshot;
}
