//! Dispatcher (§4.6): bounded-parallel application of the "clear
//! admission" mutation, with first-error cancellation, a success count,
//! and one observability event per successful eviction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::PreemptionError;
use crate::hook::{AdmissionHook, Origin};
use crate::model::{PoolName, Workload};

/// The sole tunable constant of the dispatcher; not user-configurable in
/// this core (§6).
pub const PARALLELISM: usize = 8;

/// Apply the "clear admission" mutation to every target in `targets`,
/// bounded to [`PARALLELISM`] concurrent tasks. On the first task that
/// reports an error, an internal cancellation token (a child of
/// `parent_cancellation`, so the cancellation never propagates back to
/// the caller, §5) is cancelled; in-flight and not-yet-started tasks
/// observe it and return without applying their mutation. Returns the
/// count of confirmed successes and the first error encountered, if any.
pub async fn dispatch<H: AdmissionHook>(
    hook: &H,
    targets: Vec<Workload>,
    origin_pool: &PoolName,
    parent_cancellation: &CancellationToken,
) -> (usize, Option<PreemptionError>) {
    let internal_cancellation = parent_cancellation.child_token();
    let success_count = AtomicUsize::new(0);
    let first_error: OnceLock<PreemptionError> = OnceLock::new();

    let success_count = &success_count;
    let first_error = &first_error;
    let internal_cancellation = &internal_cancellation;

    stream::iter(targets.into_iter().map(|target| {
        let origin = if target.pool == *origin_pool {
            Origin::ClusterQueue
        } else {
            Origin::Cohort
        };
        async move {
            if internal_cancellation.is_cancelled() {
                debug!(workload_key = %target.key, "skipping eviction, batch already cancelled");
                return;
            }
            match hook.clear_admission(&target).await {
                Ok(()) => {
                    success_count.fetch_add(1, Ordering::SeqCst);
                    hook.record_preempted(&target, origin).await;
                }
                Err(err) => {
                    warn!(workload_key = %target.key, error = %err, "eviction mutation failed");
                    let _ = first_error.set(err);
                    internal_cancellation.cancel();
                }
            }
        }
    }))
    .buffer_unordered(PARALLELISM)
    .collect::<Vec<()>>()
    .await;

    (success_count.load(Ordering::SeqCst), first_error.get().cloned())
}
