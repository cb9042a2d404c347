//! Orchestration (§4.7): glues the fit predicate, candidate finder,
//! ordering, minimal-set solver, and dispatcher into one entry point.

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::candidates::find_candidates;
use crate::dispatch::dispatch;
use crate::error::{PreemptionError, Result};
use crate::hook::AdmissionHook;
use crate::model::{demand, flavors_to_preempt, Assignment, Workload};
use crate::ordering::sort_candidates;
use crate::snapshot::Snapshot;
use crate::solver::find_minimal_set;

/// Run one preemption attempt for `incoming` against `snapshot`, which is
/// mutated in place during the search and logically discarded by the
/// caller afterwards (§3). `cancellation` is the caller's token; internal
/// first-error cancellation never propagates back to it (§5).
///
/// Returns the count of confirmed evictions and the first error
/// encountered, if any. No candidates and an infeasible candidate set are
/// not errors — both return `(0, None)` (§7).
///
/// # Errors
///
/// Returns [`PreemptionError::PoolNotFound`] if `incoming.pool` is absent
/// from `snapshot` (a caller contract violation, not a runtime condition
/// the core expects), or the dispatcher's first mutation failure.
pub async fn preempt<H: AdmissionHook>(
    hook: &H,
    incoming: &Workload,
    assignment: &Assignment,
    snapshot: &mut Snapshot,
    cancellation: &CancellationToken,
) -> Result<(usize, Option<PreemptionError>)> {
    let flavors = flavors_to_preempt(assignment);

    let target_pool = snapshot
        .pool(&incoming.pool)
        .ok_or_else(|| PreemptionError::PoolNotFound {
            pool: incoming.pool.clone(),
        })?
        .clone();

    let mut candidates = find_candidates(incoming, &target_pool, &flavors, snapshot);
    if candidates.is_empty() {
        debug!(
            pool = %target_pool.name,
            within_pool = ?target_pool.preemption.within_pool,
            reclaim_within_cohort = ?target_pool.preemption.reclaim_within_cohort,
            "no preemption candidates under the pool's policy"
        );
        return Ok((0, None));
    }

    sort_candidates(&mut candidates, &target_pool.name, Utc::now());

    let req = demand(incoming, assignment);
    let targets = find_minimal_set(&target_pool.name, &req, &flavors, candidates, snapshot);
    if targets.is_empty() {
        debug!(pool = %target_pool.name, "not enough candidates to admit the incoming workload");
        return Ok((0, None));
    }

    let (success_count, first_error) = dispatch(hook, targets, &target_pool.name, cancellation).await;
    Ok((success_count, first_error))
}
