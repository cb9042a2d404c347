//! Candidate finder (§4.3): enumerate admitted workloads eligible for
//! preemption under the target pool's two policy axes.

use crate::borrowing::is_borrowing;
use crate::model::{FlavorSet, Pool, ReclaimPolicy, Workload, WithinPoolPolicy};
use crate::snapshot::Snapshot;

/// Enumerate admitted workloads eligible for preemption, restricted to
/// those occupying flavors the incoming workload requires. Order is
/// arbitrary; [`crate::ordering::sort_candidates`] imposes meaning.
#[must_use]
pub fn find_candidates(
    incoming: &Workload,
    target_pool: &Pool,
    flavors: &FlavorSet,
    snapshot: &Snapshot,
) -> Vec<Workload> {
    let scan_pools = pools_to_scan(target_pool, snapshot);

    let mut result = Vec::new();
    for pool in scan_pools {
        let is_target = pool.name == target_pool.name;

        let only_lower_prio = if is_target {
            true
        } else {
            if !is_borrowing(pool, flavors) {
                continue;
            }
            target_pool.preemption.reclaim_within_cohort != ReclaimPolicy::Any
        };

        for workload in pool.workloads.values() {
            if only_lower_prio && workload.priority >= incoming.priority {
                continue;
            }
            if !workload.uses_any_flavor(flavors) {
                continue;
            }
            result.push(workload.clone());
        }
    }
    result
}

/// Build the set of pools to scan, per §4.3: start with `{targetPool}`; if
/// it joins a cohort and the cohort-reclaim policy is not `Never`, widen to
/// the whole cohort membership; then drop the target pool itself if
/// `withinPool == Never`.
fn pools_to_scan<'s>(target_pool: &'s Pool, snapshot: &'s Snapshot) -> Vec<&'s Pool> {
    let widen = target_pool.cohort.is_some()
        && target_pool.preemption.reclaim_within_cohort != ReclaimPolicy::Never;

    let mut pools: Vec<&Pool> = if widen {
        let cohort_name = target_pool.cohort.as_ref().expect("checked above");
        snapshot
            .cohort(cohort_name)
            .map(|cohort| {
                cohort
                    .members
                    .iter()
                    .filter_map(|name| snapshot.pool(name))
                    .collect()
            })
            .unwrap_or_else(|| vec![target_pool])
    } else {
        vec![target_pool]
    };

    if target_pool.preemption.within_pool == WithinPoolPolicy::Never {
        pools.retain(|pool| pool.name != target_pool.name);
    }
    pools
}
