//! Minimal-set solver (§4.5): greedy removal against a mutable snapshot,
//! then a reverse-order restoration pass, producing a near-minimal
//! eviction set.

use crate::borrowing::is_borrowing;
use crate::fit::fits;
use crate::model::{Demand, FlavorSet, PoolName, Workload};
use crate::snapshot::Snapshot;

/// Given an ordered candidate list (preference order, §4.4) and a mutable
/// snapshot, greedily remove candidates from the snapshot until the
/// incoming workload's demand fits in the target pool, then attempt to
/// restore as many of the removed candidates as possible, walking in
/// reverse insertion order.
///
/// Returns the empty vector if removing every candidate is still
/// insufficient (§4.5: "insufficient capacity even after removing all
/// candidates"). The snapshot is left mutated either way; the caller is
/// expected to discard it.
#[must_use]
pub fn find_minimal_set(
    target_pool: &PoolName,
    req: &Demand,
    flavors: &FlavorSet,
    ordered_candidates: Vec<Workload>,
    snapshot: &mut Snapshot,
) -> Vec<Workload> {
    let mut targets: Vec<Workload> = Vec::new();
    let mut satisfied = false;

    for candidate in ordered_candidates {
        let pool_name = candidate.pool.clone();
        if pool_name != *target_pool {
            // Rechecked live: earlier removals in this same search may
            // have ended this pool's borrowing.
            let Some(pool) = snapshot.pool(&pool_name) else {
                continue;
            };
            if !is_borrowing(pool, flavors) {
                continue;
            }
        }

        let Some(removed) = snapshot.remove(&candidate.key, &pool_name) else {
            continue;
        };
        targets.push(removed);

        let pool = snapshot
            .pool(target_pool)
            .expect("target pool must exist in a snapshot the orchestrator already resolved");
        if fits(req, pool, snapshot.cohort_for(pool)) {
            satisfied = true;
            break;
        }
    }

    if !satisfied {
        return Vec::new();
    }

    // Restoration pass: walk targets[0 .. len-2] in reverse insertion
    // order. The last candidate appended is never considered — its
    // removal is necessary by construction. `kept` tracks which indices
    // were successfully restored, standing in for the pseudocode's
    // swap-with-last removal without relying on index aliasing during the
    // reverse walk.
    let mut kept = vec![false; targets.len()];
    if targets.len() >= 2 {
        for i in (0..targets.len() - 1).rev() {
            let candidate = targets[i].clone();
            let candidate_pool = candidate.pool.clone();
            snapshot.add(candidate);

            let pool = snapshot
                .pool(target_pool)
                .expect("target pool must exist in a snapshot the orchestrator already resolved");
            if fits(req, pool, snapshot.cohort_for(pool)) {
                kept[i] = true;
            } else {
                snapshot.remove(&targets[i].key, &candidate_pool);
            }
        }
    }

    targets
        .into_iter()
        .zip(kept)
        .filter_map(|(workload, was_kept)| (!was_kept).then_some(workload))
        .collect()
}
