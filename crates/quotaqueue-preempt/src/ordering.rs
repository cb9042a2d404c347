//! Total order on candidates defining preemption preference (§4.4).
//!
//! Sort key, ascending: `(foreign_rank, priority, effective_admitted_at,
//! key)`. Candidates without an admission timestamp are treated as
//! admitted "now" (the time passed in), which places them strictly between
//! any earlier-admitted and any later-admitted workload of equal priority
//! — see `DESIGN.md` for how this resolves §9's first open question
//! against the worked example in §8 scenario 7.

use chrono::{DateTime, Utc};

use crate::model::{PoolName, Workload};

/// Sort `candidates` in place by the §4.4 total order, using `now` as the
/// substitute admission timestamp for candidates that never recorded one.
pub fn sort_candidates(candidates: &mut [Workload], target_pool: &PoolName, now: DateTime<Utc>) {
    candidates.sort_by(|a, b| {
        let a_rank = foreign_rank(a, target_pool);
        let b_rank = foreign_rank(b, target_pool);
        a_rank
            .cmp(&b_rank)
            .then(a.priority.cmp(&b.priority))
            .then(a.effective_admitted_at(now).cmp(&b.effective_admitted_at(now)))
            .then(a.key.cmp(&b.key))
    });
}

/// `0` for cohort-foreign candidates (sort first), `1` for same-pool
/// candidates.
fn foreign_rank(workload: &Workload, target_pool: &PoolName) -> u8 {
    u8::from(workload.pool == *target_pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PoolName, WorkloadKey};
    use chrono::Duration;

    fn workload_at(key: &str, pool: &str, priority: i64, admitted_at: Option<DateTime<Utc>>) -> Workload {
        let mut w = Workload::new(WorkloadKey::new(key), priority, PoolName::new(pool));
        if let Some(ts) = admitted_at {
            w = w.with_admitted_at(ts);
        }
        w
    }

    #[test]
    fn ordering_determinism_scenario() {
        let now = Utc::now();
        let high = workload_at("high", "self", 10, None);
        let low = workload_at("low", "self", -10, None);
        let other = workload_at("other", "other-pool", 10, None);
        let old = workload_at("old", "self", 0, Some(now + Duration::seconds(1)));
        let current = workload_at("current", "self", 0, None);

        let mut candidates = vec![high, low, other, old, current];
        sort_candidates(&mut candidates, &PoolName::new("self"), now);

        let keys: Vec<&str> = candidates.iter().map(|w| w.key.as_str()).collect();
        assert_eq!(keys, vec!["other", "low", "current", "old", "high"]);
    }

    #[test]
    fn foreign_pool_always_precedes_same_pool() {
        let now = Utc::now();
        let mut candidates = vec![
            workload_at("same", "self", -100, None),
            workload_at("foreign", "other", 100, None),
        ];
        sort_candidates(&mut candidates, &PoolName::new("self"), now);
        let keys: Vec<&str> = candidates.iter().map(|w| w.key.as_str()).collect();
        assert_eq!(keys, vec!["foreign", "same"]);
    }

    #[test]
    fn lower_priority_sorts_before_higher_priority() {
        let now = Utc::now();
        let mut candidates = vec![
            workload_at("high", "self", 5, None),
            workload_at("low", "self", -5, None),
        ];
        sort_candidates(&mut candidates, &PoolName::new("self"), now);
        let keys: Vec<&str> = candidates.iter().map(|w| w.key.as_str()).collect();
        assert_eq!(keys, vec!["low", "high"]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_candidate() -> impl Strategy<Value = (String, bool, i64, i64)> {
            (
                "[a-z]{1,8}",
                any::<bool>(),
                -1000i64..1000,
                -500i64..500,
            )
        }

        proptest! {
            // §4.4 is a total order: sorting is idempotent, and the result
            // always groups cohort-foreign candidates strictly before
            // same-pool candidates, honoring priority ascending within
            // each group.
            #[test]
            fn sorting_is_idempotent_and_foreign_first(
                raw in prop::collection::vec(arb_candidate(), 0..12)
            ) {
                let now = Utc::now();
                let target = PoolName::new("self");
                let mut candidates: Vec<Workload> = raw
                    .into_iter()
                    .enumerate()
                    .map(|(i, (suffix, is_foreign, priority, offset_secs))| {
                        let pool = if is_foreign { "other" } else { "self" };
                        workload_at(
                            &format!("w{i}-{suffix}"),
                            pool,
                            priority,
                            Some(now + Duration::seconds(offset_secs)),
                        )
                    })
                    .collect();

                sort_candidates(&mut candidates, &target, now);
                let once = candidates.clone();
                sort_candidates(&mut candidates, &target, now);
                prop_assert_eq!(&candidates, &once);

                let mut seen_same_pool = false;
                for workload in &candidates {
                    let is_same_pool = workload.pool == target;
                    if is_same_pool {
                        seen_same_pool = true;
                    } else {
                        prop_assert!(!seen_same_pool, "foreign candidate sorted after a same-pool one");
                    }
                }

                for window in candidates.windows(2) {
                    let a_rank = foreign_rank(&window[0], &target);
                    let b_rank = foreign_rank(&window[1], &target);
                    if a_rank == b_rank {
                        prop_assert!(window[0].priority <= window[1].priority);
                    }
                }
            }
        }
    }
}
