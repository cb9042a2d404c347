//! Fit predicate (§4.1): can a candidate's demand be admitted into a pool
//! (and its cohort) without borrowing?

use crate::model::{Cohort, Demand, Pool};

/// True iff, for every `(resource, flavor)` with positive demand, the pool
/// (and, if it joins a cohort that defines the pair, the cohort) has room
/// under nominal quota. This is stricter than the scheduler's admission
/// check: no borrowing may be used to satisfy a preemptor.
///
/// Resources the workload does not request are ignored. Resources defined
/// in the workload but absent from the pool's quota are ignored too — this
/// relies on the upstream flavor assigner never producing such pairings
/// (§9, external invariant, not re-validated here).
#[must_use]
pub fn fits(req: &Demand, pool: &Pool, cohort: Option<&Cohort>) -> bool {
    for ((resource, flavor), quantity) in req {
        if *quantity <= 0 {
            continue;
        }
        let Some(min) = pool.min_quantity(resource, flavor) else {
            continue;
        };
        let used = pool.used_quantity(resource, flavor);
        if used + quantity > min {
            return false;
        }
        if let Some(cohort) = cohort {
            if let Some(requestable) = cohort.requestable_quantity(resource, flavor) {
                let cohort_used = cohort.used_quantity(resource, flavor);
                if cohort_used + quantity > requestable {
                    return false;
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CohortName, FlavorName, PoolName, QuotaLimits, ResourceName};
    use std::collections::HashMap;
    use test_case::test_case;

    fn pool_with_quota(min: i64, used: i64) -> Pool {
        let mut pool = Pool::new(PoolName::new("standalone")).with_quota(
            ResourceName::new("cpu"),
            FlavorName::new("default"),
            QuotaLimits::new(min),
        );
        pool.used
            .entry(ResourceName::new("cpu"))
            .or_default()
            .insert(FlavorName::new("default"), used);
        pool
    }

    fn demand(quantity: i64) -> Demand {
        let mut req = HashMap::new();
        req.insert((ResourceName::new("cpu"), FlavorName::new("default")), quantity);
        req
    }

    #[test]
    fn fits_when_under_nominal_minimum() {
        let pool = pool_with_quota(6, 2);
        assert!(fits(&demand(2), &pool, None));
    }

    #[test]
    fn does_not_fit_when_exceeding_nominal_minimum() {
        let pool = pool_with_quota(6, 5);
        assert!(!fits(&demand(2), &pool, None));
    }

    #[test]
    fn exact_fit_at_minimum_is_allowed() {
        let pool = pool_with_quota(6, 4);
        assert!(fits(&demand(2), &pool, None));
    }

    #[test]
    fn ignores_resources_absent_from_pool_quota() {
        let pool = Pool::new(PoolName::new("standalone"));
        let mut req = HashMap::new();
        req.insert((ResourceName::new("gpu"), FlavorName::new("default")), 4);
        assert!(fits(&req, &pool, None));
    }

    #[test]
    fn zero_or_negative_demand_is_ignored() {
        let pool = pool_with_quota(6, 6);
        assert!(fits(&demand(0), &pool, None));
    }

    #[test_case(6, 0, 2, true ; "well under minimum")]
    #[test_case(6, 4, 2, true ; "exact fit at minimum")]
    #[test_case(6, 5, 2, false ; "one over minimum")]
    #[test_case(6, 6, 1, false ; "already at minimum")]
    #[test_case(0, 0, 0, true ; "zero minimum zero demand")]
    fn fit_boundary_table(min: i64, used: i64, requested: i64, expected: bool) {
        let pool = pool_with_quota(min, used);
        assert_eq!(fits(&demand(requested), &pool, None), expected);
    }

    #[test]
    fn cohort_requestable_limit_is_enforced() {
        let pool = pool_with_quota(6, 4);
        let mut cohort = Cohort::new(CohortName::new("cohort"))
            .with_requestable(ResourceName::new("cpu"), FlavorName::new("default"), 8);
        cohort
            .used
            .entry(ResourceName::new("cpu"))
            .or_default()
            .insert(FlavorName::new("default"), 6);
        // Pool-local check passes (4 + 2 <= 6) and cohort aggregate just
        // fits (6 + 2 <= 8).
        assert!(fits(&demand(2), &pool, Some(&cohort)));

        cohort
            .used
            .get_mut(&ResourceName::new("cpu"))
            .unwrap()
            .insert(FlavorName::new("default"), 7);
        // Cohort aggregate now overflows (7 + 2 > 8).
        assert!(!fits(&demand(2), &pool, Some(&cohort)));
    }
}
