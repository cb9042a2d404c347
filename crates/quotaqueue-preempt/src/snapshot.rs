//! Mutable quota snapshot the solver hypothetically mutates during search.

use std::collections::HashMap;

use crate::model::{Cohort, CohortName, Pool, PoolName, Workload, WorkloadKey};

/// A self-consistent, mutable view of all pools and cohorts at the start of
/// a scheduling attempt. The solver is the sole mutator during search
/// (§3); the snapshot is logically discarded by the caller once `preempt`
/// returns.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pools: HashMap<PoolName, Pool>,
    cohorts: HashMap<CohortName, Cohort>,
}

impl Snapshot {
    /// An empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
            cohorts: HashMap::new(),
        }
    }

    /// Insert or replace a pool.
    pub fn insert_pool(&mut self, pool: Pool) {
        self.pools.insert(pool.name.clone(), pool);
    }

    /// Insert or replace a cohort.
    pub fn insert_cohort(&mut self, cohort: Cohort) {
        self.cohorts.insert(cohort.name.clone(), cohort);
    }

    /// Borrow a pool by name.
    #[must_use]
    pub fn pool(&self, name: &PoolName) -> Option<&Pool> {
        self.pools.get(name)
    }

    /// Borrow a cohort by name.
    #[must_use]
    pub fn cohort(&self, name: &CohortName) -> Option<&Cohort> {
        self.cohorts.get(name)
    }

    /// Borrow the cohort a pool belongs to, if any.
    #[must_use]
    pub fn cohort_for(&self, pool: &Pool) -> Option<&Cohort> {
        pool.cohort.as_ref().and_then(|name| self.cohorts.get(name))
    }

    /// Remove a workload from its pool, decrementing the pool's and (if
    /// present) the cohort's `used` counters by its effective usage.
    /// Returns the removed workload, or `None` if it was not present.
    pub fn remove(&mut self, key: &WorkloadKey, pool_name: &PoolName) -> Option<Workload> {
        let pool = self.pools.get_mut(pool_name)?;
        let workload = pool.workloads.remove(key)?;
        let usage = workload.effective_usage();
        for ((resource, flavor), quantity) in &usage {
            if let Some(entry) = pool
                .used
                .get_mut(resource)
                .and_then(|flavors| flavors.get_mut(flavor))
            {
                *entry = (*entry - quantity).max(0);
            }
        }
        if let Some(cohort_name) = pool.cohort.clone() {
            if let Some(cohort) = self.cohorts.get_mut(&cohort_name) {
                for ((resource, flavor), quantity) in &usage {
                    if let Some(entry) = cohort
                        .used
                        .get_mut(resource)
                        .and_then(|flavors| flavors.get_mut(flavor))
                    {
                        *entry = (*entry - quantity).max(0);
                    }
                }
            }
        }
        Some(workload)
    }

    /// Add a workload back to its pool, incrementing the pool's and (if
    /// present) the cohort's `used` counters by its effective usage.
    /// `remove` followed by `add` of the same workload is the identity
    /// (§3: `Remove(Add(W)) = identity`).
    pub fn add(&mut self, workload: Workload) {
        let Some(pool) = self.pools.get_mut(&workload.pool) else {
            return;
        };
        let usage = workload.effective_usage();
        for (resource, flavor) in usage.keys() {
            pool.used
                .entry(resource.clone())
                .or_default()
                .entry(flavor.clone())
                .or_insert(0);
        }
        for ((resource, flavor), quantity) in &usage {
            *pool
                .used
                .get_mut(resource)
                .and_then(|flavors| flavors.get_mut(flavor))
                .expect("just ensured entry above") += quantity;
        }
        if let Some(cohort_name) = pool.cohort.clone() {
            if let Some(cohort) = self.cohorts.get_mut(&cohort_name) {
                for (resource, flavor) in usage.keys() {
                    cohort
                        .used
                        .entry(resource.clone())
                        .or_default()
                        .entry(flavor.clone())
                        .or_insert(0);
                }
                for ((resource, flavor), quantity) in &usage {
                    *cohort
                        .used
                        .get_mut(resource)
                        .and_then(|flavors| flavors.get_mut(flavor))
                        .expect("just ensured entry above") += quantity;
                }
            }
        }
        pool.workloads.insert(workload.key.clone(), workload);
    }
}
