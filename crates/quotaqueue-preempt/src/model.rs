//! Core data model: workloads, pools, cohorts, and the flavor assignment
//! the upstream planner hands to this crate.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};

/// Stable string identity of a workload (namespace-qualified name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkloadKey(String);

impl WorkloadKey {
    /// Build a key from any string-like value.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a plain string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkloadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a quota pool (a.k.a. ClusterQueue).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolName(String);

impl PoolName {
    /// Build a pool name from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a plain string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a cohort: a group of pools sharing aggregate quota.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CohortName(String);

impl CohortName {
    /// Build a cohort name from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a plain string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CohortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a quota-tracked resource (e.g. `cpu`, `memory`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName(String);

impl ResourceName {
    /// Build a resource name from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a plain string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a flavor: a named variant of a resource (e.g. `alpha` vs `beta`
/// memory tier).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlavorName(String);

impl FlavorName {
    /// Build a flavor name from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a plain string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlavorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-`(resource, flavor)` demand or usage quantity.
pub type Demand = HashMap<(ResourceName, FlavorName), i64>;

/// A set of flavor names of interest, keyed by resource.
#[derive(Debug, Clone, Default)]
pub struct FlavorSet(pub HashMap<ResourceName, HashSet<FlavorName>>);

impl FlavorSet {
    /// An empty flavor set.
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    fn insert(&mut self, resource: ResourceName, flavor: FlavorName) {
        self.0.entry(resource).or_default().insert(flavor);
    }

    /// True if `resource`/`flavor` is a member of this set.
    #[must_use]
    pub fn contains(&self, resource: &ResourceName, flavor: &FlavorName) -> bool {
        self.0
            .get(resource)
            .is_some_and(|flavors| flavors.contains(flavor))
    }
}

/// Per-`(pod-set, resource)` flavor assignment mode from the upstream
/// flavor assigner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlavorAssignmentMode {
    /// The resource fits within the pool's nominal quota as-is.
    Fit,
    /// Admitting the incoming workload at this flavor requires preemption.
    Preempt,
    /// The incoming workload cannot use this flavor at all.
    NoFit,
}

/// One pod-set's per-resource flavor assignment.
#[derive(Debug, Clone, Default)]
pub struct PodSetAssignment(pub HashMap<ResourceName, (FlavorName, FlavorAssignmentMode)>);

/// The flavor assigner's output for an incoming workload: one
/// `PodSetAssignment` per pod-set, parallel to `Workload::pod_sets`.
#[derive(Debug, Clone, Default)]
pub struct Assignment(pub Vec<PodSetAssignment>);

/// Derive the `(resource, flavor)` pairs an incoming workload must preempt
/// from, per §4.3: only resources assigned in `Preempt` mode contribute.
#[must_use]
pub fn flavors_to_preempt(assignment: &Assignment) -> FlavorSet {
    let mut flavors = FlavorSet::new();
    for pod_set in &assignment.0 {
        for (resource, (flavor, mode)) in &pod_set.0 {
            if *mode == FlavorAssignmentMode::Preempt {
                flavors.insert(resource.clone(), flavor.clone());
            }
        }
    }
    flavors
}

/// Derive the incoming workload's total per-`(resource, flavor)` demand
/// under its assignment (used by [`crate::fit::fits`]). `Fit` and `Preempt`
/// assignments both contribute real quota consumption; `NoFit` contributes
/// nothing since the workload cannot run at that flavor at all.
#[must_use]
pub fn demand(incoming: &Workload, assignment: &Assignment) -> Demand {
    let mut req: Demand = HashMap::new();
    for (pod_set, pod_set_assignment) in incoming.pod_sets.iter().zip(assignment.0.iter()) {
        for (resource, quantity) in &pod_set.requests {
            let Some((flavor, mode)) = pod_set_assignment.0.get(resource) else {
                continue;
            };
            if *mode == FlavorAssignmentMode::NoFit {
                continue;
            }
            *req.entry((resource.clone(), flavor.clone())).or_insert(0) += quantity;
        }
    }
    req
}

/// One pod-set: a per-resource request, and (once admitted) a per-resource
/// flavor assignment.
#[derive(Debug, Clone, Default)]
pub struct PodSet {
    /// Pod-set name, scoped to its owning workload.
    pub name: String,
    /// Per-resource requested quantity.
    pub requests: HashMap<ResourceName, i64>,
    /// Per-resource flavor this pod-set is admitted under. Empty until
    /// admitted.
    pub assigned_flavors: HashMap<ResourceName, FlavorName>,
}

impl PodSet {
    /// Build a pod-set with the given name and no requests yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requests: HashMap::new(),
            assigned_flavors: HashMap::new(),
        }
    }

    /// Record a per-resource request quantity.
    #[must_use]
    pub fn with_request(mut self, resource: ResourceName, quantity: i64) -> Self {
        self.requests.insert(resource, quantity);
        self
    }

    /// Record the flavor this pod-set is (or will be) admitted under for a
    /// given resource.
    #[must_use]
    pub fn with_assigned_flavor(mut self, resource: ResourceName, flavor: FlavorName) -> Self {
        self.assigned_flavors.insert(resource, flavor);
        self
    }
}

/// An admitted or pending batch unit.
#[derive(Debug, Clone)]
pub struct Workload {
    /// Stable identity.
    pub key: WorkloadKey,
    /// Signed priority; higher wins.
    pub priority: i64,
    /// Pool this workload is (or would be) admitted into.
    pub pool: PoolName,
    /// Ordered pod-sets.
    pub pod_sets: Vec<PodSet>,
    /// Timestamp the workload transitioned to admitted. Absent means treat
    /// as "now" for ordering purposes (§4.4).
    pub admitted_at: Option<DateTime<Utc>>,
    /// Observable effect of the "clear admission" mutation.
    pub admission_cleared: bool,
}

impl Workload {
    /// Build an admitted workload with the given key, priority, and pool.
    #[must_use]
    pub fn new(key: WorkloadKey, priority: i64, pool: PoolName) -> Self {
        Self {
            key,
            priority,
            pool,
            pod_sets: Vec::new(),
            admitted_at: None,
            admission_cleared: false,
        }
    }

    /// Append a pod-set.
    #[must_use]
    pub fn with_pod_set(mut self, pod_set: PodSet) -> Self {
        self.pod_sets.push(pod_set);
        self
    }

    /// Record the admission timestamp.
    #[must_use]
    pub fn with_admitted_at(mut self, admitted_at: DateTime<Utc>) -> Self {
        self.admitted_at = Some(admitted_at);
        self
    }

    /// The effective admission timestamp used for ordering: the recorded
    /// timestamp, or `now` if absent (§4.4).
    #[must_use]
    pub fn effective_admitted_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.admitted_at.unwrap_or(now)
    }

    /// This workload's effective per-`(resource, flavor)` usage, derived
    /// from its pod-sets' assigned flavors. Pod-sets with no assigned
    /// flavor for a requested resource (not yet admitted) contribute
    /// nothing.
    #[must_use]
    pub fn effective_usage(&self) -> Demand {
        let mut usage: Demand = HashMap::new();
        for pod_set in &self.pod_sets {
            for (resource, quantity) in &pod_set.requests {
                let Some(flavor) = pod_set.assigned_flavors.get(resource) else {
                    continue;
                };
                *usage
                    .entry((resource.clone(), flavor.clone()))
                    .or_insert(0) += quantity;
            }
        }
        usage
    }

    /// True if this workload uses any `(resource, flavor)` pair in
    /// `flavors` (§4.3: "evicting an unrelated workload cannot help").
    #[must_use]
    pub fn uses_any_flavor(&self, flavors: &FlavorSet) -> bool {
        self.pod_sets.iter().any(|pod_set| {
            pod_set
                .assigned_flavors
                .iter()
                .any(|(resource, flavor)| flavors.contains(resource, flavor))
        })
    }
}

/// `preemption.withinPool` policy axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithinPoolPolicy {
    /// Never preempt within the target pool itself.
    Never,
    /// Preempt lower-priority workloads within the target pool.
    LowerPriority,
}

/// `preemption.reclaimWithinCohort` policy axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimPolicy {
    /// Never reclaim quota from other pools in the cohort.
    Never,
    /// Reclaim only from lower-priority workloads in other pools.
    LowerPriority,
    /// Reclaim from any-priority workloads in other pools (equal priority
    /// included).
    Any,
}

/// Both preemption policy axes for one pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolPreemptionPolicy {
    /// Whether/how to preempt within the pool itself.
    pub within_pool: WithinPoolPolicy,
    /// Whether/how to reclaim quota from other pools in the cohort.
    pub reclaim_within_cohort: ReclaimPolicy,
}

impl Default for PoolPreemptionPolicy {
    fn default() -> Self {
        Self {
            within_pool: WithinPoolPolicy::LowerPriority,
            reclaim_within_cohort: ReclaimPolicy::Never,
        }
    }
}

/// Nominal entitlement for one `(resource, flavor)` pair. `max` (the upper
/// borrow limit) is carried for data-shape parity with the upstream
/// flavor assigner's record but is never read by this crate (§9).
#[derive(Debug, Clone, Copy)]
pub struct QuotaLimits {
    /// Nominal minimum entitlement.
    pub min: i64,
    /// Upper borrow limit, enforced only at flavor-assignment time.
    pub max: Option<i64>,
}

impl QuotaLimits {
    /// Build a quota limit with only a nominal minimum.
    #[must_use]
    pub fn new(min: i64) -> Self {
        Self { min, max: None }
    }
}

/// A named quota container (a.k.a. ClusterQueue).
#[derive(Debug, Clone)]
pub struct Pool {
    /// Pool name.
    pub name: PoolName,
    /// Cohort this pool shares quota with, if any.
    pub cohort: Option<CohortName>,
    /// Preemption policy axes.
    pub preemption: PoolPreemptionPolicy,
    /// Nominal entitlement per `(resource, flavor)`.
    pub quota: HashMap<ResourceName, HashMap<FlavorName, QuotaLimits>>,
    /// Quantity currently consumed per `(resource, flavor)`.
    pub used: HashMap<ResourceName, HashMap<FlavorName, i64>>,
    /// Currently-admitted workloads whose `pool == name`, keyed by key.
    pub workloads: HashMap<WorkloadKey, Workload>,
}

impl Pool {
    /// Build an empty pool with no quota, no cohort, and default policy.
    #[must_use]
    pub fn new(name: PoolName) -> Self {
        Self {
            name,
            cohort: None,
            preemption: PoolPreemptionPolicy::default(),
            quota: HashMap::new(),
            used: HashMap::new(),
            workloads: HashMap::new(),
        }
    }

    /// Join a cohort.
    #[must_use]
    pub fn with_cohort(mut self, cohort: CohortName) -> Self {
        self.cohort = Some(cohort);
        self
    }

    /// Set the preemption policy axes.
    #[must_use]
    pub fn with_preemption(mut self, preemption: PoolPreemptionPolicy) -> Self {
        self.preemption = preemption;
        self
    }

    /// Set the nominal minimum for one `(resource, flavor)` pair.
    #[must_use]
    pub fn with_quota(mut self, resource: ResourceName, flavor: FlavorName, limits: QuotaLimits) -> Self {
        self.quota.entry(resource).or_default().insert(flavor, limits);
        self
    }

    /// Admit a workload directly into this pool's bookkeeping without
    /// touching a cohort (used to build fixtures; production admission
    /// goes through [`crate::snapshot::Snapshot::add`]).
    #[must_use]
    pub fn with_admitted(mut self, workload: Workload) -> Self {
        for ((resource, flavor), quantity) in workload.effective_usage() {
            *self
                .used
                .entry(resource)
                .or_default()
                .entry(flavor)
                .or_insert(0) += quantity;
        }
        self.workloads.insert(workload.key.clone(), workload);
        self
    }

    fn used_of(&self, resource: &ResourceName, flavor: &FlavorName) -> i64 {
        self.used
            .get(resource)
            .and_then(|flavors| flavors.get(flavor))
            .copied()
            .unwrap_or(0)
    }
}

/// A group of pools sharing aggregate quota, allowing borrowing.
#[derive(Debug, Clone)]
pub struct Cohort {
    /// Cohort name.
    pub name: CohortName,
    /// Member pool names.
    pub members: Vec<PoolName>,
    /// Aggregate quantity consumed per `(resource, flavor)` across members.
    pub used: HashMap<ResourceName, HashMap<FlavorName, i64>>,
    /// Aggregate requestable quota per `(resource, flavor)`, i.e. the sum
    /// of member nominal minimums.
    pub requestable: HashMap<ResourceName, HashMap<FlavorName, i64>>,
}

impl Cohort {
    /// Build an empty cohort with no members.
    #[must_use]
    pub fn new(name: CohortName) -> Self {
        Self {
            name,
            members: Vec::new(),
            used: HashMap::new(),
            requestable: HashMap::new(),
        }
    }

    /// Add a member pool.
    #[must_use]
    pub fn with_member(mut self, pool: PoolName) -> Self {
        self.members.push(pool);
        self
    }

    /// Set the aggregate requestable quota for one `(resource, flavor)`.
    #[must_use]
    pub fn with_requestable(mut self, resource: ResourceName, flavor: FlavorName, quantity: i64) -> Self {
        self.requestable
            .entry(resource)
            .or_default()
            .insert(flavor, quantity);
        self
    }

    fn used_of(&self, resource: &ResourceName, flavor: &FlavorName) -> i64 {
        self.used
            .get(resource)
            .and_then(|flavors| flavors.get(flavor))
            .copied()
            .unwrap_or(0)
    }

    fn requestable_of(&self, resource: &ResourceName, flavor: &FlavorName) -> Option<i64> {
        self.requestable.get(resource).and_then(|flavors| flavors.get(flavor)).copied()
    }
}

impl Pool {
    /// Quantity currently used for `(resource, flavor)`, or zero.
    #[must_use]
    pub fn used_quantity(&self, resource: &ResourceName, flavor: &FlavorName) -> i64 {
        self.used_of(resource, flavor)
    }

    /// Nominal minimum for `(resource, flavor)`, if the pool's quota
    /// defines it.
    #[must_use]
    pub fn min_quantity(&self, resource: &ResourceName, flavor: &FlavorName) -> Option<i64> {
        self.quota.get(resource).and_then(|flavors| flavors.get(flavor)).map(|limits| limits.min)
    }
}

impl Cohort {
    /// Aggregate quantity currently used for `(resource, flavor)`, or zero.
    #[must_use]
    pub fn used_quantity(&self, resource: &ResourceName, flavor: &FlavorName) -> i64 {
        self.used_of(resource, flavor)
    }

    /// Aggregate requestable quota for `(resource, flavor)`, if defined.
    #[must_use]
    pub fn requestable_quantity(&self, resource: &ResourceName, flavor: &FlavorName) -> Option<i64> {
        self.requestable_of(resource, flavor)
    }
}
