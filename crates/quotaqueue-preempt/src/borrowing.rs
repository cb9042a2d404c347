//! Borrowing predicate (§4.2): is a pool consuming more than its nominal
//! minimum for any flavor of interest?

use crate::model::{FlavorSet, Pool};

/// True iff there exists `(resource, flavorName)` with `flavorName` a
/// member of `flavors[resource]`, the pool defines that pair in its quota,
/// and the pool's usage for that pair strictly exceeds its nominal
/// minimum. A resource the pool does not define contributes no evidence of
/// borrowing — it is not a failure.
///
/// Recomputed against the live snapshot throughout the solver; this is not
/// a cached property.
#[must_use]
pub fn is_borrowing(pool: &Pool, flavors: &FlavorSet) -> bool {
    for (resource, flavor_names) in &flavors.0 {
        for flavor in flavor_names {
            let Some(min) = pool.min_quantity(resource, flavor) else {
                continue;
            };
            if pool.used_quantity(resource, flavor) > min {
                return true;
            }
        }
    }
    false
}
