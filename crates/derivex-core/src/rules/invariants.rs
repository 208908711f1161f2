use std::collections::HashSet;

use crate::model::Producer;
use crate::ops::ProductionRegistry;

/// Check if the walk upstream of the producer in `slot` revisits a producer
///
/// Each producer depends on every producer registered under one of its
/// input categories. `visited` holds the slots on the current path only:
/// every branch gets its own copy, so two paths that merge on a shared
/// upstream producer are not reported as a cycle.
pub fn has_cycle(registry: &ProductionRegistry, slot: usize, mut visited: HashSet<usize>) -> bool {
    if !visited.insert(slot) {
        return true;
    }

    let Some(producer) = registry.producers.get(slot) else {
        return false;
    };

    for input in producer.inputs() {
        for &upstream in registry.slots_for(*input) {
            if has_cycle(registry, upstream, visited.clone()) {
                return true;
            }
        }
    }

    false
}

/// Check that no producer's upstream walk detects a cycle
pub fn is_acyclic(registry: &ProductionRegistry) -> bool {
    (0..registry.producers.len()).all(|slot| !has_cycle(registry, slot, HashSet::new()))
}

/// Names of producers whose upstream walk runs into a cycle
///
/// Always empty for a registry built through `add`; useful when checking a
/// registry assembled some other way.
pub fn find_cyclic_producers(registry: &ProductionRegistry) -> Vec<String> {
    registry
        .producers
        .iter()
        .enumerate()
        .filter(|(slot, _)| has_cycle(registry, *slot, HashSet::new()))
        .map(|(_, producer)| producer.name().to_string())
        .collect()
}

/// Find a registered producer with the same output and identity
pub fn find_duplicate<'a>(
    registry: &'a ProductionRegistry,
    candidate: &Producer,
) -> Option<&'a Producer> {
    registry
        .producers_for(candidate.output())
        .into_iter()
        .find(|existing| existing.identity() == candidate.identity())
}
