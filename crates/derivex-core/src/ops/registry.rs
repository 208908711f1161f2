use std::collections::HashMap;
use std::time::Instant;

use crate::errors::{ResolveError, Result};
use crate::model::{Category, Producer};
use crate::rules::invariants;
use crate::traversal::PossibilityTree;
use crate::{log_op_end, log_op_error, log_op_start};

/// Registry of production rules, indexed by output category
///
/// Holds producers in registration order. Every successful `add` leaves the
/// registry free of duplicate rules and of dependency cycles; a rejected
/// `add` leaves it exactly as it was.
///
/// Mutation needs `&mut self`, so a registry shared behind `&` or `Arc` is
/// read-only and safe to search from several threads.
#[derive(Debug, Clone, Default)]
pub struct ProductionRegistry {
    /// Producers in registration order; a producer's slot is its index
    pub(crate) producers: Vec<Producer>,
    /// Output category to the slots of the producers yielding it
    pub(crate) by_output: HashMap<Category, Vec<usize>>,
}

impl ProductionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer
    ///
    /// # Errors
    ///
    /// - `InvalidProducer` if the producer fails validation
    /// - `DuplicateProducer` if the same transformation is already
    ///   registered for the same output
    /// - `CyclicDependency` if the producer would close a cycle; the
    ///   registry is rolled back first
    pub fn add(&mut self, producer: Producer) -> Result<()> {
        let name = producer.name().to_string();
        log_op_start!("registry_add", producer = name.as_str(), output = %producer.output());
        let start = Instant::now();

        let result = self.insert(producer);

        let elapsed = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => {
                log_op_end!("registry_add", duration_ms = elapsed, producer = name.as_str());
            }
            Err(err) => {
                log_op_error!("registry_add", err, duration_ms = elapsed, producer = name.as_str());
            }
        }
        result
    }

    fn insert(&mut self, producer: Producer) -> Result<()> {
        producer.validate()?;

        if invariants::find_duplicate(self, &producer).is_some() {
            return Err(ResolveError::DuplicateProducer {
                producer: producer.name().to_string(),
                output: producer.output(),
            });
        }

        let output = producer.output();
        let name = producer.name().to_string();
        let slot = self.producers.len();
        self.producers.push(producer);
        self.by_output.entry(output).or_default().push(slot);

        if !invariants::is_acyclic(self) {
            tracing::debug!(
                producer = name.as_str(),
                cycle = ?invariants::find_cyclic_producers(self),
                "rolling back cyclic producer"
            );
            self.remove_last(output);
            return Err(ResolveError::CyclicDependency {
                producer: name,
                output,
            });
        }

        Ok(())
    }

    /// Undo the most recent insertion, dropping the output bucket if empty
    fn remove_last(&mut self, output: Category) {
        self.producers.pop();
        if let Some(slots) = self.by_output.get_mut(&output) {
            slots.pop();
            if slots.is_empty() {
                self.by_output.remove(&output);
            }
        }
    }

    /// All registered producers, in registration order
    pub fn list(&self) -> &[Producer] {
        &self.producers
    }

    /// Producers yielding `category`, in registration order
    pub fn producers_for(&self, category: Category) -> Vec<&Producer> {
        self.slots_for(category)
            .iter()
            .filter_map(|&slot| self.producers.get(slot))
            .collect()
    }

    pub(crate) fn slots_for(&self, category: Category) -> &[usize] {
        self.by_output
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct output categories, in order of first registration
    pub fn categories(&self) -> Vec<Category> {
        let mut categories = Vec::with_capacity(self.by_output.len());
        for producer in &self.producers {
            if !categories.contains(&producer.output()) {
                categories.push(producer.output());
            }
        }
        categories
    }

    /// Whether any producer yields `category`
    pub fn produces(&self, category: Category) -> bool {
        self.by_output.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Enumerate every derivation state reachable from `available`
    pub fn build(&self, available: &[Category]) -> PossibilityTree {
        PossibilityTree::build(self, available)
    }
}
