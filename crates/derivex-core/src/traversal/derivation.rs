use std::fmt;

use tracing::debug;

use crate::errors::{ResolveError, Result};
use crate::model::{Category, Producer, Value};

/// A replayable chain of producers ending at a target category
#[derive(Debug, Clone)]
pub struct Derivation {
    target: Category,
    steps: Vec<Producer>,
}

impl Derivation {
    pub fn new(target: Category, steps: Vec<Producer>) -> Self {
        Self { target, steps }
    }

    pub fn target(&self) -> Category {
        self.target
    }

    /// Producers in application order
    pub fn steps(&self) -> &[Producer] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the target is already among the supplied values
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replay the chain against concrete values
    ///
    /// Each step draws its inputs from the supplied values plus everything
    /// produced by earlier steps. Stops at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first `MissingInput`, invocation error or
    /// `ProducerFailure`, or `TargetUnreachable` if no value of the target
    /// category exists at the end.
    pub fn execute(&self, values: &[Value]) -> Result<Value> {
        let mut pool = values.to_vec();

        for (index, step) in self.steps.iter().enumerate() {
            let inputs = step.fit_inputs(&pool)?;
            let produced = step.apply(&inputs)?;
            debug!(
                step = index,
                producer = step.name(),
                output = %produced.category(),
                "derivation step applied"
            );
            pool.push(produced);
        }

        pool.into_iter()
            .find(|value| value.category() == self.target)
            .ok_or(ResolveError::TargetUnreachable {
                target: self.target,
            })
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "{} (supplied)", self.target);
        }
        let names: Vec<&str> = self.steps.iter().map(Producer::name).collect();
        f.write_str(&names.join(" -> "))
    }
}
