//! Derivation executor
//!
//! Turns "give me a value of category X from these values" into a search
//! over the registry followed by a replay of the first derivation found.

use std::any::Any;
use std::time::Instant;

use derivex_core_types::ResolutionId;

use crate::errors::{ExError, ResolveError, Result};
use crate::model::{categories_of, Category, Value};
use crate::ops::ProductionRegistry;
use crate::traversal::Derivation;
use crate::{log_op_end, log_op_error, log_op_start};

/// Resolves target categories against a finished registry
///
/// Borrows the registry immutably; any number of resolvers may search the
/// same registry at once.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r ProductionRegistry,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r ProductionRegistry) -> Self {
        Self { registry }
    }

    /// Choose the derivation that would produce `target` from `available`
    ///
    /// Returns an empty derivation when `target` is already available.
    /// Otherwise builds the possibility tree, prunes it for `target` and
    /// takes the first surviving path.
    ///
    /// # Errors
    ///
    /// Returns `TargetUnreachable` if no chain of producers reaches `target`.
    pub fn plan(&self, target: Category, available: &[Category]) -> Result<Derivation> {
        if available.contains(&target) {
            return Ok(Derivation::new(target, Vec::new()));
        }

        let mut tree = self.registry.build(available);
        tree.prune_for(target)?;
        tree.derivation_for(target)
    }

    /// Produce a value of `target` from the supplied values
    ///
    /// # Errors
    ///
    /// Returns `ResolutionFailed` wrapping the first error met while
    /// planning or replaying the derivation. No partial result is returned.
    pub fn resolve(&self, target: Category, values: &[Value]) -> Result<Value> {
        let resolution_id = ResolutionId::new();
        log_op_start!(
            "resolve",
            target_category = %target,
            resolution_id = resolution_id.as_str()
        );
        let start = Instant::now();

        let result = self
            .plan(target, &categories_of(values))
            .and_then(|derivation| {
                tracing::debug!(
                    resolution_id = resolution_id.as_str(),
                    step_count = derivation.len() as u64,
                    derivation = %derivation,
                    "derivation chosen"
                );
                derivation.execute(values)
            })
            .map_err(|source| ResolveError::ResolutionFailed {
                target,
                source: Box::new(source),
            });

        let elapsed = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                log_op_end!(
                    "resolve",
                    duration_ms = elapsed,
                    resolution_id = resolution_id.as_str()
                );
            }
            Err(err) => {
                log_op_error!(
                    "resolve",
                    ExError::from(err).with_resolution_id(resolution_id.clone()),
                    duration_ms = elapsed,
                    resolution_id = resolution_id.as_str()
                );
            }
        }
        result
    }

    /// Produce a `T` from the supplied values
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve).
    pub fn resolve_as<T: Any + Clone>(&self, values: &[Value]) -> Result<T> {
        let target = Category::of::<T>();
        let value = self.resolve(target, values)?;
        value
            .cloned::<T>()
            .ok_or_else(|| ResolveError::ResolutionFailed {
                target,
                source: Box::new(ResolveError::OutputTypeMismatch {
                    producer: "resolver".to_string(),
                    expected: target,
                    found: value.category(),
                }),
            })
    }
}
