use std::fmt::Write as _;
use std::time::Instant;

use serde::Serialize;

use crate::errors::{ResolveError, Result};
use crate::model::{Category, Producer};
use crate::ops::ProductionRegistry;
use crate::traversal::Derivation;
use crate::{log_op_end, log_op_start};

/// One reachable state of the search
///
/// Holds the producer applied to reach this state (none at the root), the
/// categories available before that application, and every state reachable
/// by applying one more eligible producer.
#[derive(Debug, Clone)]
pub struct PossibilityNode {
    producer: Option<Producer>,
    available: Vec<Category>,
    next_steps: Vec<PossibilityNode>,
}

impl PossibilityNode {
    fn root(available: &[Category]) -> Self {
        Self {
            producer: None,
            available: available.to_vec(),
            next_steps: Vec::new(),
        }
    }

    /// Producer applied to reach this state; `None` only at the root
    pub fn producer(&self) -> Option<&Producer> {
        self.producer.as_ref()
    }

    /// Output category of the applied producer
    pub fn output(&self) -> Option<Category> {
        self.producer.as_ref().map(Producer::output)
    }

    /// Categories available before the producer was applied
    pub fn available(&self) -> &[Category] {
        &self.available
    }

    pub fn next_steps(&self) -> &[PossibilityNode] {
        &self.next_steps
    }

    pub fn is_leaf(&self) -> bool {
        self.next_steps.is_empty()
    }

    /// Number of nodes in this subtree, this node included
    pub fn count(&self) -> usize {
        1 + self
            .next_steps
            .iter()
            .map(PossibilityNode::count)
            .sum::<usize>()
    }

    /// Keep only branches that reach `target`
    ///
    /// A node producing `target` is kept and its children dropped. Any other
    /// node keeps the children that reach `target`.
    ///
    /// # Errors
    ///
    /// Returns `TargetUnreachable` if no node of this subtree produces
    /// `target`; the subtree is left without children.
    pub fn prune_for(&mut self, target: Category) -> Result<()> {
        if self.output() == Some(target) {
            self.next_steps.clear();
            return Ok(());
        }

        self.next_steps
            .retain_mut(|step| step.prune_for(target).is_ok());

        if self.next_steps.is_empty() {
            return Err(ResolveError::TargetUnreachable { target });
        }
        Ok(())
    }

    /// Extend this node with every producer applicable to `available`
    fn expand(&mut self, registry: &ProductionRegistry, available: &[Category]) {
        for producer in registry.list() {
            // Already have this output
            if available.contains(&producer.output()) {
                continue;
            }

            // Missing inputs means this isn't a possible next step
            if !producer.is_satisfied_by(available) {
                continue;
            }

            let mut step = PossibilityNode {
                producer: Some(producer.clone()),
                available: available.to_vec(),
                next_steps: Vec::new(),
            };

            let mut after = available.to_vec();
            after.push(producer.output());
            step.expand(registry, &after);

            self.next_steps.push(step);
        }
    }

    /// First path, in construction order, ending at a node producing `target`
    fn path_to<'a>(&'a self, target: Category, path: &mut Vec<&'a Producer>) -> bool {
        if let Some(producer) = &self.producer {
            path.push(producer);
            if producer.output() == target {
                return true;
            }
        }

        for step in &self.next_steps {
            if step.path_to(target, path) {
                return true;
            }
        }

        if self.producer.is_some() {
            path.pop();
        }
        false
    }

    fn render_into(&self, depth: usize, out: &mut String) {
        match &self.producer {
            Some(producer) => {
                let _ = writeln!(
                    out,
                    "{} {} via {} from [{}]",
                    "--".repeat(depth),
                    producer.output(),
                    producer.name(),
                    join(&self.available)
                );
            }
            None => {
                let _ = writeln!(out, "[{}]", join(&self.available));
            }
        }
        for step in &self.next_steps {
            step.render_into(depth + 1, out);
        }
    }

    fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            producer: self.producer.as_ref().map(|p| p.name().to_string()),
            output: self.output(),
            available: self.available.clone(),
            next_steps: self.next_steps.iter().map(PossibilityNode::snapshot).collect(),
        }
    }
}

fn join(categories: &[Category]) -> String {
    categories
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serializable view of a possibility tree
#[derive(Debug, Clone, Serialize)]
pub struct TreeSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Category>,
    pub available: Vec<Category>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<TreeSnapshot>,
}

/// Every order of producer applications reachable from a starting set
///
/// Built fresh for each query and owned by the caller; only pruning
/// mutates it.
#[derive(Debug, Clone)]
pub struct PossibilityTree {
    root: PossibilityNode,
}

impl PossibilityTree {
    /// Enumerate every state reachable from `available` with `registry`
    ///
    /// A producer is a next step iff its output is not yet available and
    /// all its inputs are. Producers are considered in registration order.
    /// Each step adds one category, so depth is bounded by the number of
    /// distinct registered outputs.
    pub fn build(registry: &ProductionRegistry, available: &[Category]) -> Self {
        log_op_start!("possibility_build", available = %join(available));
        let start = Instant::now();

        let mut root = PossibilityNode::root(available);
        root.expand(registry, available);
        let tree = Self { root };

        let elapsed = start.elapsed().as_millis() as u64;
        log_op_end!(
            "possibility_build",
            duration_ms = elapsed,
            node_count = tree.count() as u64
        );
        tree
    }

    pub fn root(&self) -> &PossibilityNode {
        &self.root
    }

    /// Total node count, root included
    pub fn count(&self) -> usize {
        self.root.count()
    }

    /// Keep only branches that reach `target`
    ///
    /// # Errors
    ///
    /// Returns `TargetUnreachable` if no branch produces `target`; the tree
    /// is then reduced to its root.
    pub fn prune_for(&mut self, target: Category) -> Result<()> {
        self.root.prune_for(target)
    }

    /// First discovered path to `target`
    ///
    /// Walks the tree in construction order and returns the producers from
    /// the root down to the first node producing `target`. No cost ranking
    /// is applied.
    ///
    /// # Errors
    ///
    /// Returns `TargetUnreachable` if no node produces `target`.
    pub fn derivation_for(&self, target: Category) -> Result<Derivation> {
        let mut path = Vec::new();
        if !self.root.path_to(target, &mut path) {
            return Err(ResolveError::TargetUnreachable { target });
        }
        Ok(Derivation::new(target, path.into_iter().cloned().collect()))
    }

    /// Indented listing, one line per node
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.root.render_into(0, &mut out);
        out
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        self.root.snapshot()
    }
}
