//! Search over reachable derivation states
//!
//! - `possibility`: the possibility tree, its construction and pruning
//! - `derivation`: a replayable root-to-target path through a pruned tree

pub mod derivation;
pub mod possibility;

pub use derivation::Derivation;
pub use possibility::{PossibilityNode, PossibilityTree, TreeSnapshot};
