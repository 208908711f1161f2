pub mod invariants;

pub use invariants::{find_cyclic_producers, find_duplicate, has_cycle, is_acyclic};
