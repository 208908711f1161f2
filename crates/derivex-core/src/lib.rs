//! derivex core: type-directed production-rule resolution
//!
//! This crate provides:
//! - Categories and type-tagged values (`model`)
//! - Producers: typed transformation rules (`model::producer`)
//! - The production registry with duplicate and cycle rejection (`ops`, `rules`)
//! - The possibility tree: enumeration and pruning of reachable states (`traversal`)
//! - Derivation replay against concrete values (`resolver`)
//!
//! ```
//! use derivex_core::{Producer, ProductionRegistry, Resolver, Value};
//! use std::convert::Infallible;
//!
//! #[derive(Clone)]
//! struct Boulder { weight: u32 }
//! #[derive(Clone, Debug, PartialEq)]
//! struct Stone { weight: u32 }
//!
//! let mut registry = ProductionRegistry::new();
//! registry
//!     .add(Producer::from_fn("chisel", |b: Boulder| {
//!         Ok::<_, Infallible>(Stone { weight: b.weight / 10 })
//!     }))
//!     .unwrap();
//!
//! let stone: Stone = Resolver::new(&registry)
//!     .resolve_as(&[Value::new(Boulder { weight: 500 })])
//!     .unwrap();
//! assert_eq!(stone, Stone { weight: 50 });
//! ```

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod resolver;
pub mod rules;
pub mod traversal;

pub use derivex_core_types as core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ProducerDefect, ResolveError, Result};
pub use model::{Category, IntoProducer, Producer, Value};
pub use ops::ProductionRegistry;
pub use resolver::Resolver;
pub use traversal::{Derivation, PossibilityNode, PossibilityTree, TreeSnapshot};
