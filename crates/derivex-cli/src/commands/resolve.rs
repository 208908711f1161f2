//! Resolve command
//!
//! Usage: derivex resolve <TARGET> [--boulder-weight <N>] [--tree-height <N>] [--with-hammer]

use clap::Args;
use derivex_core::{ExError, Resolver, Value};

use super::demo::{self, Axe, Boulder, Hammer, Stick, Stone, Target, Tree};

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Tool to derive
    #[arg(value_enum)]
    pub target: Target,

    /// Weight of the supplied boulder
    #[arg(long, default_value_t = 500)]
    pub boulder_weight: u32,

    /// Height of the supplied tree
    #[arg(long, default_value_t = 1000)]
    pub tree_height: u32,

    /// Register the hammer producer as well
    #[arg(long)]
    pub with_hammer: bool,
}

/// Execute resolve command
pub fn execute(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = demo::registry(args.with_hammer).map_err(ExError::from)?;
    let resolver = Resolver::new(&registry);
    let values = [
        Value::new(Boulder {
            weight: args.boulder_weight,
        }),
        Value::new(Tree {
            height: args.tree_height,
        }),
    ];

    let rendered = match args.target {
        Target::Stone => resolver.resolve_as::<Stone>(&values).map(|v| format!("{:?}", v)),
        Target::Stick => resolver.resolve_as::<Stick>(&values).map(|v| format!("{:?}", v)),
        Target::Axe => resolver.resolve_as::<Axe>(&values).map(|v| format!("{:?}", v)),
        Target::Hammer => resolver.resolve_as::<Hammer>(&values).map(|v| format!("{:?}", v)),
    }
    .map_err(ExError::from)?;

    println!("{}", rendered);
    Ok(())
}
