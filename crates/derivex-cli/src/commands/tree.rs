//! Tree command
//!
//! Usage: derivex tree [--target <TARGET>] [--json] [--with-hammer]

use clap::Args;
use derivex_core::ExError;

use super::demo::{self, Target};

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Keep only the branches reaching this target
    #[arg(short, long, value_enum)]
    pub target: Option<Target>,

    /// Print the tree as JSON
    #[arg(long)]
    pub json: bool,

    /// Register the hammer producer as well
    #[arg(long)]
    pub with_hammer: bool,
}

/// Execute tree command
pub fn execute(args: TreeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = demo::registry(args.with_hammer).map_err(ExError::from)?;
    let mut tree = registry.build(&demo::raw_materials());

    if let Some(target) = args.target {
        tree.prune_for(target.category()).map_err(ExError::from)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree.snapshot())?);
    } else {
        print!("{}", tree.render());
        println!("{} nodes", tree.count());
    }

    Ok(())
}
