//! derivex CLI
//!
//! Command-line front end over the crafting demo registry

use clap::{Parser, Subcommand, ValueEnum};
use derivex_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "derivex")]
#[command(about = "derivex - Type-directed production-rule resolution", long_about = None)]
struct Cli {
    /// Logging profile (RUST_LOG overrides its filter)
    #[arg(long, value_enum, global = true, default_value = "production")]
    log_profile: LogProfile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogProfile {
    Development,
    Production,
}

impl From<LogProfile> for Profile {
    fn from(profile: LogProfile) -> Self {
        match profile {
            LogProfile::Development => Profile::Development,
            LogProfile::Production => Profile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the possibility tree for Boulder and Tree
    Tree(commands::tree::TreeArgs),
    /// Derive a tool from a boulder and a tree
    Resolve(commands::resolve::ResolveArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile.into());
    tracing::debug!(command = ?cli.command, "dispatching");

    let result = match cli.command {
        Commands::Tree(args) => commands::tree::execute(args),
        Commands::Resolve(args) => commands::resolve::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
