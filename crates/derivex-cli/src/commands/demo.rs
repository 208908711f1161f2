//! Crafting demo domain
//!
//! Boulders are chiselled into stones, trees yield sticks, and a stick with
//! a stone makes an axe (or, optionally, a hammer).

use std::convert::Infallible;

use clap::ValueEnum;
use derivex_core::{Category, Producer, ProductionRegistry, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Boulder {
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stone {
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stick {
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axe {
    pub weight: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hammer {
    pub weight: u32,
    pub height: u32,
}

/// Categories a demo query can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Stone,
    Stick,
    Axe,
    Hammer,
}

impl Target {
    pub fn category(self) -> Category {
        match self {
            Target::Stone => Category::of::<Stone>(),
            Target::Stick => Category::of::<Stick>(),
            Target::Axe => Category::of::<Axe>(),
            Target::Hammer => Category::of::<Hammer>(),
        }
    }
}

fn chisel(boulder: Boulder) -> std::result::Result<Stone, Infallible> {
    Ok(Stone {
        weight: boulder.weight / 10,
    })
}

fn pickup(tree: Tree) -> std::result::Result<Stick, Infallible> {
    Ok(Stick {
        height: tree.height / 10,
    })
}

fn assemble(stick: Stick, stone: Stone) -> std::result::Result<Axe, Infallible> {
    Ok(Axe {
        weight: stone.weight,
        height: stick.height,
    })
}

fn hammer(stone: Stone, stick: Stick) -> std::result::Result<Hammer, Infallible> {
    Ok(Hammer {
        weight: stone.weight,
        height: stick.height,
    })
}

/// Registry with chisel, pickup and assemble, plus hammer on request
///
/// # Errors
///
/// Propagates any registration failure.
pub fn registry(with_hammer: bool) -> Result<ProductionRegistry> {
    let mut registry = ProductionRegistry::new();
    registry.add(Producer::new("chisel", chisel)?)?;
    registry.add(Producer::new("pickup", pickup)?)?;
    registry.add(Producer::new("assemble", assemble)?)?;
    if with_hammer {
        registry.add(Producer::new("hammer", hammer)?)?;
    }
    Ok(registry)
}

/// Starting categories of every demo query
pub fn raw_materials() -> Vec<Category> {
    vec![Category::of::<Boulder>(), Category::of::<Tree>()]
}
