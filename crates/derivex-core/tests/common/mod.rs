use std::convert::Infallible;

use derivex_core::{Category, PossibilityNode, Producer, ProductionRegistry};

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

pub fn chisel_stone(b: Boulder) -> Result<Stone, Infallible> {
    Ok(Stone {
        weight: b.weight / 10,
    })
}

pub fn pickup_stick(t: Tree) -> Result<Stick, Infallible> {
    Ok(Stick {
        height: t.height / 10,
    })
}

pub fn assemble_axe(stick: Stick, stone: Stone) -> Result<Axe, Infallible> {
    Ok(Axe {
        weight: stone.weight,
        height: stick.height,
    })
}

pub fn assemble_hammer(stone: Stone, stick: Stick) -> Result<Hammer, Infallible> {
    Ok(Hammer {
        weight: stone.weight,
        height: stick.height,
    })
}

#[allow(dead_code)]
pub fn chisel() -> Producer {
    Producer::from_fn("chisel", chisel_stone)
}

#[allow(dead_code)]
pub fn pickup() -> Producer {
    Producer::from_fn("pickup", pickup_stick)
}

#[allow(dead_code)]
pub fn assemble() -> Producer {
    Producer::from_fn("assemble", assemble_axe)
}

#[allow(dead_code)]
pub fn hammer() -> Producer {
    Producer::from_fn("hammer", assemble_hammer)
}

/// chisel, pickup, assemble, hammer
#[allow(dead_code)]
pub fn all_producers() -> Vec<Producer> {
    vec![chisel(), pickup(), assemble(), hammer()]
}

/// Registry with the given producers added in order
///
/// # Panics
///
/// Panics if any producer is rejected.
#[allow(dead_code)]
pub fn registry_with(producers: Vec<Producer>) -> ProductionRegistry {
    let mut registry = ProductionRegistry::new();
    for producer in producers {
        registry.add(producer).unwrap();
    }
    registry
}

/// Boulder and Tree, the raw materials of every crafting scenario
#[allow(dead_code)]
pub fn raw_materials() -> Vec<Category> {
    vec![Category::of::<Boulder>(), Category::of::<Tree>()]
}

/// Every leaf of a subtree, left to right
#[allow(dead_code)]
pub fn leaves(node: &PossibilityNode) -> Vec<&PossibilityNode> {
    if node.is_leaf() {
        return vec![node];
    }
    node.next_steps().iter().flat_map(leaves).collect()
}
