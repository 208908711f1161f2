#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::convert::Infallible;

use common::*;
use derivex_core::{Category, ExErrorKind, Producer, ProducerDefect, ProductionRegistry, ResolveError};

#[test]
fn test_zero_input_producer_rejected() {
    let mut registry = ProductionRegistry::new();
    let err = registry
        .add(Producer::from_fn("constant", || Ok::<_, Infallible>(Stone { weight: 1 })))
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::InvalidProducer {
            defect: ProducerDefect::NoInputs,
            ..
        }
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_duplicate_input_categories_rejected() {
    let mut registry = ProductionRegistry::new();
    let err = registry
        .add(Producer::from_fn("double", |a: Stone, b: Stone| {
            Ok::<_, Infallible>(Boulder {
                weight: a.weight + b.weight,
            })
        }))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidProducer);
    assert!(registry.is_empty());
}

#[test]
fn test_duplicate_producer_rejected() {
    let mut registry = ProductionRegistry::new();
    registry.add(chisel()).unwrap();

    let err = registry.add(chisel()).unwrap_err();

    assert!(matches!(err, ResolveError::DuplicateProducer { .. }));
    assert_eq!(registry.producers_for(Category::of::<Stone>()).len(), 1);
}

#[test]
fn test_distinct_producers_share_output() {
    let mut registry = ProductionRegistry::new();
    registry.add(chisel()).unwrap();
    registry
        .add(Producer::from_fn("split", |b: Boulder| {
            Ok::<_, Infallible>(Stone {
                weight: b.weight / 2,
            })
        }))
        .unwrap();

    assert_eq!(registry.producers_for(Category::of::<Stone>()).len(), 2);
}

#[test]
fn test_one_node_cycle() {
    let mut registry = ProductionRegistry::new();
    let err = registry
        .add(Producer::from_fn("identity", |s: Stone| Ok::<_, Infallible>(s)))
        .unwrap_err();

    assert!(matches!(err, ResolveError::CyclicDependency { .. }));
    assert!(registry.is_empty());
    assert!(registry.categories().is_empty());
}

#[test]
fn test_two_node_cycle() {
    let mut registry = ProductionRegistry::new();
    registry
        .add(Producer::from_fn("g", |i: i32| Ok::<_, Infallible>(i.to_string())))
        .unwrap();

    let err = registry
        .add(Producer::from_fn("h", |s: String| Ok::<_, Infallible>(s.len() as i32)))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::CyclicDependency);
    assert_eq!(registry.len(), 1);
    assert!(!registry.produces(Category::of::<i32>()));
}

#[test]
fn test_three_node_cycle() {
    let mut registry = ProductionRegistry::new();
    registry
        .add(Producer::from_fn("g", |i: i32| Ok::<_, Infallible>(i.to_string())))
        .unwrap();
    registry
        .add(Producer::from_fn("h", |s: String| Ok::<_, Infallible>(s.len() as f64)))
        .unwrap();

    let err = registry
        .add(Producer::from_fn("i", |f: f64| Ok::<_, Infallible>(f as i32)))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::CyclicDependency);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_three_node_chain_without_cycle() {
    let mut registry = ProductionRegistry::new();
    registry
        .add(Producer::from_fn("g", |i: i32| Ok::<_, Infallible>(i.to_string())))
        .unwrap();
    registry
        .add(Producer::from_fn("h", |s: String| Ok::<_, Infallible>(s.len() as f64)))
        .unwrap();
    registry
        .add(Producer::from_fn("i", |f: f64| Ok::<_, Infallible>(f as u8)))
        .unwrap();

    assert_eq!(registry.len(), 3);
}

#[test]
fn test_cycle_through_second_input() {
    let mut registry = ProductionRegistry::new();
    registry.add(chisel()).unwrap();
    registry.add(pickup()).unwrap();
    registry.add(assemble()).unwrap();

    // Axe -> Tree closes Tree -> Stick -> Axe -> Tree
    let err = registry
        .add(Producer::from_fn("plant", |a: Axe| {
            Ok::<_, Infallible>(Tree { height: a.height })
        }))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::CyclicDependency);
    assert_eq!(registry.len(), 3);
    assert!(!registry.produces(Category::of::<Tree>()));
}

#[test]
fn test_rejected_add_leaves_registry_unchanged() {
    let mut registry = registry_with(vec![chisel(), pickup()]);
    let before: Vec<String> = registry.list().iter().map(|p| p.to_string()).collect();

    registry
        .add(Producer::from_fn("regrow", |s: Stick| {
            Ok::<_, Infallible>(Tree { height: s.height })
        }))
        .unwrap_err();
    registry.add(chisel()).unwrap_err();

    let after: Vec<String> = registry.list().iter().map(|p| p.to_string()).collect();
    assert_eq!(before, after);
    assert_eq!(
        registry.categories(),
        vec![Category::of::<Stone>(), Category::of::<Stick>()]
    );
}

#[test]
fn test_list_in_registration_order() {
    let registry = registry_with(all_producers());
    let names: Vec<&str> = registry.list().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["chisel", "pickup", "assemble", "hammer"]);
}

#[test]
fn test_same_function_under_new_name_is_duplicate() {
    let mut registry = ProductionRegistry::new();
    registry
        .add(Producer::from_fn("chisel", chisel_stone))
        .unwrap();

    let err = registry
        .add(Producer::from_fn("carve", chisel_stone))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::DuplicateProducer);
    assert_eq!(registry.len(), 1);
}
