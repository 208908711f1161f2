//! Core types shared across derivex facilities
//!
//! This crate provides foundational types used by both the error and
//! logging facilities of `derivex-core`:
//!
//! - **Correlation types**: ResolutionId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::ResolutionId;
