//! Correlation types for resolution tracking
//!
//! Every call into the resolver gets a fresh `ResolutionId` so that the
//! log events of one derivation can be told apart from another.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single resolution attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionId(String);

impl ResolutionId {
    /// Generate a new ResolutionId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for ResolutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResolutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
