//! Request identity types.

use serde::{Deserialize, Serialize};

/// Unique identifier for a single verification run.
///
/// Minted by the orchestrator on every `verify` call and attached to the
/// tracing span, so every log line of one run can be correlated. It never
/// appears in the result object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationId(pub uuid::Uuid);

impl VerificationId {
    /// Create a new, unique verification ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for VerificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VerificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
