//! Session context
//!
//! The orchestrator never reads ambient process-wide authentication state;
//! it asks a [`SessionSource`] at invocation time. A `None` answer maps to
//! a `Retry` outcome before anything user-visible is touched.

use async_trait::async_trait;

/// An authenticated catalog session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Catalog user the run queries on behalf of.
    pub user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Source of the current session, implemented by the surrounding
/// application's auth layer.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// The currently usable session, or `None` when authentication is
    /// temporarily unavailable.
    async fn current_session(&self) -> Option<Session>;
}
