use bridge_traits::BridgeError;
use core_catalog::CatalogError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// The host platform has no recommendation-channel support.
    #[error("Host does not support recommendation channels")]
    ChannelsUnsupported,

    /// No authenticated session was available when the run started.
    #[error("No authenticated session available")]
    NoSession,

    #[error("Catalog request failed: {0}")]
    Gateway(#[from] CatalogError),

    #[error("Host store rejected an operation: {0}")]
    Store(#[from] BridgeError),
}

impl SyncError {
    /// Terminal outcome this error maps to.
    ///
    /// A missing session is the only transient condition: the caller should
    /// re-invoke later. Everything else is reported as a failed run and the
    /// next successful run self-corrects.
    pub fn outcome(&self) -> SyncOutcome {
        match self {
            SyncError::NoSession => SyncOutcome::Retry,
            SyncError::ChannelsUnsupported | SyncError::Gateway(_) | SyncError::Store(_) => {
                SyncOutcome::Failure
            }
        }
    }
}

/// Terminal outcome of one synchronization run, reported to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    /// All rebuild steps completed.
    Success,
    /// Permanent failure; do not retry automatically.
    Failure,
    /// Transient condition; re-invoke later. No user-visible rows were
    /// modified.
    Retry,
}

pub type Result<T> = std::result::Result<T, SyncError>;
