//! Error types for the region store, the tracker session and the acquisition loop.
//!
//! Losing the target in a frame is not an error; it is reported through
//! [`TrackerState::Lost`](crate::tracker::TrackerState::Lost).

use std::path::PathBuf;

use thiserror::Error;

use crate::tracker::Region;

/// Boxed error used for collaborator failures whose concrete type is not known to the loop.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of the persisted region record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record exists but does not hold exactly one well-formed region.
    #[error("region record {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The record exists but could not be read.
    #[error("region record {} could not be read", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be written.
    #[error("region record {} could not be written", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a tracking capability refused a region.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("region {0} is too small to track")]
    Degenerate(Region),

    #[error("region {region} does not fit inside a {width}x{height} frame")]
    OutOfBounds {
        region: Region,
        width: usize,
        height: usize,
    },

    #[error("{0}")]
    Rejected(String),
}

/// Failures of the tracker session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The capability refused the initial region; the session stays uninitialized.
    #[error("tracker initialization failed")]
    InitializationFailed(#[source] CapabilityError),

    /// `initialize` was called on a session that is already tracking.
    #[error("tracker session is already initialized")]
    AlreadyInitialized,

    /// An operation was called from a state that does not allow it.
    #[error("`{operation}` called before a successful initialize")]
    InvalidStateTransition { operation: &'static str },
}

/// Fatal outcomes of an acquisition run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The video source had no frame to start from.
    #[error("no frame available from the video source")]
    NoFrameAvailable(#[source] Option<BoxError>),

    /// The user cancelled region selection.
    #[error("region selection was aborted")]
    RegionSelectionAborted,

    /// The video source failed after startup.
    #[error("failed to read a frame from the video source")]
    FrameRead(#[source] BoxError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
