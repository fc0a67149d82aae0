//! Single-object visual tracking with a persisted region of interest.
//!
//! A [`RegionStore`] keeps the tracked region between runs, a
//! [`TrackerSession`] turns a pluggable [`TrackingCapability`] into the
//! `Uninitialized -> Tracking <-> Lost` state machine, and an
//! [`AcquisitionLoop`] feeds it frames until the source runs dry or a stop is
//! requested.

pub mod error;
pub mod integration;
pub mod store;
pub mod tracker;

pub use error::{BoxError, CapabilityError, RunError, SessionError, StoreError};
pub use integration::{
    AcquisitionLoop, FixedSelector, RegionSelector, Renderer, RunSummary, StopSignal, VideoSource,
};
pub use store::{DEFAULT_RECORD_PATH, RegionStore};
pub use tracker::{
    Frame, Region, TemplateTracker, TemplateTrackerConfig, TrackerSession, TrackerState,
    TrackingCapability,
};
