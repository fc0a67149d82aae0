//! Trait for pluggable single-object tracking algorithms.

#[cfg(test)]
use mockall::automock;

use crate::error::CapabilityError;
use crate::tracker::frame::Frame;
use crate::tracker::region::Region;

/// A single-object tracking algorithm.
///
/// Implement this trait to drive any tracker (correlation filter, learned
/// model, ...) from a [`TrackerSession`](crate::tracker::TrackerSession).
///
/// # Example
///
/// ```ignore
/// use roi_track::{CapabilityError, Frame, Region, TrackingCapability};
///
/// struct StaticTracker(Option<Region>);
///
/// impl TrackingCapability for StaticTracker {
///     fn init(&mut self, _frame: &Frame, region: Region) -> Result<(), CapabilityError> {
///         self.0 = Some(region);
///         Ok(())
///     }
///
///     fn update(&mut self, _frame: &Frame) -> Option<Region> {
///         self.0
///     }
/// }
/// ```
#[cfg_attr(test, automock)]
pub trait TrackingCapability {
    /// Start tracking `region` in `frame`, discarding any previous target.
    fn init(&mut self, frame: &Frame, region: Region) -> Result<(), CapabilityError>;

    /// Locate the target in the next frame. `None` means it was not found.
    fn update(&mut self, frame: &Frame) -> Option<Region>;
}

impl<T: TrackingCapability + ?Sized> TrackingCapability for Box<T> {
    fn init(&mut self, frame: &Frame, region: Region) -> Result<(), CapabilityError> {
        (**self).init(frame, region)
    }

    fn update(&mut self, frame: &Frame) -> Option<Region> {
        (**self).update(frame)
    }
}
