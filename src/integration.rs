//! Collaborators around the tracker session and the loop that drives them.
//!
//! This module provides the traits for frame sources, region selection,
//! overlay rendering and stop signals, a few ready-made implementations, and
//! the [`AcquisitionLoop`] tying them to a
//! [`TrackerSession`](crate::tracker::TrackerSession).

mod input;
mod pipeline;
mod render;
mod selector;
mod source;
mod stop;

pub use input::SharedInput;
pub use pipeline::{AcquisitionLoop, RegionOrigin, RunSummary, StopReason};
pub use render::{AnnotatingRenderer, LogRenderer, Renderer};
pub use selector::{FixedSelector, PromptSelector, RegionSelector};
pub use source::{ImageDirSource, ImageSourceError, VecSource, VideoSource};
pub use stop::{Never, QuitCommand, StopFlag, StopSignal};
