mod capability;
mod frame;
mod kalman_filter;
mod region;
mod session;
mod template;
mod track_state;

pub use capability::TrackingCapability;
pub use frame::Frame;
pub use kalman_filter::KalmanFilter;
pub use region::{Region, RegionError};
pub use session::TrackerSession;
pub use template::{TemplateTracker, TemplateTrackerConfig};
pub use track_state::TrackerState;
