//! Tracker session: wraps a tracking capability in the
//! `Uninitialized -> Tracking <-> Lost` state machine.

use log::{debug, info, warn};

use crate::error::SessionError;
use crate::tracker::capability::TrackingCapability;
use crate::tracker::frame::Frame;
use crate::tracker::region::Region;
use crate::tracker::track_state::TrackerState;

pub struct TrackerSession<C> {
    capability: C,
    state: TrackerState,
    frame_id: u64,
}

impl<C: TrackingCapability> TrackerSession<C> {
    pub fn new(capability: C) -> Self {
        Self {
            capability,
            state: TrackerState::Uninitialized,
            frame_id: 0,
        }
    }

    /// Hand `region` to the capability on `frame`.
    ///
    /// Only legal while uninitialized. On failure the session stays
    /// uninitialized and `update` remains illegal.
    pub fn initialize(&mut self, frame: &Frame, region: Region) -> Result<(), SessionError> {
        if self.state != TrackerState::Uninitialized {
            return Err(SessionError::AlreadyInitialized);
        }

        self.capability
            .init(frame, region)
            .map_err(SessionError::InitializationFailed)?;

        info!(
            "Tracker initialized on {region} ({}x{} frame)",
            frame.width(),
            frame.height()
        );
        self.state = TrackerState::Tracking(region);
        self.frame_id = 0;
        Ok(())
    }

    /// Feed the next frame and return the resulting state.
    ///
    /// A capability failure moves the session to `Lost` and keeps the last
    /// known region. A success adopts the newly reported region as is.
    pub fn update(&mut self, frame: &Frame) -> Result<TrackerState, SessionError> {
        let last_known = self
            .state
            .region()
            .ok_or(SessionError::InvalidStateTransition {
                operation: "update",
            })?;
        self.frame_id += 1;

        self.state = match self.capability.update(frame) {
            Some(region) => {
                if self.state.is_lost() {
                    info!("Frame {}: target reacquired at {region}", self.frame_id);
                } else {
                    debug!("Frame {}: tracking at {region}", self.frame_id);
                }
                TrackerState::Tracking(region)
            }
            None => {
                if self.state.is_tracking() {
                    warn!(
                        "Frame {}: target lost, keeping last known {last_known}",
                        self.frame_id
                    );
                }
                TrackerState::Lost(last_known)
            }
        };

        Ok(self.state)
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Number of successful or failed `update` calls since initialization.
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }
}
