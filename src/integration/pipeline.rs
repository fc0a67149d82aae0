//! AcquisitionLoop for driving a tracker session from a video source.

use log::{error, info, warn};

use crate::error::{RunError, StoreError};
use crate::store::RegionStore;
use crate::tracker::{Frame, Region, TrackerSession, TrackerState, TrackingCapability};

use super::{RegionSelector, Renderer, StopSignal, VideoSource};

/// Where the initial region came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOrigin {
    /// Read from the region store.
    Loaded,
    /// Selected because no record existed.
    Selected,
    /// Selected because the record was corrupt or unreadable.
    SelectedAfterCorrupt,
}

/// Why the steady-state loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The video source had no more frames.
    Exhausted,
    /// The stop signal was raised.
    Requested,
}

/// Outcome of a clean run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames processed, including the initialization frame.
    pub frames: u64,
    /// Frames rendered as `Tracking`.
    pub tracked: u64,
    /// Frames rendered as `Lost`.
    pub lost: u64,
    pub final_state: TrackerState,
    pub region_origin: RegionOrigin,
    pub stop_reason: StopReason,
}

impl RunSummary {
    fn new(region_origin: RegionOrigin) -> Self {
        Self {
            frames: 0,
            tracked: 0,
            lost: 0,
            final_state: TrackerState::Uninitialized,
            region_origin,
            stop_reason: StopReason::Exhausted,
        }
    }

    fn record(&mut self, state: TrackerState) {
        self.frames += 1;
        match state {
            TrackerState::Tracking(_) => self.tracked += 1,
            TrackerState::Lost(_) => self.lost += 1,
            TrackerState::Uninitialized => {}
        }
        self.final_state = state;
    }
}

/// Drives a [`TrackerSession`] over the frames of a [`VideoSource`].
///
/// Startup restores the region from the [`RegionStore`] or, if there is none,
/// asks the [`RegionSelector`] and saves its answer. Every following frame is
/// updated, rendered, and then the [`StopSignal`] is polled.
pub struct AcquisitionLoop<C, S, P, R, T> {
    store: RegionStore,
    session: TrackerSession<C>,
    source: S,
    selector: P,
    renderer: R,
    stop: T,
}

impl<C, S, P, R, T> AcquisitionLoop<C, S, P, R, T>
where
    C: TrackingCapability,
    S: VideoSource,
    P: RegionSelector,
    R: Renderer,
    T: StopSignal,
{
    pub fn new(
        store: RegionStore,
        session: TrackerSession<C>,
        source: S,
        selector: P,
        renderer: R,
        stop: T,
    ) -> Self {
        Self {
            store,
            session,
            source,
            selector,
            renderer,
            stop,
        }
    }

    /// Run until the stop signal is raised or the source is exhausted.
    ///
    /// # Returns
    /// A summary of the run, or the fatal startup/read error that aborted it.
    /// Frames where the target is lost are not errors.
    pub fn run(&mut self) -> Result<RunSummary, RunError> {
        let (frame, region_origin) = self.start()?;

        let mut summary = RunSummary::new(region_origin);
        let state = self.session.state();
        self.renderer.render(&frame, state);
        summary.record(state);

        loop {
            if self.stop.should_stop() {
                summary.stop_reason = StopReason::Requested;
                break;
            }

            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(err) => return Err(RunError::FrameRead(err.into())),
            };

            let state = self.session.update(&frame)?;
            self.renderer.render(&frame, state);
            summary.record(state);
        }

        info!(
            "Run finished ({:?}) after {} frames: {} tracking, {} lost",
            summary.stop_reason, summary.frames, summary.tracked, summary.lost
        );
        Ok(summary)
    }

    /// Initialize the session and return the frame it was initialized on.
    fn start(&mut self) -> Result<(Frame, RegionOrigin), RunError> {
        let (saved, corrupt) = match self.store.load() {
            Ok(saved) => (saved, false),
            Err(err @ (StoreError::Corrupt { .. } | StoreError::Unreadable { .. })) => {
                warn!("Ignoring saved region: {err}");
                (None, true)
            }
            Err(err) => return Err(err.into()),
        };

        let frame = self.first_frame()?;

        if let Some(region) = saved {
            self.session.initialize(&frame, region).inspect_err(|err| {
                error!("Saved region {region} no longer matches the video source: {err}");
            })?;
            return Ok((frame, RegionOrigin::Loaded));
        }

        let region = self.select(&frame)?;
        self.session.initialize(&frame, region)?;
        self.store.save(region)?;

        let origin = if corrupt {
            RegionOrigin::SelectedAfterCorrupt
        } else {
            RegionOrigin::Selected
        };
        Ok((frame, origin))
    }

    fn first_frame(&mut self) -> Result<Frame, RunError> {
        match self.source.next_frame() {
            Ok(Some(frame)) => Ok(frame),
            Ok(None) => Err(RunError::NoFrameAvailable(None)),
            Err(err) => Err(RunError::NoFrameAvailable(Some(err.into()))),
        }
    }

    fn select(&mut self, frame: &Frame) -> Result<Region, RunError> {
        info!("Waiting for region selection");
        self.selector
            .select_region(frame)
            .ok_or(RunError::RegionSelectionAborted)
    }

    pub fn session(&self) -> &TrackerSession<C> {
        &self.session
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
