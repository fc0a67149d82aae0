//! Overlay feedback for each processed frame.

use std::fs;
use std::mem;
use std::path::PathBuf;

use image::{Rgb, RgbImage};
use log::{Level, log, warn};

use crate::tracker::{Frame, Region, TrackerState};

/// Receives every processed frame with the session state.
pub trait Renderer {
    fn render(&mut self, frame: &Frame, state: TrackerState);
}

impl Renderer for () {
    fn render(&mut self, _frame: &Frame, _state: TrackerState) {}
}

impl<A: Renderer, B: Renderer> Renderer for (A, B) {
    fn render(&mut self, frame: &Frame, state: TrackerState) {
        self.0.render(frame, state);
        self.1.render(frame, state);
    }
}

impl<T: Renderer + ?Sized> Renderer for &mut T {
    fn render(&mut self, frame: &Frame, state: TrackerState) {
        (**self).render(frame, state);
    }
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn render(&mut self, frame: &Frame, state: TrackerState) {
        (**self).render(frame, state);
    }
}

/// Reports state changes through the log facade, and every frame at debug level.
#[derive(Debug, Default)]
pub struct LogRenderer {
    frame_id: u64,
    last: TrackerState,
}

impl LogRenderer {
    /// Advance to `state` and describe it; changes of state are `Info`.
    fn describe(&mut self, state: TrackerState) -> (Level, String) {
        self.frame_id += 1;
        let changed = mem::discriminant(&state) != mem::discriminant(&self.last);
        self.last = state;

        match state {
            TrackerState::Tracking(region) if changed => (
                Level::Info,
                format!("[frame {}] Tracking {region}", self.frame_id),
            ),
            TrackerState::Lost(region) if changed => (
                Level::Info,
                format!("[frame {}] Lost! last seen at {region}", self.frame_id),
            ),
            _ => (
                Level::Debug,
                format!("[frame {}] {} {:?}", self.frame_id, state.label(), state.region()),
            ),
        }
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, _frame: &Frame, state: TrackerState) {
        let (level, message) = self.describe(state);
        log!(level, "{message}");
    }
}

const TRACKING_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LOST_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_THICKNESS: i32 = 2;
const LABEL_HEIGHT: i32 = 10;

/// Writes every frame with its overlay as a numbered PNG.
///
/// `Tracking` draws a green box around the region with a green label band
/// above it. `Lost` draws a red box at the last-known region plus a red band
/// along the top edge of the frame.
#[derive(Debug)]
pub struct AnnotatingRenderer {
    dir: PathBuf,
    frame_id: u64,
}

impl AnnotatingRenderer {
    /// Create `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, frame_id: 0 })
    }

    /// Draw the overlay for `state` on a copy of `frame`.
    pub fn annotate(frame: &Frame, state: TrackerState) -> RgbImage {
        let (width, height) = (frame.width() as u32, frame.height() as u32);
        let pixels = frame.pixels();
        let mut image = RgbImage::from_fn(width, height, |x, y| {
            let v = pixels[[y as usize, x as usize]];
            Rgb([v, v, v])
        });

        match state {
            TrackerState::Uninitialized => {}
            TrackerState::Tracking(region) => {
                draw_box(&mut image, &region, TRACKING_COLOR);
                let label_top = region.y().saturating_sub(LABEL_HEIGHT);
                let (x0, x1) = (region.x(), region.right());
                fill(&mut image, (x0, label_top), (x1, region.y()), TRACKING_COLOR);
            }
            TrackerState::Lost(region) => {
                draw_box(&mut image, &region, LOST_COLOR);
                fill(&mut image, (0, 0), (i32::MAX, BOX_THICKNESS * 2), LOST_COLOR);
            }
        }
        image
    }
}

impl Renderer for AnnotatingRenderer {
    fn render(&mut self, frame: &Frame, state: TrackerState) {
        self.frame_id += 1;
        let path = self.dir.join(format!("{:06}.png", self.frame_id));
        if let Err(err) = Self::annotate(frame, state).save(&path) {
            warn!("Failed to write annotated frame {}: {err}", path.display());
        }
    }
}

/// Filled rectangle `[x0, x1) x [y0, y1)` clipped to the image.
fn fill(image: &mut RgbImage, (x0, y0): (i32, i32), (x1, y1): (i32, i32), color: Rgb<u8>) {
    let clip = |v: i32, max: u32| v.clamp(0, max as i32) as u32;
    let (x0, x1) = (clip(x0, image.width()), clip(x1, image.width()));
    let (y0, y1) = (clip(y0, image.height()), clip(y1, image.height()));
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, color);
        }
    }
}

/// Hollow rectangle clipped to the image.
fn draw_box(image: &mut RgbImage, region: &Region, color: Rgb<u8>) {
    let (left, top) = (region.x(), region.y());
    let (right, bottom) = (region.right(), region.bottom());
    let t = BOX_THICKNESS.min(region.width()).min(region.height());

    fill(image, (left, top), (right, top + t), color);
    fill(image, (left, bottom - t), (right, bottom), color);
    fill(image, (left, top), (left + t, bottom), color);
    fill(image, (right - t, top), (right, bottom), color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::from_gray(20, 10, vec![100; 200]).unwrap()
    }

    #[test]
    fn test_annotate_tracking_box() {
        let region = Region::new(2, 2, 6, 5).unwrap();
        let image = AnnotatingRenderer::annotate(&frame(), TrackerState::Tracking(region));

        assert_eq!(image.dimensions(), (20, 10));
        assert_eq!(*image.get_pixel(2, 2), TRACKING_COLOR);
        assert_eq!(*image.get_pixel(7, 6), TRACKING_COLOR);
        assert_eq!(*image.get_pixel(5, 4), Rgb([100, 100, 100]));
        assert_eq!(*image.get_pixel(15, 8), Rgb([100, 100, 100]));
        // label band above the box, clipped at the top of the frame
        assert_eq!(*image.get_pixel(4, 0), TRACKING_COLOR);
        assert_eq!(*image.get_pixel(10, 0), Rgb([100, 100, 100]));
    }

    #[test]
    fn test_annotate_clips_extreme_regions() {
        let region = Region::new(i32::MAX - 4, -50, 4, 100).unwrap();
        let image = AnnotatingRenderer::annotate(&frame(), TrackerState::Tracking(region));
        assert!(image.pixels().all(|p| *p == Rgb([100, 100, 100])));

        let region = Region::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX).unwrap();
        let image = AnnotatingRenderer::annotate(&frame(), TrackerState::Lost(region));
        assert_eq!(*image.get_pixel(19, 0), LOST_COLOR);
        assert_eq!(*image.get_pixel(10, 5), Rgb([100, 100, 100]));
    }

    #[test]
    fn test_log_renderer_reports_state_changes() {
        let tracked = Region::new(1, 2, 3, 4).unwrap();
        let mut renderer = LogRenderer::default();

        let levels: Vec<Level> = [
            TrackerState::Tracking(tracked),
            TrackerState::Tracking(tracked),
            TrackerState::Lost(tracked),
            TrackerState::Lost(tracked),
            TrackerState::Tracking(tracked),
        ]
        .into_iter()
        .map(|state| renderer.describe(state).0)
        .collect();
        assert_eq!(
            levels,
            [Level::Info, Level::Debug, Level::Info, Level::Debug, Level::Info]
        );

        let (_, message) = renderer.describe(TrackerState::Lost(tracked));
        assert_eq!(message, "[frame 6] Lost! last seen at (1, 2, 3, 4)");
    }

    #[test]
    fn test_annotate_lost_marks_frame() {
        let region = Region::new(-3, 4, 6, 20).unwrap();
        let image = AnnotatingRenderer::annotate(&frame(), TrackerState::Lost(region));

        assert_eq!(*image.get_pixel(19, 0), LOST_COLOR);
        assert_eq!(*image.get_pixel(2, 5), LOST_COLOR);
        assert_eq!(*image.get_pixel(10, 5), Rgb([100, 100, 100]));
    }

    #[test]
    fn test_annotating_renderer_writes_numbered_frames() {
        let dir = std::env::temp_dir()
            .join(format!("roi-track-annotate-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let mut renderer = AnnotatingRenderer::new(&dir).unwrap();

        let region = Region::new(1, 1, 4, 4).unwrap();
        renderer.render(&frame(), TrackerState::Tracking(region));
        renderer.render(&frame(), TrackerState::Lost(region));

        assert!(dir.join("000001.png").is_file());
        assert!(dir.join("000002.png").is_file());
    }
}
