//! Video sources feeding frames to the acquisition loop.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::tracker::Frame;

/// A blocking, sequential supplier of frames.
///
/// # Example
///
/// ```ignore
/// use roi_track::{Frame, VideoSource};
///
/// struct Camera { /* device handle */ }
///
/// impl VideoSource for Camera {
///     type Error = std::io::Error;
///
///     fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
///         // Block until the next frame is captured
///         Ok(None)
///     }
/// }
/// ```
pub trait VideoSource {
    /// Error type for read failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Block until the next frame is available.
    ///
    /// # Returns
    /// `Ok(None)` once the source is exhausted, which is not an error.
    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error>;
}

/// In-memory frame sequence.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    frames: VecDeque<Frame>,
}

impl VecSource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Frames not read yet.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl VideoSource for VecSource {
    type Error = Infallible;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        Ok(self.frames.pop_front())
    }
}

/// Error type for [`ImageDirSource`].
#[derive(Debug, Error)]
pub enum ImageSourceError {
    #[error("failed to list frames in {}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode frame {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Frames read from the image files of a directory, in file-name order.
#[derive(Debug, Clone)]
pub struct ImageDirSource {
    paths: VecDeque<PathBuf>,
}

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "pgm", "ppm", "pnm"];

impl ImageDirSource {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, ImageSourceError> {
        let dir = dir.as_ref();
        let list_err = |source| ImageSourceError::List {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(list_err)? {
            let path = entry.map_err(list_err)?.path();
            let is_frame = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_ascii_lowercase())
                .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.as_str()));
            if is_frame && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        debug!("Found {} frames in {}", paths.len(), dir.display());
        Ok(Self {
            paths: paths.into(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl VideoSource for ImageDirSource {
    type Error = ImageSourceError;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };
        let image =
            image::open(&path).map_err(|source| ImageSourceError::Decode { path, source })?;
        Ok(Some(Frame::from_image(&image)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_source_exhausts() {
        let frame = Frame::from_gray(2, 2, vec![0; 4]).unwrap();
        let mut source = VecSource::new([frame.clone(), frame]);
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.next_frame().unwrap().is_none());
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("roi-track-source-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_image_dir_source_orders_by_name() {
        let dir = scratch_dir("ordered");

        image::GrayImage::new(4, 3).save(dir.join("0002.png")).unwrap();
        image::GrayImage::new(6, 5).save(dir.join("0001.png")).unwrap();
        fs::write(dir.join("notes.txt"), "not a frame").unwrap();

        let mut source = ImageDirSource::open(&dir).unwrap();
        assert_eq!(source.remaining(), 2);

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!((first.width(), first.height()), (6, 5));
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!((second.width(), second.height()), (4, 3));
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_image_dir_source_reports_decode_errors() {
        let dir = scratch_dir("garbage");
        fs::write(dir.join("0001.png"), "garbage").unwrap();

        let mut source = ImageDirSource::open(&dir).unwrap();
        assert!(matches!(
            source.next_frame(),
            Err(ImageSourceError::Decode { .. })
        ));
    }

    #[test]
    fn test_missing_dir() {
        assert!(matches!(
            ImageDirSource::open("/nonexistent/roi-track-frames"),
            Err(ImageSourceError::List { .. })
        ));
    }
}
