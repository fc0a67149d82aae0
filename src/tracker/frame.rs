//! Grayscale image snapshot handed to the tracker once per loop iteration.

use image::DynamicImage;
use ndarray::{Array2, ArrayView2, s};

use crate::tracker::region::Region;

/// Immutable luminance frame. Rows are the y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixels: Array2<u8>,
}

impl Frame {
    pub fn new(pixels: Array2<u8>) -> Self {
        Self { pixels }
    }

    /// Build a frame from row-major luminance bytes. Returns `None` if
    /// `data.len() != width * height`.
    pub fn from_gray(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        Array2::from_shape_vec((height, width), data)
            .ok()
            .map(Self::new)
    }

    /// Convert any decoded image to its luminance plane.
    pub fn from_image(image: &DynamicImage) -> Self {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        let pixels = Array2::from_shape_vec((height as usize, width as usize), gray.into_raw())
            .unwrap_or_else(|_| Array2::zeros((height as usize, width as usize)));
        Self::new(pixels)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn pixels(&self) -> ArrayView2<'_, u8> {
        self.pixels.view()
    }

    /// View of the pixels under `region`, or `None` if it is not fully inside the frame.
    pub fn crop(&self, region: &Region) -> Option<ArrayView2<'_, u8>> {
        if !region.fits_within(self.width(), self.height()) {
            return None;
        }
        let (x, y) = (region.x() as usize, region.y() as usize);
        Some(self.pixels.slice(s![
            y..y + region.height() as usize,
            x..x + region.width() as usize
        ]))
    }
}
