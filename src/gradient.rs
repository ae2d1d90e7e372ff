//! Edge-detector collaborator for the circle pipeline.
//!
//! Circle voting needs a binary edge mask plus the horizontal and vertical
//! gradient at every pixel. [`detect_edges`] produces both with a Canny
//! detector and a parallel 3x3 Sobel operator; callers with their own edge
//! detector can build an [`EdgeMap`] directly.

use image::{GrayImage, ImageBuffer, Luma};
use rayon::prelude::*;

use crate::error::{HoughError, HoughResult};
use crate::points::EdgePoint;

/// Single-channel signed gradient plane.
pub type GradientImage = ImageBuffer<Luma<i16>, Vec<i16>>;

/// Binary edge mask with per-pixel gradient components.
#[derive(Debug, Clone)]
pub struct EdgeMap {
    edges: GrayImage,
    dx: GradientImage,
    dy: GradientImage,
}

impl EdgeMap {
    /// Bundles an edge mask with its gradient planes.
    ///
    /// All three images must have the same dimensions.
    pub fn new(edges: GrayImage, dx: GradientImage, dy: GradientImage) -> HoughResult<Self> {
        if edges.dimensions() != dx.dimensions() || edges.dimensions() != dy.dimensions() {
            return Err(HoughError::DimensionMismatch {
                mask: edges.dimensions(),
                dx: dx.dimensions(),
                dy: dy.dimensions(),
            });
        }
        Ok(Self { edges, dx, dy })
    }

    pub fn edges(&self) -> &GrayImage {
        &self.edges
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.edges.dimensions()
    }

    /// Gradient `(dx, dy)` at an edge point.
    pub fn gradient(&self, p: EdgePoint) -> (i16, i16) {
        let (x, y) = (p.x as u32, p.y as u32);
        (self.dx.get_pixel(x, y)[0], self.dy.get_pixel(x, y)[0])
    }
}

/// Runs Canny edge detection and Sobel gradient estimation on `image`.
///
/// # Arguments
///
/// * `image` - Input grayscale image
/// * `low_threshold` - Lower hysteresis threshold
/// * `high_threshold` - Upper hysteresis threshold
///
/// Images narrower or shorter than 3 pixels have no interior and yield an
/// empty edge mask.
///
/// # Examples
///
/// ```rust
/// use image::{GrayImage, Luma};
/// use hough_shapes::detect_edges;
///
/// let image = GrayImage::from_fn(32, 32, |x, _| if x < 16 { Luma([0]) } else { Luma([255]) });
/// let edge_map = detect_edges(&image, 50.0, 100.0);
/// assert!(edge_map.edges().pixels().any(|p| p[0] != 0));
/// ```
pub fn detect_edges(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> EdgeMap {
    let (width, height) = image.dimensions();
    let (dx, dy) = sobel_gradients(image);

    let edges = if width < 3 || height < 3 {
        GrayImage::new(width, height)
    } else {
        imageproc::edges::canny(image, low_threshold, high_threshold)
    };

    EdgeMap { edges, dx, dy }
}

/// Computes 3x3 Sobel gradients, one image row per rayon task.
///
/// Horizontal (dx):
/// ```text
/// [-1  0  1]
/// [-2  0  2]
/// [-1  0  1]
/// ```
///
/// Vertical (dy):
/// ```text
/// [-1 -2 -1]
/// [ 0  0  0]
/// [ 1  2  1]
/// ```
///
/// Border pixels are left at zero. On 8-bit input the magnitude of either
/// component is at most 1020, so `i16` is lossless.
pub fn sobel_gradients(image: &GrayImage) -> (GradientImage, GradientImage) {
    let (width, height) = image.dimensions();
    let mut dx = GradientImage::new(width, height);
    let mut dy = GradientImage::new(width, height);
    if width < 3 || height < 3 {
        return (dx, dy);
    }

    let w = width as usize;
    let pixels = image.as_raw();

    dx.par_chunks_mut(w)
        .zip(dy.par_chunks_mut(w))
        .enumerate()
        .skip(1)
        .take(height as usize - 2)
        .for_each(|(y, (dx_row, dy_row))| {
            let prev = &pixels[(y - 1) * w..y * w];
            let curr = &pixels[y * w..(y + 1) * w];
            let next = &pixels[(y + 1) * w..(y + 2) * w];

            for x in 1..w - 1 {
                let px = |row: &[u8], i: usize| row[i] as i32;

                let gx = (px(prev, x + 1) - px(prev, x - 1))
                    + 2 * (px(curr, x + 1) - px(curr, x - 1))
                    + (px(next, x + 1) - px(next, x - 1));
                let gy = (px(next, x - 1) - px(prev, x - 1))
                    + 2 * (px(next, x) - px(prev, x))
                    + (px(next, x + 1) - px(prev, x + 1));

                dx_row[x] = gx as i16;
                dy_row[x] = gy as i16;
            }
        });

    (dx, dy)
}
