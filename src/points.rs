//! Compaction of a binary edge mask into a dense point list.

use image::GrayImage;
use rayon::prelude::*;

/// Pixel coordinates of a set pixel in an edge mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgePoint {
    pub x: u16,
    pub y: u16,
}

impl EdgePoint {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Collects the coordinates of every non-zero pixel of `mask` into `points`.
///
/// Rows are scanned in parallel; the list comes out in row-major order, but no
/// downstream stage depends on that. Previous content of `points` is
/// discarded. Returns the number of points; `0` means the mask has no
/// features and the caller should stop.
///
/// The mask dimensions must already be validated against
/// [`MAX_IMAGE_DIMENSION`](crate::MAX_IMAGE_DIMENSION).
///
/// # Examples
///
/// ```rust
/// use image::{GrayImage, Luma};
/// use hough_shapes::build_point_list;
///
/// let mut mask = GrayImage::new(4, 3);
/// mask.put_pixel(1, 0, Luma([255]));
/// mask.put_pixel(3, 2, Luma([1]));
///
/// let mut points = Vec::new();
/// assert_eq!(build_point_list(&mask, &mut points), 2);
/// assert_eq!((points[1].x, points[1].y), (3, 2));
/// ```
pub fn build_point_list(mask: &GrayImage, points: &mut Vec<EdgePoint>) -> usize {
    points.clear();

    let width = mask.width() as usize;
    if width == 0 || mask.height() == 0 {
        return 0;
    }

    points.par_extend(
        mask.as_raw()
            .par_chunks(width)
            .enumerate()
            .flat_map_iter(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, value)| **value != 0)
                    .map(move |(x, _)| EdgePoint::new(x as u16, y as u16))
            }),
    );

    points.len()
}
