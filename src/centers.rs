//! Circle-center voting along edge normals.
//!
//! Every edge point votes for all positions at distance `r` along its gradient
//! line, in both directions, for each integer `r` in the radius range. Real
//! centers collect votes from the whole circumference and stand out as peaks.

use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::error::{zeroed_cells, HoughError, HoughResult};
use crate::gradient::EdgeMap;
use crate::params::MAX_IMAGE_DIMENSION;
use crate::points::EdgePoint;

/// A cell of the center accumulator that cleared the vote threshold.
///
/// `x` and `y` are accumulator-grid coordinates; multiply by `dp` to get image
/// coordinates, see [`CenterCandidate::position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterCandidate {
    pub x: u16,
    pub y: u16,
    pub votes: u32,
}

impl CenterCandidate {
    /// Image-space position of the candidate.
    pub fn position(&self, dp: f32) -> (f32, f32) {
        (self.x as f32 * dp, self.y as f32 * dp)
    }
}

/// Vote histogram over candidate center positions.
///
/// The grid covers the image scaled by `1 / dp`, plus one padding cell on every
/// side that absorbs votes rounding just past the border. Cells are atomic so
/// that points can vote concurrently.
#[derive(Debug, Default)]
pub struct CenterAccumulator {
    width: usize,
    height: usize,
    cells: Vec<AtomicU32>,
}

impl CenterAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interior grid size, `ceil(width / dp)` x `ceil(height / dp)`.
    ///
    /// Fails when grid coordinates would not fit 16 bits.
    pub fn dimensions(width: u32, height: u32, dp: f32) -> HoughResult<(usize, usize)> {
        let idp = 1.0 / dp;
        let grid_width = (width as f32 * idp).ceil();
        let grid_height = (height as f32 * idp).ceil();
        let limit = MAX_IMAGE_DIMENSION as f32;
        if !(grid_width <= limit && grid_height <= limit) {
            return Err(HoughError::invalid(
                "dp",
                format!("{dp} gives a center grid of {grid_width}x{grid_height} cells"),
            ));
        }
        Ok((grid_width as usize, grid_height as usize))
    }

    /// Sizes the grid for a `width` x `height` image and clears every cell.
    pub fn reset(&mut self, width: u32, height: u32, dp: f32) -> HoughResult<()> {
        let (grid_width, grid_height) = Self::dimensions(width, height, dp)?;
        zeroed_cells(&mut self.cells, (grid_width + 2) * (grid_height + 2))?;
        self.width = grid_width;
        self.height = grid_height;
        Ok(())
    }

    /// Casts center votes for every edge point with a non-zero gradient.
    ///
    /// # Arguments
    ///
    /// * `points` - Edge points, in any order
    /// * `edge_map` - Source of the gradient `g` at each point
    /// * `min_radius` - Smallest radius voted for, in image pixels
    /// * `max_radius` - Largest radius voted for, inclusive
    /// * `idp` - Image to grid scale, `1 / dp`
    ///
    /// # Algorithm
    ///
    /// For each `r` in `min_radius..=max_radius` the point votes at
    /// `(p ± r * g / |g|) / dp`, rounded to the nearest cell. A ray stops at the
    /// first position outside the padded grid since it cannot come back.
    /// Points are processed in parallel; increments are relaxed atomic adds, so
    /// the final counts do not depend on processing order.
    pub fn accumulate(
        &self,
        points: &[EdgePoint],
        edge_map: &EdgeMap,
        min_radius: u32,
        max_radius: u32,
        idp: f32,
    ) {
        let stride = self.width + 2;
        let max_x = self.width as f32;
        let max_y = self.height as f32;

        points.par_iter().for_each(|&p| {
            let (vx, vy) = edge_map.gradient(p);
            if vx == 0 && vy == 0 {
                return;
            }

            let (vx, vy) = (vx as f32, vy as f32);
            let mag = vx.hypot(vy);
            let sx = vx / mag * idp;
            let sy = vy / mag * idp;
            let x0 = p.x as f32 * idp;
            let y0 = p.y as f32 * idp;

            // both directions along the normal
            for sign in [1.0f32, -1.0] {
                for r in min_radius..=max_radius {
                    let t = sign * r as f32;
                    let cx = (x0 + t * sx).round();
                    let cy = (y0 + t * sy).round();
                    if cx < -1.0 || cy < -1.0 || cx > max_x || cy > max_y {
                        break;
                    }

                    let idx = (cy + 1.0) as usize * stride + (cx + 1.0) as usize;
                    self.cells[idx].fetch_add(1, Ordering::Relaxed);
                }
            }
        });
    }

    /// Collects every interior cell with more than `threshold` votes.
    ///
    /// # Arguments
    ///
    /// * `threshold` - A cell needs strictly more votes than this
    /// * `candidates` - Output list; its previous content is replaced
    ///
    /// # Returns
    ///
    /// The number of candidates written.
    ///
    /// No local-maximum test is applied. Candidates are ordered by votes,
    /// highest first, with ties in raster order; this is the fixed order the
    /// deduplicator consumes.
    pub fn candidates(&self, threshold: u32, candidates: &mut Vec<CenterCandidate>) -> usize {
        let stride = self.width + 2;
        let width = self.width;
        let cells = &self.cells;

        candidates.clear();
        candidates.par_extend((0..self.height).into_par_iter().flat_map_iter(|y| {
            (0..width).filter_map(move |x| {
                let votes = cells[(y + 1) * stride + x + 1].load(Ordering::Relaxed);
                (votes > threshold).then_some(CenterCandidate {
                    x: x as u16,
                    y: y as u16,
                    votes,
                })
            })
        }));
        candidates.sort_by(|a, b| b.votes.cmp(&a.votes));

        candidates.len()
    }

    /// Interior grid size.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Votes at interior cell (`x`, `y`).
    pub fn votes(&self, x: usize, y: usize) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.cells[(y + 1) * (self.width + 2) + x + 1].load(Ordering::Relaxed)
    }

    /// Snapshot of the padded histogram, row-major.
    pub fn to_vec(&self) -> Vec<u32> {
        self.cells.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }
}
