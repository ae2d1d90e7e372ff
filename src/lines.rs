//! Line voting in (angle, distance) space and peak extraction.
//!
//! The histogram is stored row-major with one row per discretized angle and
//! one column per discretized distance, padded by a ring of always-zero cells
//! so that the 8-neighbour test in [`LineAccumulator::peaks`] never needs a
//! bounds check.

use rayon::prelude::*;

use crate::error::{zeroed_cells, HoughError, HoughResult};
use crate::points::EdgePoint;

/// A detected line in Hesse normal form: `x*cos(theta) + y*sin(theta) = rho`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarLine {
    /// Signed distance from the image origin, in pixels.
    pub rho: f32,
    /// Angle of the line normal, in radians, within `[0, π)`.
    pub theta: f32,
    /// Number of edge points that voted for this line.
    pub votes: u32,
}

/// Vote histogram over discretized line parameters.
///
/// The accumulator is a reusable scratch buffer: [`LineAccumulator::reset`]
/// resizes and zeroes it before every accumulation pass.
#[derive(Debug, Clone, Default)]
pub struct LineAccumulator {
    numangle: usize,
    numrho: usize,
    rho_step: f32,
    theta_step: f32,
    cells: Vec<u32>,
}

impl LineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of angle and distance bins for a `width` x `height` image.
    ///
    /// `numangle = round(π / theta_step)` and
    /// `numrho = round((2 * (width + height) + 1) / rho_step)`. Either count
    /// being zero is a parameter error.
    pub fn dimensions(
        width: u32,
        height: u32,
        rho_step: f32,
        theta_step: f32,
    ) -> HoughResult<(usize, usize)> {
        let numangle = (std::f64::consts::PI / theta_step as f64).round();
        if !(numangle >= 1.0) {
            return Err(HoughError::invalid(
                "theta_step",
                format!("{theta_step} leaves no angle bins"),
            ));
        }

        let span = 2 * (width as u64 + height as u64) + 1;
        let numrho = (span as f64 / rho_step as f64).round();
        if !(numrho >= 1.0) {
            return Err(HoughError::invalid(
                "rho_step",
                format!("{rho_step} leaves no distance bins for a {width}x{height} image"),
            ));
        }

        Ok((numangle as usize, numrho as usize))
    }

    /// Sizes the histogram for a `width` x `height` image and clears every cell.
    pub fn reset(
        &mut self,
        width: u32,
        height: u32,
        rho_step: f32,
        theta_step: f32,
    ) -> HoughResult<()> {
        let (numangle, numrho) = Self::dimensions(width, height, rho_step, theta_step)?;
        let cells = numangle
            .checked_add(2)
            .zip(numrho.checked_add(2))
            .and_then(|(rows, cols)| rows.checked_mul(cols))
            .ok_or(HoughError::AllocationFailed { cells: usize::MAX })?;

        zeroed_cells(&mut self.cells, cells)?;
        self.numangle = numangle;
        self.numrho = numrho;
        self.rho_step = rho_step;
        self.theta_step = theta_step;
        Ok(())
    }

    /// Casts one vote per (point, angle) pair.
    ///
    /// # Arguments
    ///
    /// * `points` - Edge points, in any order
    ///
    /// The histogram must have been sized with [`LineAccumulator::reset`];
    /// votes add to what is already there.
    ///
    /// # Algorithm
    ///
    /// Angle rows are distributed over the rayon pool. Each worker owns its row
    /// exclusively and computes the row's `cos`/`sin` once, so the result does
    /// not depend on scheduling or on the order of `points`. Distances are
    /// discretized with round-half-away-from-zero; votes landing outside
    /// `[0, numrho)` are dropped.
    pub fn accumulate(&mut self, points: &[EdgePoint]) {
        let stride = self.stride();
        let numangle = self.numangle;
        let numrho = self.numrho as i64;
        let shift = self.rho_shift() as i64;
        let irho = 1.0 / self.rho_step;
        let theta_step = self.theta_step;

        self.cells
            .par_chunks_mut(stride)
            .skip(1)
            .take(numangle)
            .enumerate()
            .for_each(|(n, row)| {
                let angle = n as f32 * theta_step;
                let cos_val = angle.cos() * irho;
                let sin_val = angle.sin() * irho;

                // column of the padded row is the shifted distance index + 1
                for p in points {
                    let r = (p.x as f32 * cos_val + p.y as f32 * sin_val).round() as i64 + shift;
                    if (0..numrho).contains(&r) {
                        row[r as usize + 1] += 1;
                    }
                }
            });
    }

    /// Extracts strict local maxima above `threshold`.
    ///
    /// # Arguments
    ///
    /// * `threshold` - A cell needs strictly more votes than this
    /// * `max_lines` - Upper bound on the number of returned lines
    /// * `do_sort` - Rank the peaks by votes before truncating
    ///
    /// # Returns
    ///
    /// Lines with `rho = (column - numrho / 2) * rho_step` and
    /// `theta = row * theta_step`, plus their vote counts.
    ///
    /// A cell qualifies when its count exceeds `threshold` and is strictly
    /// greater than each of its 8 neighbours, so flat plateaus yield nothing.
    /// Peaks are gathered in ascending cell order. With `do_sort` they are
    /// then stably sorted by votes, highest first, which breaks ties by cell
    /// order. At most `max_lines` peaks are returned.
    pub fn peaks(&self, threshold: u32, max_lines: usize, do_sort: bool) -> Vec<PolarLine> {
        let stride = self.stride();
        let numrho = self.numrho;
        let shift = self.rho_shift() as f32;
        let rho_step = self.rho_step;
        let theta_step = self.theta_step;
        let cells = &self.cells;

        let mut lines: Vec<PolarLine> = (1..=self.numangle)
            .into_par_iter()
            .flat_map_iter(|n| {
                (1..=numrho).filter_map(move |r| {
                    let idx = n * stride + r;
                    let votes = cells[idx];
                    if votes <= threshold {
                        return None;
                    }

                    let up = idx - stride;
                    let down = idx + stride;
                    let neighbours = [
                        up - 1,
                        up,
                        up + 1,
                        idx - 1,
                        idx + 1,
                        down - 1,
                        down,
                        down + 1,
                    ];
                    if !neighbours.iter().all(|&j| votes > cells[j]) {
                        return None;
                    }

                    Some(PolarLine {
                        rho: ((r - 1) as f32 - shift) * rho_step,
                        theta: (n - 1) as f32 * theta_step,
                        votes,
                    })
                })
            })
            .collect();

        if do_sort {
            lines.sort_by(|a, b| b.votes.cmp(&a.votes));
        }
        lines.truncate(max_lines);
        lines
    }

    /// Number of angle bins.
    pub fn numangle(&self) -> usize {
        self.numangle
    }

    /// Number of distance bins.
    pub fn numrho(&self) -> usize {
        self.numrho
    }

    /// Offset added to a discretized distance to make it a column index.
    pub fn rho_shift(&self) -> usize {
        self.numrho / 2
    }

    /// Votes in bin (`angle`, `rho`), unpadded indices.
    pub fn votes(&self, angle: usize, rho: usize) -> u32 {
        self.cells
            .get((angle + 1) * self.stride() + rho + 1)
            .copied()
            .unwrap_or(0)
    }

    /// Raw padded histogram, `(numangle + 2)` rows of `numrho + 2` cells.
    pub fn as_slice(&self) -> &[u32] {
        &self.cells
    }

    fn stride(&self) -> usize {
        self.numrho + 2
    }
}
