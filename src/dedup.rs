//! Minimum-distance suppression of circle-center candidates.
//!
//! This is the only sequential stage of the circle pipeline. Each acceptance
//! depends on every earlier acceptance, so candidates are consumed strictly in
//! the order they are given. Accepted centers are bucketed in a uniform grid
//! with cell side `min_dist`; any accepted center closer than `min_dist` to a
//! query lies in one of the 3x3 cells around it.

use std::collections::HashMap;

use crate::centers::CenterCandidate;

/// Greedy first-come-first-served filter enforcing a minimum center distance.
#[derive(Debug, Clone)]
pub struct CenterDeduplicator {
    min_dist: f32,
    grid: HashMap<(i64, i64), Vec<(f32, f32)>>,
}

impl CenterDeduplicator {
    /// Creates a filter for the given minimum distance, in image pixels.
    pub fn new(min_dist: f32) -> Self {
        Self {
            min_dist,
            grid: HashMap::new(),
        }
    }

    /// `true` when `min_dist <= 1`; every candidate is then kept.
    pub fn is_passthrough(&self) -> bool {
        !(self.min_dist > 1.0)
    }

    /// Writes the accepted subset of `candidates` into `retained` and returns
    /// its size.
    ///
    /// A candidate is accepted iff its image-space distance (grid coordinates
    /// times `dp`) to every previously accepted candidate is at least
    /// `min_dist`. Re-running on the same input gives the same output.
    pub fn deduplicate(
        &mut self,
        candidates: &[CenterCandidate],
        dp: f32,
        retained: &mut Vec<CenterCandidate>,
    ) -> usize {
        retained.clear();
        self.grid.clear();

        if self.is_passthrough() {
            retained.extend_from_slice(candidates);
            return retained.len();
        }

        let min_dist_sq = self.min_dist * self.min_dist;
        for candidate in candidates {
            let (x, y) = candidate.position(dp);
            let cell = self.cell_of(x, y);

            if !self.has_neighbour_within(cell, x, y, min_dist_sq) {
                self.grid.entry(cell).or_default().push((x, y));
                retained.push(*candidate);
            }
        }

        retained.len()
    }

    fn cell_of(&self, x: f32, y: f32) -> (i64, i64) {
        (
            (x / self.min_dist).floor() as i64,
            (y / self.min_dist).floor() as i64,
        )
    }

    fn has_neighbour_within(&self, (cx, cy): (i64, i64), x: f32, y: f32, min_dist_sq: f32) -> bool {
        (cy - 1..=cy + 1).any(|gy| {
            (cx - 1..=cx + 1).any(|gx| {
                self.grid.get(&(gx, gy)).is_some_and(|accepted| {
                    accepted.iter().any(|&(ax, ay)| {
                        let dx = x - ax;
                        let dy = y - ay;
                        dx * dx + dy * dy < min_dist_sq
                    })
                })
            })
        })
    }
}
