//! Radius voting for retained circle centers.

use rayon::prelude::*;

use crate::centers::CenterCandidate;
use crate::params::CircleParams;
use crate::points::EdgePoint;

/// A detected circle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Finds the best-supported radius of every center and ranks the results.
///
/// # Arguments
///
/// * `centers` - Retained centers in grid units, in deduplication order
/// * `points` - The full edge point list, not only points near a center
/// * `params` - Supplies `dp`, the radius range, `votes_threshold` and
///   `max_circles`
///
/// # Returns
///
/// At most `params.max_circles` circles in image coordinates, highest radius
/// votes first.
///
/// # Algorithm
///
/// For each center, every edge point whose distance `d` satisfies
/// `min_radius <= d <= max_radius` votes for radius `round(d)`. The radius
/// with the most votes wins, the smaller one on ties, and the center is kept
/// only if that count reaches `votes_threshold`. Kept circles are stably
/// sorted by their radius votes, so ties stay in center order, then
/// truncated.
///
/// Centers are processed in parallel, each with a private radius histogram.
/// The histogram never extends past the largest distance that can occur
/// between a center and a point, whatever `max_radius` is.
pub fn accumulate_radii(
    centers: &[CenterCandidate],
    points: &[EdgePoint],
    params: &CircleParams,
) -> Vec<Circle> {
    let max_radius = params.max_radius.min(reach(centers, points, params.dp));

    let mut ranked: Vec<(Circle, u32)> = centers
        .par_iter()
        .filter_map(|center| {
            let (x, y) = center.position(params.dp);
            let (radius, votes) = best_radius(x, y, points, params.min_radius, max_radius);
            (votes >= params.votes_threshold).then_some((
                Circle {
                    x,
                    y,
                    radius: radius as f32,
                },
                votes,
            ))
        })
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(params.max_circles);
    ranked.into_iter().map(|(circle, _)| circle).collect()
}

/// Upper bound on any center-to-point distance, in whole pixels.
///
/// Every coordinate is non-negative, so both ends of a distance lie in the
/// box from the origin to the largest coordinates seen.
fn reach(centers: &[CenterCandidate], points: &[EdgePoint], dp: f32) -> u32 {
    let (max_x, max_y) = centers
        .iter()
        .map(|c| c.position(dp))
        .chain(points.iter().map(|p| (p.x as f32, p.y as f32)))
        .fold((0.0f32, 0.0f32), |(mx, my), (x, y)| (mx.max(x), my.max(y)));
    // one extra pixel absorbs rounding in the f32 distances
    max_x.hypot(max_y).ceil() as u32 + 1
}

/// Radius with the most supporting points around `(cx, cy)`, and its count.
///
/// An empty range (`max_radius < min_radius`) gives `(min_radius, 0)`.
fn best_radius(cx: f32, cy: f32, points: &[EdgePoint], min_radius: u32, max_radius: u32) -> (u32, u32) {
    if max_radius < min_radius {
        return (min_radius, 0);
    }

    let mut histogram = vec![0u32; (max_radius - min_radius + 1) as usize];
    let (min_r, max_r) = (min_radius as f32, max_radius as f32);
    let (min_sq, max_sq) = (min_r * min_r, max_r * max_r);

    for p in points {
        let dx = p.x as f32 - cx;
        let dy = p.y as f32 - cy;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq < min_sq || dist_sq > max_sq {
            continue;
        }
        let bin = (dist_sq.sqrt().round() as u32).clamp(min_radius, max_radius) - min_radius;
        histogram[bin as usize] += 1;
    }

    let (bin, votes) = histogram
        .iter()
        .enumerate()
        .fold((0, 0), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
    (min_radius + bin as u32, votes)
}
