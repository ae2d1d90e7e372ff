//! Stage orchestration for both detectors.
//!
//! A call moves through `validate -> points -> accumulate -> peaks` for lines
//! and `validate -> edges -> points -> centers -> candidates -> dedup -> radii`
//! for circles. Any stage that produces nothing ends the call with an empty
//! result. Stages run back to back; a stage only reads a histogram after the
//! parallel pass that writes it has returned.

use image::GrayImage;

use crate::centers::{CenterAccumulator, CenterCandidate};
use crate::dedup::CenterDeduplicator;
use crate::error::HoughResult;
use crate::gradient::{detect_edges, EdgeMap};
use crate::lines::{LineAccumulator, PolarLine};
use crate::params::{CircleParams, LineParams};
use crate::points::{build_point_list, EdgePoint};
use crate::radius::{accumulate_radii, Circle};

/// Reusable scratch storage for [`hough_lines_with_buffers`].
///
/// Buffers are resized and cleared at the start of every call, so one
/// instance can serve images of different sizes.
#[derive(Debug, Default)]
pub struct LineBuffers {
    points: Vec<EdgePoint>,
    accumulator: LineAccumulator,
}

impl LineBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edge points of the last call.
    pub fn points(&self) -> &[EdgePoint] {
        &self.points
    }

    /// Histogram of the last call.
    pub fn accumulator(&self) -> &LineAccumulator {
        &self.accumulator
    }
}

/// Reusable scratch storage for the circle detector.
#[derive(Debug, Default)]
pub struct CircleBuffers {
    points: Vec<EdgePoint>,
    accumulator: CenterAccumulator,
    candidates: Vec<CenterCandidate>,
    retained: Vec<CenterCandidate>,
}

impl CircleBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edge points of the last call.
    pub fn points(&self) -> &[EdgePoint] {
        &self.points
    }

    /// Center histogram of the last call.
    pub fn accumulator(&self) -> &CenterAccumulator {
        &self.accumulator
    }

    /// Centers above the vote threshold, in deduplication order.
    pub fn candidates(&self) -> &[CenterCandidate] {
        &self.candidates
    }

    /// Centers that survived minimum-distance suppression.
    pub fn retained(&self) -> &[CenterCandidate] {
        &self.retained
    }
}

/// Detects straight lines in a binary edge mask.
///
/// Every non-zero pixel of `mask` is an edge point. Returns up to
/// `params.max_lines` lines; an empty `Vec` means no line cleared the
/// threshold, or the mask is empty.
///
/// # Errors
///
/// Parameter and dimension errors are reported before any allocation, see
/// [`LineParams::validate`].
///
/// # Examples
///
/// ```rust
/// use image::{GrayImage, Luma};
/// use hough_shapes::{hough_lines, LineParams};
///
/// let mut mask = GrayImage::new(64, 64);
/// for y in 0..64 {
///     mask.put_pixel(20, y, Luma([255]));
/// }
///
/// let params = LineParams { threshold: 50, ..LineParams::default() };
/// let lines = hough_lines(&mask, &params).unwrap();
/// assert_eq!(lines.len(), 1);
/// assert!((lines[0].rho - 20.0).abs() < 1.0);
/// ```
pub fn hough_lines(mask: &GrayImage, params: &LineParams) -> HoughResult<Vec<PolarLine>> {
    hough_lines_with_buffers(mask, params, &mut LineBuffers::new())
}

/// [`hough_lines`] with caller-managed scratch buffers.
pub fn hough_lines_with_buffers(
    mask: &GrayImage,
    params: &LineParams,
    buffers: &mut LineBuffers,
) -> HoughResult<Vec<PolarLine>> {
    let (width, height) = mask.dimensions();
    params.validate(width, height)?;
    LineAccumulator::dimensions(width, height, params.rho_step, params.theta_step)?;

    params
        .execution
        .install(|| detect_lines(mask, params, buffers))?
}

fn detect_lines(
    mask: &GrayImage,
    params: &LineParams,
    buffers: &mut LineBuffers,
) -> HoughResult<Vec<PolarLine>> {
    let (width, height) = mask.dimensions();

    // an empty mask still leaves a zeroed histogram behind
    buffers
        .accumulator
        .reset(width, height, params.rho_step, params.theta_step)?;
    debug!(
        "line accumulator: {} angles x {} distances",
        buffers.accumulator.numangle(),
        buffers.accumulator.numrho()
    );

    let count = build_point_list(mask, &mut buffers.points);
    debug!("line points: {count}");
    if count == 0 {
        debug!("empty edge mask, no lines");
        return Ok(Vec::new());
    }

    let accumulator = &mut buffers.accumulator;
    accumulator.accumulate(&buffers.points);

    let lines = accumulator.peaks(params.threshold, params.max_lines, params.do_sort);
    debug!("lines found: {}", lines.len());
    Ok(lines)
}

/// Detects circles in a grayscale image.
///
/// Edges and gradients come from [`detect_edges`] with hysteresis thresholds
/// `params.canny_low_threshold()` and `params.canny_threshold`. See
/// [`hough_circles_in_edges`] for the voting stages.
///
/// # Examples
///
/// ```rust,no_run
/// use image::open;
/// use hough_shapes::{hough_circles, CircleParams};
///
/// let image = open("coins.png").unwrap().to_luma8();
/// let params = CircleParams { min_radius: 10, max_radius: 40, ..CircleParams::default() };
/// for circle in hough_circles(&image, &params).unwrap() {
///     println!("({:.1}, {:.1}) r = {}", circle.x, circle.y, circle.radius);
/// }
/// ```
pub fn hough_circles(image: &GrayImage, params: &CircleParams) -> HoughResult<Vec<Circle>> {
    hough_circles_with_buffers(image, params, &mut CircleBuffers::new())
}

/// [`hough_circles`] with caller-managed scratch buffers.
pub fn hough_circles_with_buffers(
    image: &GrayImage,
    params: &CircleParams,
    buffers: &mut CircleBuffers,
) -> HoughResult<Vec<Circle>> {
    let (width, height) = image.dimensions();
    params.validate(width, height)?;
    CenterAccumulator::dimensions(width, height, params.dp)?;

    params.execution.install(|| {
        let edge_map = detect_edges(
            image,
            params.canny_low_threshold() as f32,
            params.canny_threshold as f32,
        );
        debug!("edge map ready");
        detect_circles(&edge_map, params, buffers)
    })?
}

/// Detects circles from a precomputed edge map.
///
/// Edge points vote for centers along their gradient line, centers with more
/// than `params.votes_threshold` votes are suppressed to at least
/// `params.min_dist` apart (strongest first), and each survivor gets the
/// radius supported by the most edge points.
pub fn hough_circles_in_edges(edge_map: &EdgeMap, params: &CircleParams) -> HoughResult<Vec<Circle>> {
    hough_circles_in_edges_with_buffers(edge_map, params, &mut CircleBuffers::new())
}

/// [`hough_circles_in_edges`] with caller-managed scratch buffers.
pub fn hough_circles_in_edges_with_buffers(
    edge_map: &EdgeMap,
    params: &CircleParams,
    buffers: &mut CircleBuffers,
) -> HoughResult<Vec<Circle>> {
    let (width, height) = edge_map.dimensions();
    params.validate(width, height)?;
    CenterAccumulator::dimensions(width, height, params.dp)?;

    params
        .execution
        .install(|| detect_circles(edge_map, params, buffers))?
}

fn detect_circles(
    edge_map: &EdgeMap,
    params: &CircleParams,
    buffers: &mut CircleBuffers,
) -> HoughResult<Vec<Circle>> {
    let (width, height) = edge_map.dimensions();

    buffers.accumulator.reset(width, height, params.dp)?;
    buffers.candidates.clear();
    buffers.retained.clear();

    let count = build_point_list(edge_map.edges(), &mut buffers.points);
    debug!("circle edge points: {count}");
    if count == 0 {
        debug!("empty edge mask, no circles");
        return Ok(Vec::new());
    }

    let accumulator = &mut buffers.accumulator;
    accumulator.accumulate(
        &buffers.points,
        edge_map,
        params.min_radius,
        params.max_radius,
        params.idp(),
    );
    debug!("center accumulator: {:?} cells", accumulator.grid_size());

    let candidates = accumulator.candidates(params.votes_threshold, &mut buffers.candidates);
    debug!("center candidates: {candidates}");
    if candidates == 0 {
        debug!("no center above threshold, no circles");
        return Ok(Vec::new());
    }

    CenterDeduplicator::new(params.min_dist).deduplicate(
        &buffers.candidates,
        params.dp,
        &mut buffers.retained,
    );
    debug!("centers after min_dist suppression: {}", buffers.retained.len());

    let circles = accumulate_radii(&buffers.retained, &buffers.points, params);
    debug!("circles found: {}", circles.len());
    Ok(circles)
}
