//! Pipeline configuration and up-front validation.
//!
//! Both parameter sets are plain structs with public fields and a `Default`
//! tuned for typical 8-bit camera frames. Validation happens once, at the top
//! of a pipeline call, before anything is allocated.

use std::f32::consts::PI;

use crate::error::{HoughError, HoughResult};

/// Largest accepted image width or height. Coordinates are stored as `u16`.
pub const MAX_IMAGE_DIMENSION: u32 = u16::MAX as u32;

/// How the data-parallel stages are scheduled.
///
/// The choice never changes results, only where the work runs. The
/// deduplication stage is sequential under every strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    /// Run on the global rayon pool.
    #[default]
    Global,
    /// Run on a dedicated pool with the given number of threads.
    /// `Threads(1)` is the single-threaded fallback.
    Threads(usize),
}

impl Execution {
    fn validate(self) -> HoughResult<()> {
        match self {
            Execution::Threads(0) => Err(HoughError::invalid(
                "execution",
                "a dedicated pool needs at least one thread",
            )),
            _ => Ok(()),
        }
    }

    /// Runs `op` under this strategy.
    pub(crate) fn install<R, F>(self, op: F) -> HoughResult<R>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match self {
            Execution::Global => Ok(op()),
            Execution::Threads(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                Ok(pool.install(op))
            }
        }
    }
}

/// Parameters of the line detector.
#[derive(Debug, Clone, PartialEq)]
pub struct LineParams {
    /// Distance resolution of the accumulator, in pixels.
    pub rho_step: f32,
    /// Angle resolution of the accumulator, in radians.
    pub theta_step: f32,
    /// A cell must collect strictly more votes than this to be reported.
    pub threshold: u32,
    /// Order results by vote count, highest first.
    pub do_sort: bool,
    /// Upper bound on the number of reported lines.
    pub max_lines: usize,
    pub execution: Execution,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            rho_step: 1.0,
            theta_step: PI / 180.0,
            threshold: 100,
            do_sort: true,
            max_lines: 4096,
            execution: Execution::Global,
        }
    }
}

impl LineParams {
    /// Checks the parameters against a `width` x `height` edge mask.
    pub fn validate(&self, width: u32, height: u32) -> HoughResult<()> {
        check_dimensions(width, height)?;
        check_positive("rho_step", self.rho_step)?;
        check_positive("theta_step", self.theta_step)?;
        if self.max_lines == 0 {
            return Err(HoughError::invalid("max_lines", "must be at least 1"));
        }
        self.execution.validate()
    }
}

/// Parameters of the gradient-based circle detector.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleParams {
    /// Inverse ratio of the center accumulator resolution to the image
    /// resolution. `2.0` gives an accumulator of half the image size.
    pub dp: f32,
    /// Minimum distance, in pixels, between reported centers.
    /// Values `<= 1` disable center suppression.
    pub min_dist: f32,
    /// High Canny threshold. The low one is derived, see
    /// [`CircleParams::canny_low_threshold`].
    pub canny_threshold: u32,
    /// Vote threshold shared by the center and radius stages.
    pub votes_threshold: u32,
    pub min_radius: u32,
    pub max_radius: u32,
    /// Upper bound on the number of reported circles.
    pub max_circles: usize,
    pub execution: Execution,
}

impl Default for CircleParams {
    fn default() -> Self {
        Self {
            dp: 1.0,
            min_dist: 20.0,
            canny_threshold: 100,
            votes_threshold: 30,
            min_radius: 5,
            max_radius: 100,
            max_circles: 4096,
            execution: Execution::Global,
        }
    }
}

impl CircleParams {
    /// Low hysteresis threshold handed to the edge detector.
    pub fn canny_low_threshold(&self) -> u32 {
        (self.canny_threshold / 2).max(1)
    }

    /// Reciprocal of `dp`: scale from image to accumulator coordinates.
    pub fn idp(&self) -> f32 {
        1.0 / self.dp
    }

    /// Checks the parameters against a `width` x `height` image.
    pub fn validate(&self, width: u32, height: u32) -> HoughResult<()> {
        check_dimensions(width, height)?;
        check_positive("dp", self.dp)?;
        if self.min_dist.is_nan() {
            return Err(HoughError::invalid("min_dist", "must not be NaN"));
        }
        if self.min_radius == 0 {
            return Err(HoughError::invalid("min_radius", "must be at least 1"));
        }
        if self.max_radius <= self.min_radius {
            return Err(HoughError::invalid(
                "max_radius",
                format!(
                    "must exceed min_radius ({}), got {}",
                    self.min_radius, self.max_radius
                ),
            ));
        }
        if self.canny_threshold == 0 {
            return Err(HoughError::invalid("canny_threshold", "must be at least 1"));
        }
        if self.votes_threshold == 0 {
            return Err(HoughError::invalid("votes_threshold", "must be at least 1"));
        }
        if self.max_circles == 0 {
            return Err(HoughError::invalid("max_circles", "must be at least 1"));
        }
        self.execution.validate()
    }
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> HoughResult<()> {
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(HoughError::ImageTooLarge { width, height });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f32) -> HoughResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(HoughError::invalid(
            name,
            format!("must be a positive finite number, got {value}"),
        ));
    }
    Ok(())
}
