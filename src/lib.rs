//! # Hough Shape Detection Library
//!
//! This crate detects straight lines and circles in edge images with the Hough
//! transform. Every edge point votes for the shape parameters it is consistent
//! with, the votes are accumulated in a discretized parameter histogram, and
//! the histogram peaks are reported ranked by evidence. All voting stages run
//! in parallel using rayon.
//!
//! ## Features
//!
//! - Parallel edge point extraction from a binary mask
//! - Line voting over (distance, angle) space with strict local-maximum peaks
//! - Gradient-guided circle center voting
//! - Minimum-distance suppression of circle centers
//! - Per-center radius voting with ranked, capped output
//! - Reusable scratch buffers for repeated detection
//! - Result visualization utilities
//! - Optional debug logging (enable with `logger` feature)
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use image::open;
//! use hough_shapes::{hough_lines, visualize_lines, LineParams};
//!
//! // The line detector works on a binary edge mask
//! let edges = open("edges.png").unwrap().to_luma8();
//! let params = LineParams { threshold: 80, max_lines: 20, ..LineParams::default() };
//! let lines = hough_lines(&edges, &params).unwrap();
//!
//! for line in &lines {
//!     println!("rho = {:.1}, theta = {:.3}, votes = {}", line.rho, line.theta, line.votes);
//! }
//! visualize_lines(&edges, &lines).save("lines.png").unwrap();
//! ```
//!
//! Circles are detected on the grayscale image itself; edges and gradients are
//! computed internally:
//!
//! ```rust,no_run
//! use image::open;
//! use hough_shapes::{hough_circles, CircleParams};
//!
//! let image = open("coins.png").unwrap().to_luma8();
//! let params = CircleParams {
//!     dp: 1.0,
//!     min_dist: 30.0,
//!     canny_threshold: 120,
//!     votes_threshold: 40,
//!     min_radius: 15,
//!     max_radius: 60,
//!     ..CircleParams::default()
//! };
//! let circles = hough_circles(&image, &params).unwrap();
//! println!("Found {} circles", circles.len());
//! ```
//!
//! ## Optional Features
//!
//! ### Logger Feature
//!
//! Enable debug logging to monitor the detection pipeline:
//!
//! ```toml
//! [dependencies]
//! hough-shapes = { version = "0.1.0", features = ["logger"] }
//! log = "0.4"
//! env_logger = "0.11"
//! ```
//!
//! ```rust,no_run
//! use image::open;
//! use hough_shapes::{hough_lines, LineParams};
//!
//! // Initialize logger to see debug output
//! env_logger::init();
//!
//! let edges = open("edges.png").unwrap().to_luma8();
//! let lines = hough_lines(&edges, &LineParams::default()).unwrap();
//! // With logger feature, you'll see debug messages like:
//! // DEBUG hough_shapes::pipeline: line points: 1532
//! // DEBUG hough_shapes::pipeline: line accumulator: 180 angles x 2241 distances
//! // DEBUG hough_shapes::pipeline: lines found: 4
//! ```
//!
//! ## Reusing Buffers
//!
//! ```rust,no_run
//! use image::open;
//! use hough_shapes::{hough_lines_with_buffers, LineBuffers, LineParams};
//!
//! let params = LineParams::default();
//! let mut buffers = LineBuffers::new();
//! for path in ["frame0.png", "frame1.png"] {
//!     let edges = open(path).unwrap().to_luma8();
//!     let lines = hough_lines_with_buffers(&edges, &params, &mut buffers).unwrap();
//!     println!("{path}: {} lines", lines.len());
//! }
//! ```

// Conditional logging macros
#[cfg(feature = "logger")]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(feature = "logger"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

mod centers;
mod dedup;
mod error;
mod gradient;
mod lines;
mod params;
mod pipeline;
mod points;
mod radius;
mod visualize;

pub use centers::{CenterAccumulator, CenterCandidate};
pub use dedup::CenterDeduplicator;
pub use error::{HoughError, HoughResult};
pub use gradient::{detect_edges, sobel_gradients, EdgeMap, GradientImage};
pub use lines::{LineAccumulator, PolarLine};
pub use params::{CircleParams, Execution, LineParams, MAX_IMAGE_DIMENSION};
pub use pipeline::{
    hough_circles, hough_circles_in_edges, hough_circles_in_edges_with_buffers,
    hough_circles_with_buffers, hough_lines, hough_lines_with_buffers, CircleBuffers, LineBuffers,
};
pub use points::{build_point_list, EdgePoint};
pub use radius::{accumulate_radii, Circle};
pub use visualize::{visualize_circles, visualize_lines};
