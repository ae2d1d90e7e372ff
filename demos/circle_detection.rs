use std::time::Instant;

use env_logger::Builder;
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;
use imageproc::filter::gaussian_blur_f32;
use log::info;
use hough_shapes::{hough_circles_with_buffers, visualize_circles, CircleBuffers, CircleParams};

fn main() {
    Builder::from_default_env().format_timestamp_nanos().init();

    // Synthetic "coins" on a mid-gray background
    let mut img = GrayImage::from_pixel(640, 480, Luma([90u8]));
    let coins = [((150, 140), 60), ((380, 120), 45), ((300, 330), 80), ((540, 360), 35)];
    for &(center, radius) in &coins {
        draw_filled_circle_mut(&mut img, center, radius, Luma([220u8]));
    }
    let img = gaussian_blur_f32(&img, 1.5);
    info!("Loading image: {}x{}", img.width(), img.height());

    let params = CircleParams {
        dp: 1.0,
        min_dist: 40.0,
        canny_threshold: 100,
        votes_threshold: 40,
        min_radius: 20,
        max_radius: 100,
        max_circles: 10,
        ..CircleParams::default()
    };

    let mut buffers = CircleBuffers::new();
    let instance = Instant::now();
    let circles = hough_circles_with_buffers(&img, &params, &mut buffers).unwrap();
    let elapsed = instance.elapsed();
    info!("Detection time: {elapsed:?}");
    info!(
        "{} edge points, {} center candidates, {} after min-distance suppression",
        buffers.points().len(),
        buffers.candidates().len(),
        buffers.retained().len()
    );

    for circle in &circles {
        info!(
            "center = ({:.1}, {:.1}), radius = {}",
            circle.x, circle.y, circle.radius
        );
    }
    info!("Detected {} circles", circles.len());

    std::fs::create_dir_all("test_image").unwrap();
    visualize_circles(&img, &circles)
        .save("test_image/hough_circles.png")
        .unwrap();
}
