use std::time::Instant;

use env_logger::Builder;
use image::{GrayImage, Luma};
use imageproc::drawing::draw_line_segment_mut;
use log::info;
use hough_shapes::{hough_lines, visualize_lines, LineParams};

fn main() {
    Builder::from_default_env().format_timestamp_nanos().init();

    // Synthetic edge mask: a frame, a diagonal and some scattered noise
    let (width, height) = (640u32, 480u32);
    let mut mask = GrayImage::new(width, height);
    let white = Luma([255u8]);
    draw_line_segment_mut(&mut mask, (40.0, 40.0), (600.0, 40.0), white);
    draw_line_segment_mut(&mut mask, (40.0, 440.0), (600.0, 440.0), white);
    draw_line_segment_mut(&mut mask, (40.0, 40.0), (40.0, 440.0), white);
    draw_line_segment_mut(&mut mask, (600.0, 40.0), (600.0, 440.0), white);
    draw_line_segment_mut(&mut mask, (100.0, 420.0), (520.0, 60.0), white);
    for i in 0..400u32 {
        mask.put_pixel((i * 7919) % width, (i * 104_729) % height, white);
    }
    info!("Edge mask: {width}x{height}");

    let params = LineParams {
        threshold: 150,
        max_lines: 16,
        ..LineParams::default()
    };

    let instance = Instant::now();
    let lines = hough_lines(&mask, &params).unwrap();
    let elapsed = instance.elapsed();
    info!("Detection time: {elapsed:?}");

    for line in &lines {
        info!(
            "rho = {:7.1}, theta = {:5.1} deg, votes = {}",
            line.rho,
            line.theta.to_degrees(),
            line.votes
        );
    }
    info!("Detected {} lines", lines.len());

    std::fs::create_dir_all("test_image").unwrap();
    visualize_lines(&mask, &lines)
        .save("test_image/hough_lines.png")
        .unwrap();
}
