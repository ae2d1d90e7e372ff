//! Overlay rendering of detection results.

use image::{buffer::ConvertBuffer, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};

use crate::lines::PolarLine;
use crate::radius::Circle;

const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Draws detected lines in red over the source image.
///
/// Each line is drawn across the whole image; segments outside the canvas
/// are clipped.
///
/// # Examples
///
/// ```rust,no_run
/// use image::open;
/// use hough_shapes::{hough_lines, visualize_lines, LineParams};
///
/// let edges = open("edges.png").unwrap().to_luma8();
/// let lines = hough_lines(&edges, &LineParams::default()).unwrap();
/// visualize_lines(&edges, &lines).save("lines.png").unwrap();
/// ```
pub fn visualize_lines(image: &GrayImage, lines: &[PolarLine]) -> RgbImage {
    let mut canvas: RgbImage = image.convert();
    let reach = (canvas.width() + canvas.height()) as f32;

    for line in lines {
        let (sin, cos) = line.theta.sin_cos();
        // foot of the normal, then walk along the line direction (-sin, cos)
        let (x0, y0) = (line.rho * cos, line.rho * sin);
        // endpoints are truncated when rasterized, round them first
        let start = ((x0 - reach * sin).round(), (y0 + reach * cos).round());
        let end = ((x0 + reach * sin).round(), (y0 - reach * cos).round());
        draw_line_segment_mut(&mut canvas, start, end, RED);
    }

    canvas
}

/// Draws detected circles in red over the source image.
pub fn visualize_circles(image: &GrayImage, circles: &[Circle]) -> RgbImage {
    let mut canvas: RgbImage = image.convert();

    for circle in circles {
        let center = (circle.x.round() as i32, circle.y.round() as i32);
        draw_hollow_circle_mut(&mut canvas, center, circle.radius.round() as i32, RED);
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_visualize_lines_draws_horizontal_line() {
        let image = GrayImage::from_fn(20, 10, |_, _| Luma([40]));
        let line = PolarLine {
            rho: 4.0,
            theta: FRAC_PI_2,
            votes: 1,
        };
        let canvas = visualize_lines(&image, &[line]);

        assert_eq!(canvas.dimensions(), (20, 10));
        for x in 0..20 {
            assert_eq!(*canvas.get_pixel(x, 4), RED, "x = {x}");
        }
        assert_eq!(*canvas.get_pixel(3, 1), Rgb([40, 40, 40]));
    }

    #[test]
    fn test_visualize_circles() {
        let image = GrayImage::new(40, 40);
        let circle = Circle {
            x: 20.0,
            y: 20.0,
            radius: 8.0,
        };
        let canvas = visualize_circles(&image, &[circle]);

        assert_eq!(*canvas.get_pixel(28, 20), RED);
        assert_eq!(*canvas.get_pixel(20, 12), RED);
        assert_eq!(*canvas.get_pixel(20, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_circle_partly_outside_canvas() {
        let image = GrayImage::new(10, 10);
        let circle = Circle {
            x: 0.0,
            y: 0.0,
            radius: 5.0,
        };
        let canvas = visualize_circles(&image, &[circle]);
        assert_eq!(*canvas.get_pixel(5, 0), RED);
    }
}
