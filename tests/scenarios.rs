use std::f32::consts::PI;

use hough_shapes::{
    build_point_list, hough_circles, hough_circles_in_edges, hough_circles_in_edges_with_buffers,
    hough_lines, hough_lines_with_buffers, CenterAccumulator, CenterDeduplicator, Circle,
    CircleBuffers, CircleParams, EdgeMap, EdgePoint, Execution, GradientImage, LineAccumulator,
    LineBuffers, LineParams,
};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;
use imageproc::filter::gaussian_blur_f32;
use proptest::prelude::*;

fn mask_from_points(width: u32, height: u32, points: &[(u32, u32)]) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    for &(x, y) in points {
        mask.put_pixel(x, y, Luma([255]));
    }
    mask
}

/// Edge map of a rasterized circle with radial gradients.
fn ring_edge_map(width: u32, height: u32, cx: f64, cy: f64, radius: f64) -> EdgeMap {
    let mut edges = GrayImage::new(width, height);
    let mut dx = GradientImage::new(width, height);
    let mut dy = GradientImage::new(width, height);

    for step in 0..720 {
        let angle = step as f64 * std::f64::consts::PI / 360.0;
        let x = (cx + radius * angle.cos()).round();
        let y = (cy + radius * angle.sin()).round();
        let (px, py) = (x as u32, y as u32);
        edges.put_pixel(px, py, Luma([255]));
        dx.put_pixel(px, py, Luma([((x - cx) * 10.0) as i16]));
        dy.put_pixel(px, py, Luma([((y - cy) * 10.0) as i16]));
    }

    EdgeMap::new(edges, dx, dy).unwrap()
}

/// Ten vertical segments of distinct length: 52, 54, ..., 70 pixels at
/// x = 15, 30, ..., 150.
fn vertical_segments() -> GrayImage {
    let points: Vec<(u32, u32)> = (0..10u32)
        .flat_map(|k| {
            let x = 15 * (k + 1);
            (0..52 + 2 * k).map(move |y| (x, y))
        })
        .collect();
    mask_from_points(200, 100, &points)
}

fn permuted_points() -> impl Strategy<Value = (Vec<EdgePoint>, Vec<EdgePoint>)> {
    prop::collection::vec((0u16..64, 0u16..48), 0..200).prop_flat_map(|coords| {
        let points: Vec<EdgePoint> = coords
            .into_iter()
            .map(|(x, y)| EdgePoint::new(x, y))
            .collect();
        (Just(points.clone()), Just(points).prop_shuffle())
    })
}

#[test]
fn test_single_diagonal_line() {
    let points: Vec<(u32, u32)> = (0..100).map(|i| (i, i)).collect();
    let mask = mask_from_points(100, 100, &points);
    let params = LineParams {
        threshold: 99,
        ..LineParams::default()
    };

    let lines = hough_lines(&mask, &params).unwrap();

    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].rho.abs() < params.rho_step);
    assert!((lines[0].theta - 3.0 * PI / 4.0).abs() <= params.theta_step);
    assert_eq!(lines[0].votes, 100);
}

#[test]
fn test_max_lines_truncation() {
    let mask = vertical_segments();
    let params = LineParams {
        threshold: 50,
        ..LineParams::default()
    };

    let all = hough_lines(&mask, &params).unwrap();
    assert_eq!(all.len(), 10);

    let top = hough_lines(
        &mask,
        &LineParams {
            max_lines: 3,
            ..params.clone()
        },
    )
    .unwrap();
    let summary: Vec<(f32, u32)> = top.iter().map(|l| (l.rho, l.votes)).collect();
    assert_eq!(summary, vec![(150.0, 70), (135.0, 68), (120.0, 66)]);
    assert!(top.iter().all(|l| l.theta == 0.0));

    // unsorted output keeps accumulator order, distance ascending within a row
    let first = hough_lines(
        &mask,
        &LineParams {
            max_lines: 3,
            do_sort: false,
            ..params
        },
    )
    .unwrap();
    let rhos: Vec<f32> = first.iter().map(|l| l.rho).collect();
    assert_eq!(rhos, vec![15.0, 30.0, 45.0]);
}

#[test]
fn test_line_buffers_are_reusable() {
    let mut buffers = LineBuffers::new();
    let params = LineParams {
        threshold: 50,
        ..LineParams::default()
    };

    let segments = vertical_segments();
    let first = hough_lines_with_buffers(&segments, &params, &mut buffers).unwrap();
    let blank = hough_lines_with_buffers(&GrayImage::new(30, 30), &params, &mut buffers).unwrap();
    let again = hough_lines_with_buffers(&segments, &params, &mut buffers).unwrap();

    assert!(blank.is_empty());
    assert_eq!(first, again);
    assert_eq!(buffers.points().len(), (52..=70).step_by(2).sum::<usize>());
}

#[test]
fn test_single_circle_from_edge_map() {
    let edge_map = ring_edge_map(100, 100, 50.0, 50.0, 20.0);
    let params = CircleParams {
        min_dist: 10.0,
        votes_threshold: 40,
        min_radius: 15,
        max_radius: 25,
        max_circles: 10,
        ..CircleParams::default()
    };

    let circles = hough_circles_in_edges(&edge_map, &params).unwrap();

    assert_eq!(
        circles,
        vec![Circle {
            x: 50.0,
            y: 50.0,
            radius: 20.0
        }]
    );
}

#[test]
fn test_single_circle_end_to_end() {
    let mut disk = GrayImage::new(100, 100);
    draw_filled_circle_mut(&mut disk, (50, 50), 20, Luma([255]));
    let image = gaussian_blur_f32(&disk, 1.5);

    let params = CircleParams {
        min_dist: 40.0,
        canny_threshold: 100,
        votes_threshold: 10,
        min_radius: 15,
        max_radius: 25,
        max_circles: 1,
        ..CircleParams::default()
    };
    let circles = hough_circles(&image, &params).unwrap();

    assert_eq!(circles.len(), 1);
    let circle = circles[0];
    assert!((circle.x - 50.0).abs() <= 2.0, "{circle:?}");
    assert!((circle.y - 50.0).abs() <= 2.0, "{circle:?}");
    assert!((circle.radius - 20.0).abs() <= 2.0, "{circle:?}");
}

#[test]
fn test_execution_strategies_agree() {
    let edge_map = ring_edge_map(120, 90, 60.0, 45.0, 25.0);
    let params = CircleParams {
        min_dist: 5.0,
        votes_threshold: 20,
        min_radius: 10,
        max_radius: 30,
        ..CircleParams::default()
    };

    let mut global = CircleBuffers::new();
    let mut single = CircleBuffers::new();
    let a = hough_circles_in_edges_with_buffers(&edge_map, &params, &mut global).unwrap();
    let b = hough_circles_in_edges_with_buffers(
        &edge_map,
        &CircleParams {
            execution: Execution::Threads(1),
            ..params
        },
        &mut single,
    )
    .unwrap();

    assert_eq!(a, b);
    assert_eq!(global.candidates(), single.candidates());
    assert_eq!(global.retained(), single.retained());
    assert_eq!(global.accumulator().to_vec(), single.accumulator().to_vec());
}

#[test]
fn test_empty_inputs_give_empty_output() {
    let params = LineParams::default();
    let mut buffers = LineBuffers::new();
    for _ in 0..2 {
        let lines = hough_lines_with_buffers(&GrayImage::new(64, 64), &params, &mut buffers).unwrap();
        assert!(lines.is_empty());
        assert!(buffers.points().is_empty());
    }

    let flat = GrayImage::from_pixel(64, 64, Luma([128]));
    assert!(hough_circles(&flat, &CircleParams::default()).unwrap().is_empty());

    let edge_map = EdgeMap::new(
        GrayImage::new(64, 64),
        GradientImage::new(64, 64),
        GradientImage::new(64, 64),
    )
    .unwrap();
    assert!(hough_circles_in_edges(&edge_map, &CircleParams::default())
        .unwrap()
        .is_empty());
}

#[test]
fn test_retained_centers_respect_min_dist() {
    let edge_map = ring_edge_map(100, 100, 50.0, 50.0, 20.0);
    let params = CircleParams {
        min_dist: 6.0,
        votes_threshold: 10,
        min_radius: 10,
        max_radius: 30,
        ..CircleParams::default()
    };
    let mut buffers = CircleBuffers::new();
    hough_circles_in_edges_with_buffers(&edge_map, &params, &mut buffers).unwrap();

    let retained = buffers.retained();
    assert!(!retained.is_empty());
    assert!(retained.len() <= buffers.candidates().len());
    assert_eq!(retained[0], buffers.candidates()[0]);
    for (i, a) in retained.iter().enumerate() {
        for b in &retained[i + 1..] {
            let dx = a.x as f32 - b.x as f32;
            let dy = a.y as f32 - b.y as f32;
            assert!(dx * dx + dy * dy >= 36.0, "{a:?} {b:?}");
        }
    }

    let mut dedup = CenterDeduplicator::new(params.min_dist);
    let mut again = Vec::new();
    dedup.deduplicate(buffers.candidates(), params.dp, &mut again);
    assert_eq!(again, retained);
}

proptest! {
    #[test]
    fn prop_point_count_matches_nonzero_pixels(
        (width, height, pixels) in (1u32..40, 1u32..40).prop_flat_map(|(w, h)| {
            (Just(w), Just(h), prop::collection::vec(0u8..4, (w * h) as usize))
        })
    ) {
        let mask = GrayImage::from_raw(width, height, pixels.clone()).unwrap();
        let mut points = vec![EdgePoint::new(9, 9)];
        let count = build_point_list(&mask, &mut points);

        prop_assert_eq!(count, pixels.iter().filter(|&&v| v != 0).count());
        prop_assert_eq!(points.len(), count);
        for pair in points.windows(2) {
            prop_assert!((pair[0].y, pair[0].x) < (pair[1].y, pair[1].x));
        }
        for p in &points {
            prop_assert!(mask.get_pixel(p.x as u32, p.y as u32)[0] != 0);
        }
    }

    #[test]
    fn prop_line_votes_ignore_point_order((points, shuffled) in permuted_points()) {
        let mut a = LineAccumulator::new();
        let mut b = LineAccumulator::new();
        a.reset(64, 48, 1.0, PI / 90.0).unwrap();
        b.reset(64, 48, 1.0, PI / 90.0).unwrap();
        a.accumulate(&points);
        b.accumulate(&shuffled);

        prop_assert_eq!(a.as_slice(), b.as_slice());
        prop_assert_eq!(a.peaks(2, 100, true), b.peaks(2, 100, true));
    }

    #[test]
    fn prop_center_votes_ignore_point_order(
        (points, shuffled) in permuted_points(),
        dp in prop::sample::select(vec![1.0f32, 1.5, 2.0]),
    ) {
        let edges = GrayImage::new(64, 48);
        let dx = GradientImage::from_fn(64, 48, |x, y| Luma([(x * 7 % 11) as i16 - 5 + (y % 2) as i16]));
        let dy = GradientImage::from_fn(64, 48, |x, y| Luma([(y * 5 % 9) as i16 - 4 + (x % 3) as i16]));
        let edge_map = EdgeMap::new(edges, dx, dy).unwrap();

        let mut a = CenterAccumulator::new();
        let mut b = CenterAccumulator::new();
        a.reset(64, 48, dp).unwrap();
        b.reset(64, 48, dp).unwrap();
        a.accumulate(&points, &edge_map, 3, 20, 1.0 / dp);
        b.accumulate(&shuffled, &edge_map, 3, 20, 1.0 / dp);

        prop_assert_eq!(a.to_vec(), b.to_vec());
    }
}
