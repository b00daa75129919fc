use proptest::prelude::*;

use webpress_core::error::WebpressError;
use webpress_core::geometry::{gcd, simplify, CoordinateMapper, ImageGeometry, PixelPoint, Point};

fn mapper(nw: u32, nh: u32, dw: u32, dh: u32) -> CoordinateMapper {
    CoordinateMapper::new(ImageGeometry {
        natural_width: nw,
        natural_height: nh,
        display_width: dw,
        display_height: dh,
    })
}

// ---------------------------------------------------------------------------
// ImageGeometry::fit
// ---------------------------------------------------------------------------

#[test]
fn test_fit_landscape_into_box() {
    let g = ImageGeometry::fit(1920, 1080, 800, 600).unwrap();
    assert_eq!((g.display_width, g.display_height), (800, 450));
    assert_eq!((g.natural_width, g.natural_height), (1920, 1080));
}

#[test]
fn test_fit_portrait_limited_by_height() {
    let g = ImageGeometry::fit(1000, 3000, 800, 600).unwrap();
    assert_eq!((g.display_width, g.display_height), (200, 600));
}

#[test]
fn test_fit_small_image_not_upscaled() {
    let g = ImageGeometry::fit(300, 200, 800, 600).unwrap();
    assert_eq!((g.display_width, g.display_height), (300, 200));
}

#[test]
fn test_fit_extreme_aspect_keeps_one_pixel() {
    let g = ImageGeometry::fit(1, 10_000, 800, 600).unwrap();
    assert_eq!(g.display_width, 1);
    assert_eq!(g.display_height, 600);
    assert!(g.is_loaded());
}

#[test]
fn test_fit_rejects_zero_dimension() {
    let err = ImageGeometry::fit(0, 100, 800, 600).unwrap_err();
    assert!(matches!(
        err,
        WebpressError::InvalidDimensions { width: 0, height: 100 }
    ));
}

#[test]
fn test_unscaled_geometry_maps_identically() {
    let g = ImageGeometry::unscaled(640, 480).unwrap();
    let m = CoordinateMapper::new(g);
    assert_eq!(m.to_natural(Point::new(123.0, 456.0)), PixelPoint::new(123, 456));
    assert_eq!(m.to_display(Point::new(639.0, 0.0)), PixelPoint::new(639, 0));
}

#[test]
fn test_default_geometry_is_not_loaded() {
    assert!(!ImageGeometry::default().is_loaded());
}

// ---------------------------------------------------------------------------
// CoordinateMapper
// ---------------------------------------------------------------------------

#[test]
fn test_to_natural_scales_up() {
    let m = mapper(1920, 1080, 800, 450);
    assert_eq!(m.to_natural(Point::new(400.0, 225.0)), PixelPoint::new(960, 540));
    assert_eq!(m.to_natural(Point::new(800.0, 450.0)), PixelPoint::new(1920, 1080));
}

#[test]
fn test_to_display_scales_down() {
    let m = mapper(1920, 1080, 800, 450);
    assert_eq!(m.to_display(Point::new(1920.0, 1080.0)), PixelPoint::new(800, 450));
    assert_eq!(m.to_display(Point::new(960.0, 540.0)), PixelPoint::new(400, 225));
}

#[test]
fn test_axes_scale_independently() {
    let m = mapper(1000, 1000, 500, 250);
    assert_eq!(m.to_natural(Point::new(100.0, 100.0)), PixelPoint::new(200, 400));
}

#[test]
fn test_out_of_range_input_is_clamped() {
    let m = mapper(1920, 1080, 800, 450);
    assert_eq!(m.to_natural(Point::new(-5.0, 1000.0)), PixelPoint::new(0, 1080));
    assert_eq!(m.to_display(Point::new(5000.0, -1.0)), PixelPoint::new(800, 0));
}

#[test]
fn test_non_finite_input_maps_to_origin() {
    let m = mapper(1920, 1080, 800, 450);
    assert_eq!(m.to_natural(Point::new(f64::NAN, f64::INFINITY)), PixelPoint::new(0, 0));
}

#[test]
fn test_fractional_input_rounds_to_nearest() {
    let m = mapper(300, 300, 100, 100);
    assert_eq!(m.to_natural(Point::new(10.4, 10.6)), PixelPoint::new(31, 32));
}

#[test]
fn test_unloaded_geometry_maps_to_origin() {
    let m = CoordinateMapper::default();
    assert_eq!(m.to_natural(Point::new(50.0, 50.0)), PixelPoint::new(0, 0));
    assert_eq!(m.to_display(Point::new(50.0, 50.0)), PixelPoint::new(0, 0));

    let half_loaded = mapper(100, 100, 0, 50);
    assert_eq!(half_loaded.to_natural(Point::new(10.0, 10.0)), PixelPoint::new(0, 0));
}

// ---------------------------------------------------------------------------
// Ratio reduction
// ---------------------------------------------------------------------------

#[test]
fn test_gcd() {
    assert_eq!(gcd(1920, 1080), 120);
    assert_eq!(gcd(17, 5), 1);
    assert_eq!(gcd(0, 9), 9);
    assert_eq!(gcd(9, 0), 9);
}

#[test]
fn test_simplify_common_ratios() {
    assert_eq!(simplify(1920.0, 1080.0), (16, 9));
    assert_eq!(simplify(1024.0, 768.0), (4, 3));
    assert_eq!(simplify(100.0, 100.0), (1, 1));
    assert_eq!(simplify(1281.0, 719.0), (1281, 719));
}

#[test]
fn test_simplify_degenerate_inputs_give_square() {
    assert_eq!(simplify(0.0, 500.0), (1, 1));
    assert_eq!(simplify(500.0, -3.0), (1, 1));
    assert_eq!(simplify(0.4, 10.0), (1, 1));
    assert_eq!(simplify(f64::NAN, 10.0), (1, 1));
}

#[test]
fn test_simplify_rounds_fractional_sizes() {
    assert_eq!(simplify(1919.6, 1080.2), (16, 9));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn fitted_geometry() -> impl Strategy<Value = ImageGeometry> {
    (1u32..=5000, 1u32..=5000, 50u32..=1200, 50u32..=1200)
        .prop_map(|(nw, nh, mw, mh)| ImageGeometry::fit(nw, nh, mw, mh).unwrap())
}

proptest! {
    #[test]
    fn prop_display_round_trip_within_one_pixel(
        g in fitted_geometry(),
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
    ) {
        let m = CoordinateMapper::new(g);
        let p = Point::new(fx * g.display_width as f64, fy * g.display_height as f64);
        let back = m.to_display(m.to_natural(p).into());
        prop_assert!((back.x as f64 - p.x).abs() <= 1.0, "x: {} -> {}", p.x, back.x);
        prop_assert!((back.y as f64 - p.y).abs() <= 1.0, "y: {} -> {}", p.y, back.y);
    }

    #[test]
    fn prop_display_round_trip_is_idempotent(
        g in fitted_geometry(),
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
    ) {
        let m = CoordinateMapper::new(g);
        let p = Point::new(fx * g.display_width as f64, fy * g.display_height as f64);
        let once = m.to_display(m.to_natural(p).into());
        let twice = m.to_display(m.to_natural(once.into()).into());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_natural_points_stay_in_image(
        g in fitted_geometry(),
        x in -100.0f64..2000.0,
        y in -100.0f64..2000.0,
    ) {
        let n = CoordinateMapper::new(g).to_natural(Point::new(x, y));
        prop_assert!(n.x <= g.natural_width);
        prop_assert!(n.y <= g.natural_height);
    }

    #[test]
    fn prop_fit_stays_inside_box(
        nw in 1u32..=10_000,
        nh in 1u32..=10_000,
        mw in 1u32..=2000,
        mh in 1u32..=2000,
    ) {
        let g = ImageGeometry::fit(nw, nh, mw, mh).unwrap();
        prop_assert!(g.display_width >= 1 && g.display_width <= nw);
        prop_assert!(g.display_height >= 1 && g.display_height <= nh);
        prop_assert!(g.display_width <= mw.max(1) || g.display_width == 1);
        prop_assert!(g.display_height <= mh.max(1) || g.display_height == 1);
    }

    #[test]
    fn prop_simplify_is_reduced(w in 1u32..=10_000, h in 1u32..=10_000) {
        let (rw, rh) = simplify(w as f64, h as f64);
        prop_assert_eq!(gcd(rw as u64, rh as u64), 1);
        prop_assert_eq!(rw as u64 * h as u64, rh as u64 * w as u64);
    }
}
