#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Size ---

#[test]
fn size_center_is_half_extent() {
    assert_eq!(Size::new(800.0, 600.0).center(), Point::new(400.0, 300.0));
}

#[test]
fn size_is_empty_when_any_side_non_positive() {
    assert!(Size::new(0.0, 10.0).is_empty());
    assert!(Size::new(10.0, -1.0).is_empty());
    assert!(!Size::new(1.0, 1.0).is_empty());
}

// --- DisplayRect::to_local ---

#[test]
fn to_local_subtracts_origin() {
    let rect = DisplayRect::new(100.0, 50.0, 400.0, 300.0);
    let local = rect.to_local(Point::new(150.0, 80.0));
    assert_eq!(local, Some(Point::new(50.0, 30.0)));
}

#[test]
fn to_local_rejects_points_left_or_above() {
    let rect = DisplayRect::new(100.0, 50.0, 400.0, 300.0);
    assert_eq!(rect.to_local(Point::new(99.0, 80.0)), None);
    assert_eq!(rect.to_local(Point::new(150.0, 49.0)), None);
}

#[test]
fn to_local_rejects_points_past_far_edges() {
    let rect = DisplayRect::new(0.0, 0.0, 400.0, 300.0);
    assert_eq!(rect.to_local(Point::new(400.5, 10.0)), None);
    assert_eq!(rect.to_local(Point::new(10.0, 300.5)), None);
}

#[test]
fn to_local_accepts_far_edges_inclusive() {
    let rect = DisplayRect::new(0.0, 0.0, 400.0, 300.0);
    assert_eq!(rect.to_local(Point::new(400.0, 300.0)), Some(Point::new(400.0, 300.0)));
}

// --- ImageMapping ---

#[test]
fn identity_mapping_is_noop() {
    let mapping = ImageMapping::identity();
    let p = Point::new(12.5, 7.25);
    assert_eq!(mapping.display_to_natural(p), p);
}

#[test]
fn mapping_scales_per_axis() {
    let mapping = ImageMapping::new(Size::new(1600.0, 600.0), Size::new(400.0, 300.0));
    assert_eq!(mapping.scale_x(), 4.0);
    assert_eq!(mapping.scale_y(), 2.0);
    let natural = mapping.display_to_natural(Point::new(100.0, 100.0));
    assert_eq!(natural, Point::new(400.0, 200.0));
}

#[test]
fn mapping_with_empty_rendered_size_is_identity() {
    let mapping = ImageMapping::new(Size::new(800.0, 600.0), Size::new(0.0, 0.0));
    assert_eq!(mapping, ImageMapping::identity());
}

#[test]
fn rendered_center_maps_to_natural_center_exactly() {
    let cases = [
        (Size::new(800.0, 600.0), Size::new(400.0, 300.0)),
        (Size::new(7.0, 13.0), Size::new(3.0, 5.0)),
        (Size::new(1024.0, 768.0), Size::new(333.0, 777.0)),
        (Size::new(4096.0, 2160.0), Size::new(1920.0, 1013.0)),
        (Size::new(1.0, 1.0), Size::new(999.0, 17.0)),
    ];
    for (natural, rendered) in cases {
        let mapping = ImageMapping::new(natural, rendered);
        let mapped = mapping.display_to_natural(rendered.center());
        assert_eq!(mapped, natural.center(), "natural {natural:?} rendered {rendered:?}");
    }
}

#[test]
fn natural_to_display_inverts_display_to_natural() {
    let mapping = ImageMapping::new(Size::new(1920.0, 1080.0), Size::new(640.0, 360.0));
    let display = Point::new(123.0, 45.0);
    let back = mapping.natural_to_display(mapping.display_to_natural(display));
    assert!(point_approx_eq(back, display));
}
