#![allow(clippy::float_cmp)]

use super::*;

fn container() -> DisplayRect {
    DisplayRect::new(100.0, 50.0, 400.0, 300.0)
}

/// Painter in edit mode with the brush on, showing an 800×600 image in a
/// 400×300 container (2× scale on both axes).
fn armed_painter() -> MaskPainter {
    let mut painter = MaskPainter::new(container());
    painter.mode_changed(true);
    painter.image_changed(Some(Size::new(800.0, 600.0)));
    assert!(painter.set_brush(true));
    painter
}

// =============================================================
// Gating
// =============================================================

#[test]
fn new_painter_is_inactive_and_unpainted() {
    let painter = MaskPainter::new(container());
    assert!(!painter.is_active());
    assert_eq!(painter.mask_box(), None);
    assert!(painter.overlay().is_blank());
    assert_eq!((painter.overlay().width(), painter.overlay().height()), (400, 300));
}

#[test]
fn brush_cannot_enable_outside_edit_mode() {
    let mut painter = MaskPainter::new(container());
    painter.mode_changed(false);
    assert!(!painter.set_brush(true));
    assert!(!painter.toggle_brush());
}

#[test]
fn pointer_ignored_when_brush_off() {
    let mut painter = MaskPainter::new(container());
    painter.mode_changed(true);
    assert_eq!(painter.pointer_down(Point::new(200.0, 100.0)), PaintOutcome::Ignored);
    assert_eq!(painter.mask_box(), None);
}

#[test]
fn move_without_down_is_ignored() {
    let mut painter = armed_painter();
    assert_eq!(painter.pointer_move(Point::new(200.0, 100.0)), PaintOutcome::Ignored);
    assert_eq!(painter.mask_box(), None);
}

#[test]
fn move_after_up_is_ignored() {
    let mut painter = armed_painter();
    painter.pointer_down(Point::new(200.0, 100.0));
    painter.pointer_up();
    assert_eq!(painter.pointer_move(Point::new(300.0, 200.0)), PaintOutcome::Ignored);
    assert_eq!(
        painter.mask_box(),
        Some(MaskBox { min_x: 200.0, min_y: 100.0, max_x: 200.0, max_y: 100.0 })
    );
}

// =============================================================
// Painting
// =============================================================

#[test]
fn down_maps_client_point_to_natural_pixels() {
    let mut painter = armed_painter();
    let outcome = painter.pointer_down(Point::new(200.0, 100.0));
    assert_eq!(
        outcome,
        PaintOutcome::Painted { display: Point::new(100.0, 50.0), natural: Point::new(200.0, 100.0) }
    );
    assert!(painter.is_painting());
    assert!(!painter.overlay().is_blank());
}

#[test]
fn stroke_grows_bounding_box() {
    let mut painter = armed_painter();
    painter.pointer_down(Point::new(200.0, 100.0));
    painter.pointer_move(Point::new(300.0, 250.0));
    painter.pointer_move(Point::new(150.0, 150.0));
    painter.pointer_up();
    assert_eq!(
        painter.mask_box(),
        Some(MaskBox { min_x: 100.0, min_y: 100.0, max_x: 400.0, max_y: 400.0 })
    );
    assert_eq!(painter.hotspot(), Hotspot::new(250, 250));
}

#[test]
fn out_of_bounds_samples_do_not_touch_the_box() {
    let mut painter = armed_painter();
    assert_eq!(painter.pointer_down(Point::new(10.0, 10.0)), PaintOutcome::OutOfBounds);
    assert_eq!(painter.pointer_move(Point::new(600.0, 100.0)), PaintOutcome::OutOfBounds);
    assert_eq!(painter.mask_box(), None);
    assert!(painter.overlay().is_blank());
    assert!(painter.is_painting());
}

#[test]
fn unknown_natural_size_maps_with_identity() {
    let mut painter = MaskPainter::new(container());
    painter.mode_changed(true);
    painter.set_brush(true);
    let outcome = painter.pointer_down(Point::new(300.0, 200.0));
    assert_eq!(
        outcome,
        PaintOutcome::Painted { display: Point::new(200.0, 150.0), natural: Point::new(200.0, 150.0) }
    );
}

#[test]
fn center_of_display_maps_to_center_of_image() {
    let mut painter = armed_painter();
    let client_center = Point::new(100.0 + 200.0, 50.0 + 150.0);
    painter.pointer_down(client_center);
    assert_eq!(painter.hotspot(), Hotspot::new(400, 300));
}

// =============================================================
// Hotspot fallback
// =============================================================

#[test]
fn hotspot_without_paint_is_image_center() {
    let painter = armed_painter();
    assert_eq!(painter.hotspot(), Hotspot::new(400, 300));
}

#[test]
fn hotspot_without_paint_or_size_uses_fallback() {
    let painter = MaskPainter::new(container());
    assert_eq!(painter.hotspot(), Hotspot::new(256, 256));
}

// =============================================================
// Reset rules
// =============================================================

#[test]
fn image_change_clears_paint_and_bounds() {
    let mut painter = armed_painter();
    painter.pointer_down(Point::new(200.0, 100.0));
    painter.image_changed(Some(Size::new(1024.0, 1024.0)));
    assert_eq!(painter.mask_box(), None);
    assert!(painter.overlay().is_blank());
    assert!(!painter.is_painting());
    assert_eq!(painter.hotspot(), Hotspot::new(512, 512));
}

#[test]
fn leaving_edit_mode_clears_and_disables_brush() {
    let mut painter = armed_painter();
    painter.pointer_down(Point::new(200.0, 100.0));
    painter.mode_changed(false);
    assert_eq!(painter.mask_box(), None);
    assert!(!painter.brush_enabled());
    assert!(painter.overlay().is_blank());
}

#[test]
fn reentering_edit_mode_still_resets() {
    let mut painter = armed_painter();
    painter.pointer_down(Point::new(200.0, 100.0));
    painter.mode_changed(true);
    assert_eq!(painter.mask_box(), None);
    assert!(painter.brush_enabled());
}

#[test]
fn explicit_reset_clears() {
    let mut painter = armed_painter();
    painter.pointer_down(Point::new(200.0, 100.0));
    painter.reset();
    assert_eq!(painter.mask_box(), None);
    assert!(painter.overlay().is_blank());
}

#[test]
fn resize_keeps_bounds_and_reallocates_overlay() {
    let mut painter = armed_painter();
    painter.pointer_down(Point::new(200.0, 100.0));
    painter.pointer_up();
    let before = painter.mask_box();
    painter.resize(DisplayRect::new(0.0, 0.0, 800.0, 600.0));
    assert_eq!(painter.mask_box(), before);
    assert!(painter.overlay().is_blank());
    assert_eq!((painter.overlay().width(), painter.overlay().height()), (800, 600));
}

#[test]
fn disabling_brush_ends_stroke() {
    let mut painter = armed_painter();
    painter.pointer_down(Point::new(200.0, 100.0));
    painter.set_brush(false);
    assert!(!painter.is_painting());
    assert_eq!(painter.pointer_move(Point::new(250.0, 120.0)), PaintOutcome::Ignored);
}
