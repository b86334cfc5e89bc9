//! Shared constants for the mask crate.

// ── Brush ───────────────────────────────────────────────────────

/// Radius of the filled brush disc, in display pixels.
pub const BRUSH_RADIUS_PX: f64 = 15.0;

/// Width of the outline stroked around each disc, in display pixels.
///
/// The stroke is centered on the disc edge, so a dab covers
/// `BRUSH_RADIUS_PX + BRUSH_STROKE_WIDTH_PX / 2` pixels from its center.
pub const BRUSH_STROKE_WIDTH_PX: f64 = 30.0;

/// Disc fill, `rgba(59, 130, 246, 0.45)`.
pub const BRUSH_FILL_RGBA: [u8; 4] = [59, 130, 246, 115];

/// Disc outline, `rgba(37, 99, 235, 0.6)`.
pub const BRUSH_STROKE_RGBA: [u8; 4] = [37, 99, 235, 153];

// ── Hotspot ─────────────────────────────────────────────────────

/// Natural size assumed when an edit is submitted before the image size is known.
pub const FALLBACK_NATURAL_WIDTH: f64 = 512.0;

/// See [`FALLBACK_NATURAL_WIDTH`].
pub const FALLBACK_NATURAL_HEIGHT: f64 = 512.0;
