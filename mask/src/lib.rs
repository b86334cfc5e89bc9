//! Mask painting for the studio's edit mode.
//!
//! The user paints over a displayed image to mark the region an edit should
//! focus on. The backend accepts a single point rather than a mask, so this
//! crate reduces the painted strokes to a bounding box in natural-image pixels
//! and hands out its center as the request hotspot. A translucent overlay is
//! rasterized alongside so a host can show what was painted.
//!
//! Everything here is synchronous and allocation-light; the host owns one
//! [`painter::MaskPainter`] per displayed image and feeds it pointer events.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`painter`] | Top-level painter: brush gating, stroke tracking, reset rules |
//! | [`geometry`] | Points, sizes, the on-screen rect and display→natural mapping |
//! | [`bounds`] | Running bounding box and hotspot derivation |
//! | [`overlay`] | RGBA overlay raster with brush dabs |
//! | [`stroke`] | Pointer gesture state machine |
//! | [`consts`] | Brush radius, colors and fallback image size |

pub mod bounds;
pub mod consts;
pub mod geometry;
pub mod overlay;
pub mod painter;
pub mod stroke;

pub use bounds::{Hotspot, MaskBounds, MaskBox};
pub use geometry::{DisplayRect, ImageMapping, Point, Size};
pub use overlay::Overlay;
pub use painter::{MaskPainter, PaintOutcome};
