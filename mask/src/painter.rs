//! The mask painter: one per displayed image.
//!
//! DESIGN
//! ======
//! The painter is the testable core a UI host drives. The host forwards
//! pointer events in client coordinates and tells the painter when the studio
//! mode, the displayed image or the container size changes. The painter owns
//! the overlay raster and the bounding box and enforces the reset rules:
//!
//! - a new image source clears paint and bounds
//! - any mode change clears paint and bounds; leaving edit mode also turns
//!   the brush off
//! - a container resize reallocates the overlay but keeps the bounds, which
//!   live in natural-image pixels and stay valid

#[cfg(test)]
#[path = "painter_test.rs"]
mod painter_test;

use crate::bounds::{Hotspot, MaskBounds, MaskBox};
use crate::geometry::{DisplayRect, ImageMapping, Point, Size};
use crate::overlay::Overlay;
use crate::stroke::StrokeState;

/// What happened to a pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintOutcome {
    /// Brush off, not in edit mode, or no stroke in progress.
    Ignored,
    /// The sample fell outside the overlay rect.
    OutOfBounds,
    /// A dab was painted and folded into the bounds.
    Painted {
        /// Overlay-local display position of the dab.
        display: Point,
        /// The same position in natural-image pixels.
        natural: Point,
    },
}

/// Freehand mask painter with bounding-box tracking.
#[derive(Debug, Clone)]
pub struct MaskPainter {
    editing: bool,
    brush: bool,
    stroke: StrokeState,
    container: DisplayRect,
    natural: Option<Size>,
    bounds: MaskBounds,
    overlay: Overlay,
}

impl MaskPainter {
    /// Create a painter for an overlay occupying `container` on screen.
    #[must_use]
    pub fn new(container: DisplayRect) -> Self {
        let (width, height) = overlay_dims(container);
        Self {
            editing: false,
            brush: false,
            stroke: StrokeState::Idle,
            container,
            natural: None,
            bounds: MaskBounds::new(),
            overlay: Overlay::new(width, height),
        }
    }

    // --- Host notifications ---

    /// The studio mode changed. Always resets; leaving edit disables the brush.
    pub fn mode_changed(&mut self, editing: bool) {
        self.editing = editing;
        if !editing {
            self.brush = false;
        }
        self.reset();
    }

    /// A different image is now displayed. `natural` is its pixel size, if known.
    pub fn image_changed(&mut self, natural: Option<Size>) {
        self.natural = natural.filter(|size| !size.is_empty());
        self.reset();
    }

    /// The container moved or resized on screen.
    pub fn resize(&mut self, container: DisplayRect) {
        self.container = container;
        let (width, height) = overlay_dims(container);
        self.overlay.resize(width, height);
    }

    /// Turn the brush on or off. Returns the effective state; the brush
    /// cannot be enabled outside edit mode.
    pub fn set_brush(&mut self, on: bool) -> bool {
        self.brush = on && self.editing;
        if !self.brush {
            self.stroke.end();
        }
        self.brush
    }

    /// Flip the brush. Returns the effective state.
    pub fn toggle_brush(&mut self) -> bool {
        self.set_brush(!self.brush)
    }

    /// Clear paint and forget the bounding box.
    pub fn reset(&mut self) {
        self.stroke.end();
        self.bounds.clear();
        self.overlay.clear();
    }

    // --- Pointer input ---

    /// Begin a stroke and paint at the pointer position.
    pub fn pointer_down(&mut self, client: Point) -> PaintOutcome {
        if !self.is_active() {
            return PaintOutcome::Ignored;
        }
        self.stroke.begin();
        self.paint_at(client)
    }

    /// Continue the stroke; ignored when no stroke is in progress.
    pub fn pointer_move(&mut self, client: Point) -> PaintOutcome {
        if !self.is_active() || !self.stroke.is_painting() {
            return PaintOutcome::Ignored;
        }
        self.paint_at(client)
    }

    /// End the stroke.
    pub fn pointer_up(&mut self) {
        self.stroke.end();
    }

    fn paint_at(&mut self, client: Point) -> PaintOutcome {
        let Some(display) = self.container.to_local(client) else {
            self.stroke.sample(None);
            return PaintOutcome::OutOfBounds;
        };
        self.overlay.paint_dab(display);
        let natural = self.mapping().display_to_natural(display);
        self.bounds.record(natural);
        self.stroke.sample(Some(display));
        PaintOutcome::Painted { display, natural }
    }

    // --- Queries ---

    /// Whether pointer input currently paints.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.editing && self.brush
    }

    #[must_use]
    pub fn brush_enabled(&self) -> bool {
        self.brush
    }

    #[must_use]
    pub fn is_painting(&self) -> bool {
        self.stroke.is_painting()
    }

    /// Display→natural mapping in effect. Without a known natural size the
    /// container size stands in, making the mapping the identity.
    #[must_use]
    pub fn mapping(&self) -> ImageMapping {
        let rendered = self.container.size();
        ImageMapping::new(self.natural.unwrap_or(rendered), rendered)
    }

    #[must_use]
    pub fn natural_size(&self) -> Option<Size> {
        self.natural
    }

    #[must_use]
    pub fn mask_box(&self) -> Option<MaskBox> {
        self.bounds.get()
    }

    /// The point an edit request should target.
    #[must_use]
    pub fn hotspot(&self) -> Hotspot {
        Hotspot::resolve(self.bounds.get(), self.natural)
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn overlay_dims(container: DisplayRect) -> (u32, u32) {
    let width = container.width.round().max(0.0) as u32;
    let height = container.height.round().max(0.0) as u32;
    (width, height)
}
