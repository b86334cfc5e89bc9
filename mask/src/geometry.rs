#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in either display or natural-image space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either side is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Geometric center, measured from the top-left corner.
    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.width / 2.0, y: self.height / 2.0 }
    }
}

/// On-screen placement of the overlay: client-space origin plus rendered size.
///
/// Pointer events arrive in client coordinates; subtracting the origin gives
/// overlay-local display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Convert a client-space point to overlay-local coordinates.
    ///
    /// Returns `None` when the point falls outside the rect. Points exactly on
    /// the far edges are inside.
    #[must_use]
    pub fn to_local(&self, client: Point) -> Option<Point> {
        let x = client.x - self.left;
        let y = client.y - self.top;
        if x < 0.0 || y < 0.0 || x > self.width || y > self.height {
            return None;
        }
        Some(Point { x, y })
    }
}

/// Per-axis scaling between the rendered image and its natural pixel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMapping {
    natural: Size,
    rendered: Size,
}

impl ImageMapping {
    /// Build a mapping from natural-image size to rendered size.
    ///
    /// An empty rendered size degrades to the identity so a collapsed layout
    /// never produces infinities.
    #[must_use]
    pub fn new(natural: Size, rendered: Size) -> Self {
        if rendered.is_empty() || natural.is_empty() {
            return Self::identity();
        }
        Self { natural, rendered }
    }

    #[must_use]
    pub fn identity() -> Self {
        let unit = Size { width: 1.0, height: 1.0 };
        Self { natural: unit, rendered: unit }
    }

    /// Horizontal natural pixels per display pixel.
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.natural.width / self.rendered.width
    }

    /// Vertical natural pixels per display pixel.
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.natural.height / self.rendered.height
    }

    /// Convert an overlay-local display point to natural-image coordinates.
    ///
    /// Multiplies before dividing so the rendered center lands exactly on the
    /// natural center for integral sizes.
    #[must_use]
    pub fn display_to_natural(&self, display: Point) -> Point {
        Point {
            x: display.x * self.natural.width / self.rendered.width,
            y: display.y * self.natural.height / self.rendered.height,
        }
    }

    /// Convert a natural-image point back to overlay-local display coordinates.
    #[must_use]
    pub fn natural_to_display(&self, natural: Point) -> Point {
        Point {
            x: natural.x * self.rendered.width / self.natural.width,
            y: natural.y * self.rendered.height / self.natural.height,
        }
    }
}

impl Default for ImageMapping {
    fn default() -> Self {
        Self::identity()
    }
}
