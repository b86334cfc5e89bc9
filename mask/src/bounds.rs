//! Running bounding box over painted samples, and the hotspot derived from it.
//!
//! The box lives in natural-image pixels. It starts undefined, becomes a
//! zero-area box at the first sample, and only grows from there until it is
//! explicitly cleared.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use serde::{Deserialize, Serialize};

use crate::consts::{FALLBACK_NATURAL_HEIGHT, FALLBACK_NATURAL_WIDTH};
use crate::geometry::{Point, Size};

/// Axis-aligned bounds of every painted sample.
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl MaskBox {
    /// Zero-area box at a single point.
    #[must_use]
    pub fn at(point: Point) -> Self {
        Self { min_x: point.x, min_y: point.y, max_x: point.x, max_y: point.y }
    }

    /// Expand the box so it contains `point`.
    #[must_use]
    pub fn including(self, point: Point) -> Self {
        Self {
            min_x: self.min_x.min(point.x),
            min_y: self.min_y.min(point.y),
            max_x: self.max_x.max(point.x),
            max_y: self.max_y.max(point.y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: (self.min_x + self.max_x) / 2.0, y: (self.min_y + self.max_y) / 2.0 }
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }
}

/// Accumulator that folds samples into an optional [`MaskBox`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaskBounds {
    current: Option<MaskBox>,
}

impl MaskBounds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sample into the box. Non-finite samples are dropped.
    pub fn record(&mut self, point: Point) {
        if !point.x.is_finite() || !point.y.is_finite() {
            return;
        }
        self.current = Some(match self.current {
            Some(bbox) => bbox.including(point),
            None => MaskBox::at(point),
        });
    }

    #[must_use]
    pub fn get(&self) -> Option<MaskBox> {
        self.current
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// A single edit focus point in natural-image pixels, as the API expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: i64,
    pub y: i64,
}

impl Hotspot {
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Round a point to the nearest pixel (halves away from zero).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_point(point: Point) -> Self {
        Self { x: point.x.round() as i64, y: point.y.round() as i64 }
    }

    /// Pick the hotspot for an edit request.
    ///
    /// The painted box center wins. Without paint, the center of the natural
    /// image is used, falling back to a 512×512 image when the size is unknown.
    #[must_use]
    pub fn resolve(mask: Option<MaskBox>, natural: Option<Size>) -> Self {
        let center = match mask {
            Some(bbox) => bbox.center(),
            None => natural
                .filter(|size| !size.is_empty())
                .unwrap_or(Size { width: FALLBACK_NATURAL_WIDTH, height: FALLBACK_NATURAL_HEIGHT })
                .center(),
        };
        Self::from_point(center)
    }
}
