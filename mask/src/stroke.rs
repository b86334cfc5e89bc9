//! Pointer gesture tracking for the brush.
//!
//! A stroke begins on pointer-down and lasts until pointer-up. Moves only
//! paint while a stroke is in progress, so hovering with the button released
//! leaves the mask alone.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use crate::geometry::Point;

/// Gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    /// No button held; moves are ignored.
    #[default]
    Idle,
    /// A stroke is in progress.
    Painting {
        /// Last display-space sample, kept so hosts can draw joins.
        last: Option<Point>,
        /// Samples painted in this stroke, including those that fell outside.
        samples: usize,
    },
}

impl StrokeState {
    #[must_use]
    pub fn is_painting(&self) -> bool {
        matches!(self, Self::Painting { .. })
    }

    /// Enter the painting state, discarding any previous stroke.
    pub fn begin(&mut self) {
        *self = Self::Painting { last: None, samples: 0 };
    }

    /// Note a sample taken during the current stroke.
    ///
    /// `painted` carries the display point when the sample landed inside the
    /// overlay. Does nothing when idle.
    pub fn sample(&mut self, painted: Option<Point>) {
        if let Self::Painting { last, samples } = self {
            *samples += 1;
            if painted.is_some() {
                *last = painted;
            }
        }
    }

    /// Leave the painting state.
    pub fn end(&mut self) {
        *self = Self::Idle;
    }
}
