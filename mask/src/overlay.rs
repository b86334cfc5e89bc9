//! Translucent paint overlay sized to the image container.
//!
//! Each brush sample becomes a "dab": a filled disc with a wide outline, both
//! alpha-blended over what is already there. Resizing reallocates the raster
//! and drops its contents, as resizing an HTML canvas does.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use image::{Pixel, Rgba, RgbaImage};

use crate::consts::{BRUSH_FILL_RGBA, BRUSH_RADIUS_PX, BRUSH_STROKE_RGBA, BRUSH_STROKE_WIDTH_PX};
use crate::geometry::Point;

/// RGBA raster the brush paints into, in display pixels.
#[derive(Debug, Clone)]
pub struct Overlay {
    image: RgbaImage,
}

impl Overlay {
    /// A fully transparent overlay.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height) }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Reallocate to a new size. Previous paint is discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    /// Erase all paint, keeping the size.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Whether nothing has been painted since the last clear/resize.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|pixel| pixel[3] == 0)
    }

    /// Number of pixels with any coverage.
    #[must_use]
    pub fn painted_pixels(&self) -> usize {
        self.image.pixels().filter(|pixel| pixel[3] > 0).count()
    }

    /// Paint one brush dab centered at `center` (overlay-local display pixels).
    ///
    /// Pixels whose centers lie within the fill radius get the fill color;
    /// everything within the outer stroke edge then gets the stroke color on
    /// top. Parts of the dab outside the raster are clipped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn paint_dab(&mut self, center: Point) {
        let outer = BRUSH_RADIUS_PX + BRUSH_STROKE_WIDTH_PX / 2.0;
        let width = f64::from(self.image.width());
        let height = f64::from(self.image.height());
        if width == 0.0 || height == 0.0 {
            return;
        }

        let x0 = (center.x - outer).floor().clamp(0.0, width - 1.0) as u32;
        let y0 = (center.y - outer).floor().clamp(0.0, height - 1.0) as u32;
        let x1 = (center.x + outer).ceil().clamp(0.0, width - 1.0) as u32;
        let y1 = (center.y + outer).ceil().clamp(0.0, height - 1.0) as u32;

        let fill = Rgba(BRUSH_FILL_RGBA);
        let stroke = Rgba(BRUSH_STROKE_RGBA);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = f64::from(x) + 0.5 - center.x;
                let dy = f64::from(y) + 0.5 - center.y;
                let dist = dx.hypot(dy);
                if dist > outer {
                    continue;
                }
                let pixel = self.image.get_pixel_mut(x, y);
                if dist <= BRUSH_RADIUS_PX {
                    pixel.blend(&fill);
                }
                pixel.blend(&stroke);
            }
        }
    }

    /// Borrow the raster, e.g. to composite or save it.
    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
