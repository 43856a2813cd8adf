//! Rasterization of landmark regions and debug visualizations.
//!
//! Every function returns a guard that performs the drawing when dropped, so that optional
//! parameters can be customized with method chaining:
//!
//! ```no_run
//! # use makeover::image::{draw, Mask, Resolution};
//! # use imageproc::point::Point;
//! let mut mask = Mask::new(Resolution::new(64, 64));
//! let triangle = [Point::new(4, 4), Point::new(60, 4), Point::new(30, 50)];
//! draw::polygon(&mut mask, &triangle).value(200);
//! ```

use image::Luma;
use imageproc::{drawing, point::Point};
use itertools::Itertools;

use super::{Color, Image, Mask};

/// Guard returned by [`polygon`]; fills the polygon when dropped.
pub struct DrawPolygon<'a> {
    mask: &'a mut Mask,
    points: &'a [Point<i32>],
    value: u8,
}

impl DrawPolygon<'_> {
    /// Sets the value written to covered pixels.
    ///
    /// By default, polygons are filled with 255 (fully opaque).
    pub fn value(&mut self, value: u8) -> &mut Self {
        self.value = value;
        self
    }
}

impl Drop for DrawPolygon<'_> {
    fn drop(&mut self) {
        // Landmarks clamped to the image border can repeat, and the rasterizer rejects
        // polygons that are explicitly closed.
        let mut points = self.points.iter().copied().dedup().collect::<Vec<_>>();
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            log::trace!("skipping polygon with {} distinct vertices", points.len());
            return;
        }

        drawing::draw_polygon_mut(&mut self.mask.buf, &points, Luma([self.value]));
    }
}

/// Guard returned by [`ellipse`]; fills the ellipse when dropped.
pub struct DrawEllipse<'a> {
    mask: &'a mut Mask,
    x: i32,
    y: i32,
    radius_x: i32,
    radius_y: i32,
    value: u8,
}

impl DrawEllipse<'_> {
    /// Sets the value written to covered pixels.
    ///
    /// By default, ellipses are filled with 255 (fully opaque).
    pub fn value(&mut self, value: u8) -> &mut Self {
        self.value = value;
        self
    }
}

impl Drop for DrawEllipse<'_> {
    fn drop(&mut self) {
        if self.radius_x <= 0 || self.radius_y <= 0 {
            return;
        }
        drawing::draw_filled_ellipse_mut(
            &mut self.mask.buf,
            (self.x, self.y),
            self.radius_x,
            self.radius_y,
            Luma([self.value]),
        );
    }
}

/// Guard returned by [`marker`]; draws the marker when dropped and allows customization.
pub struct DrawMarker<'a> {
    image: &'a mut Image,
    x: i32,
    y: i32,
    color: Color,
    size: u32,
}

impl DrawMarker<'_> {
    /// Sets the marker's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the width and height of the marker.
    ///
    /// The default size is 5. The size must be *uneven* and *non-zero*. A size of 1 will result in
    /// a single pixel getting drawn.
    pub fn size(&mut self, size: u32) -> &mut Self {
        assert!(size != 0, "marker size must be greater than zero");
        assert!(size % 2 == 1, "marker size must be an uneven number");
        self.size = size;
        self
    }
}

impl Drop for DrawMarker<'_> {
    fn drop(&mut self) {
        let offset = ((self.size - 1) / 2) as i32;
        for (xoff, yoff) in (-offset..=offset)
            .zip(-offset..=offset)
            .chain((-offset..=offset).rev().zip(-offset..=offset))
        {
            let (x, y) = (self.x + xoff, self.y + yoff);
            if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height()
            {
                self.image.set(x as u32, y as u32, self.color);
            }
        }
    }
}

/// Fills a polygon on a mask.
///
/// Polygons with fewer than 3 distinct vertices are not drawn.
pub fn polygon<'a>(mask: &'a mut Mask, points: &'a [Point<i32>]) -> DrawPolygon<'a> {
    DrawPolygon {
        mask,
        points,
        value: 255,
    }
}

/// Fills an axis-aligned ellipse centered at `(x, y)` on a mask.
pub fn ellipse(mask: &mut Mask, x: i32, y: i32, radius_x: i32, radius_y: i32) -> DrawEllipse<'_> {
    DrawEllipse {
        mask,
        x,
        y,
        radius_x,
        radius_y,
        value: 255,
    }
}

/// Draws a marker onto an image.
///
/// This can be used to visualize landmarks.
pub fn marker(image: &mut Image, x: i32, y: i32) -> DrawMarker<'_> {
    DrawMarker {
        image,
        x,
        y,
        color: Color::from_rgb8(255, 0, 0),
        size: 5,
    }
}
