use std::fmt;

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::distance_transform::Norm;

use super::Resolution;

/// A single-channel 8-bit opacity map.
///
/// A value of 0 means "fully transparent" (not covered), 255 means "fully opaque". Masks are
/// produced fresh for every compositing call and always have the size of the image they belong
/// to.
#[derive(Clone, PartialEq)]
pub struct Mask {
    pub(crate) buf: GrayImage,
}

impl Mask {
    /// Creates an empty (all zero) mask of the given size.
    pub fn new(res: Resolution) -> Self {
        Self {
            buf: ImageBuffer::new(res.width(), res.height()),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    /// Returns the mask value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this mask.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.buf[(x, y)].0[0]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        self.buf[(x, y)] = Luma([value]);
    }

    /// Returns an iterator over all mask values, in row-major order.
    pub fn values(&self) -> impl Iterator<Item = u8> + '_ {
        self.buf.as_raw().iter().copied()
    }

    /// Returns the number of pixels with a non-zero value.
    pub fn footprint(&self) -> usize {
        self.values().filter(|&v| v != 0).count()
    }

    /// Returns whether no pixel of the mask is covered.
    pub fn is_empty(&self) -> bool {
        self.values().all(|v| v == 0)
    }

    /// Applies a Gaussian blur with standard deviation `sigma`.
    ///
    /// A non-positive (or non-finite) `sigma` returns an unmodified copy.
    pub fn blur(&self, sigma: f32) -> Mask {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return self.clone();
        }
        Mask {
            buf: imageproc::filter::gaussian_blur_f32(&self.buf, sigma),
        }
    }

    /// Dilates the mask with a square structuring element of `kernel_size x kernel_size`
    /// pixels, `iterations` times.
    ///
    /// Even kernel sizes are rounded up to the next odd size, so that the element stays
    /// centered on the pixel.
    pub fn dilate(&self, kernel_size: u32, iterations: u32) -> Mask {
        let radius = (kernel_size / 2).min(u32::from(u8::MAX)) as u8;
        let mut buf = self.buf.clone();
        if radius == 0 {
            return self.clone();
        }
        for _ in 0..iterations {
            buf = imageproc::morphology::dilate(&buf, Norm::LInf, radius);
        }
        Mask { buf }
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} Mask", self.width(), self.height())
    }
}

/// Converts an OpenCV-style odd Gaussian kernel size into the standard deviation OpenCV would
/// derive for it when no explicit sigma is given.
pub fn kernel_sigma(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}
