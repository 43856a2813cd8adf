//! Raster images.
//!
//! This module provides:
//!
//! - The [`Image`] type, an owned 8-bit RGBA image.
//! - The [`Mask`] type, an owned single-channel opacity map of the same dimensions as an image.
//! - [`Color`] and [`Resolution`], the small value types used throughout the crate.
//! - [`Blend`], the one way pixels from one image end up in another.
//! - A few [`draw`] functions used to rasterize landmark regions and visualize landmarks.
//!
//! Grayscale and RGB inputs are expanded to RGBA when decoded (with full opacity), so every
//! compositing operation in this crate only ever has to deal with one pixel layout.

mod blend;
mod color;
pub mod draw;
mod mask;
mod resolution;


use std::{fmt, io::Cursor, path::Path};

use image::{imageops::FilterType, DynamicImage, ImageBuffer, Rgba, RgbaImage};

pub use blend::*;
pub use color::*;
pub use mask::*;
pub use resolution::*;

#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("png") => Ok(Self::Png),
            _ => anyhow::bail!(
                "invalid image path '{}' (must have one of the supported extensions)",
                path.display()
            ),
        }
    }

    fn codec(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }
}

/// An 8-bit sRGB image with alpha channel.
///
/// Compositing operations never mutate an [`Image`] they were handed; they clone it first, so
/// callers always keep their original.
#[derive(Clone, PartialEq)]
pub struct Image {
    pub(crate) buf: RgbaImage,
}

impl Image {
    /// Loads an image from the filesystem.
    ///
    /// The path must have a supported file extension (`jpeg`, `jpg` or `png`).
    pub fn load<A: AsRef<Path>>(path: A) -> anyhow::Result<Self> {
        Self::load_impl(path.as_ref())
    }

    fn load_impl(path: &Path) -> anyhow::Result<Self> {
        let format = ImageFormat::from_path(path)?;
        let data = std::fs::read(path)?;
        let image = image::load_from_memory_with_format(&data, format.codec())?;
        Ok(Self::from_dynamic(image))
    }

    /// Decodes an image from an in-memory PNG or JPEG file, detecting the format from its
    /// contents.
    pub fn decode(data: &[u8]) -> anyhow::Result<Self> {
        let image = image::load_from_memory(data)?;
        Ok(Self::from_dynamic(image))
    }

    fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            buf: image.to_rgba8(),
        }
    }

    /// Creates an [`Image`] from raw, preexisting RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is not exactly `width * height * 4` bytes long.
    pub fn from_rgba8(res: Resolution, buf: &[u8]) -> Self {
        let expected_size = res.num_pixels() as usize * 4;
        assert_eq!(
            expected_size,
            buf.len(),
            "incorrect buffer size {} for {} image (expected {} bytes)",
            buf.len(),
            res,
            expected_size,
        );

        Self {
            buf: ImageBuffer::from_vec(res.width(), res.height(), buf.to_vec())
                .expect("buffer size does not match image resolution"),
        }
    }

    /// Creates an [`Image`] of solid `color`, using `mask` as its alpha channel.
    ///
    /// This is how a colored makeup layer is produced from a region mask.
    pub fn from_mask(color: Color, mask: &Mask) -> Self {
        let buf = ImageBuffer::from_fn(mask.width(), mask.height(), |x, y| {
            Rgba(color.with_alpha(mask.get(x, y)).0)
        });
        Self { buf }
    }

    /// Saves an image to the file system.
    ///
    /// The path must have a supported file extension (`jpeg`, `jpg` or `png`). The alpha
    /// channel is dropped: every artifact this crate writes is a plain RGB image.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        self.save_impl(path.as_ref())
    }

    fn save_impl(&self, path: &Path) -> anyhow::Result<()> {
        let format = ImageFormat::from_path(path)?;
        self.to_rgb().save_with_format(path, format.codec())?;
        log::debug!("saved {:?} to '{}'", self, path.display());
        Ok(())
    }

    /// Encodes this image as an RGB PNG file.
    pub fn encode_png(&self) -> anyhow::Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.to_rgb()
            .write_to(&mut out, image::ImageOutputFormat::Png)?;
        Ok(out.into_inner())
    }

    fn to_rgb(&self) -> DynamicImage {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(self.buf.clone()).into_rgb8())
    }

    /// Creates an empty image of a specified size.
    ///
    /// The image will start out black and fully transparent.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: ImageBuffer::new(width, height),
        }
    }

    /// Returns a new [`Image`] of the given size, with every pixel initialized to `color`.
    pub fn filled(res: Resolution, color: Color) -> Self {
        let mut this = Self::new(res.width(), res.height());
        this.clear(color);
        this
    }

    /// Returns the width of this image, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Returns the height of this image, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// Returns the size of this image.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    /// Gets the image color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this image.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        Color(self.buf[(x, y)].0)
    }

    /// Sets the image color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this image.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.buf[(x, y)] = Rgba(color.0);
    }

    /// Clears the image, setting every pixel value to `color`.
    pub fn clear(&mut self, color: Color) {
        self.buf.pixels_mut().for_each(|pix| pix.0 = color.0);
    }

    /// Applies `f` to every pixel of the image.
    pub fn map_pixels(&mut self, mut f: impl FnMut(Color) -> Color) {
        for pix in self.buf.pixels_mut() {
            pix.0 = f(Color(pix.0)).0;
        }
    }

    /// Returns an iterator over all pixel colors, in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.buf.pixels().map(|pix| Color(pix.0))
    }

    /// Returns whether every pixel of this image is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.pixels().all(|c| c.a() == 255)
    }

    /// Returns a copy of this image with its alpha channel flattened away.
    ///
    /// Color channels are kept as they are; every pixel becomes fully opaque.
    pub fn flatten(&self) -> Image {
        let mut out = self.clone();
        out.map_pixels(|c| c.with_alpha(255));
        out
    }

    /// Resamples this image to `res` using a Lanczos filter.
    ///
    /// Lanczos keeps the color distribution of the source intact, which matters when the
    /// result is used as a source of color statistics. Color is resampled premultiplied by
    /// alpha, so the color of fully transparent pixels never leaks into the edges of opaque
    /// ones. If `res` matches the current size, the image is copied unchanged.
    pub fn resize(&self, res: Resolution) -> Image {
        if res == self.resolution() {
            return self.clone();
        }

        log::trace!("resizing {:?} to {}", self, res);
        let premultiplied: ImageBuffer<Rgba<f32>, Vec<f32>> =
            ImageBuffer::from_fn(self.width(), self.height(), |x, y| {
                let c = self.get(x, y);
                let a = f32::from(c.a()) / 255.0;
                let [r, g, b] = c.rgb().map(|v| f32::from(v) / 255.0 * a);
                Rgba([r, g, b, a])
            });
        let resized = image::imageops::resize(
            &premultiplied,
            res.width(),
            res.height(),
            FilterType::Lanczos3,
        );

        let buf = ImageBuffer::from_fn(res.width(), res.height(), |x, y| {
            let [r, g, b, a] = resized[(x, y)].0;
            let alpha = quantize(a * 255.0);
            if alpha == 0 {
                return Rgba(Color::NONE.0);
            }
            let [r, g, b] = [r, g, b].map(|v| quantize(v / a * 255.0));
            Rgba([r, g, b, alpha])
        });
        Image { buf }
    }

    /// Overwrites the data in `self` with a `src` image.
    ///
    /// `src` is placed with its top left corner at `(0, 0)` unless moved with
    /// [`Blend::at`]; parts of `src` that end up outside of `self` are ignored.
    ///
    /// By default, this performs alpha blending.
    pub fn blend_from<'b>(&'b mut self, src: &'b Image) -> Blend<'b> {
        Blend::new(self, src)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} Image", self.width(), self.height())
    }
}
