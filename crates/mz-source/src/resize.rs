use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use mz_core::frame::RgbFrame;

/// Resizer wrappant fast_image_resize, convolution bicubique (Catmull-Rom).
///
/// The target size is authoritative: the source aspect ratio is not kept.
///
/// # Example
/// ```
/// use mz_source::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch copy of the source (fast_image_resize wants a mutable buffer).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new()
                .resize_alg(ResizeAlg::Convolution(FilterType::CatmullRom)),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns an error if either frame has zero or inconsistent dimensions,
    /// or if the resize operation fails.
    ///
    /// # Example
    /// ```
    /// use mz_source::resize::Resizer;
    /// use mz_core::frame::RgbFrame;
    /// let mut r = Resizer::new();
    /// let src = RgbFrame::new(100, 100);
    /// let mut dst = RgbFrame::new(64, 28);
    /// r.resize_into(&src, &mut dst).unwrap();
    /// ```
    pub fn resize_into(&mut self, src: &RgbFrame, dst: &mut RgbFrame) -> Result<()> {
        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x3)
                .context("Dimensions source invalides")?;
        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x3)
                .context("Dimensions destination invalides")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Échec du redimensionnement")?;

        Ok(())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Redimensionne vers exactement `width`×`height` pixels.
///
/// # Errors
/// Returns an error if the resize operation fails.
///
/// # Example
/// ```
/// use mz_source::resize::resize_frame;
/// use mz_core::frame::RgbFrame;
/// let src = RgbFrame::new(320, 200);
/// let dst = resize_frame(&src, 640, 350).unwrap();
/// assert_eq!((dst.width, dst.height), (640, 350));
/// ```
pub fn resize_frame(src: &RgbFrame, width: u32, height: u32) -> Result<RgbFrame> {
    log::debug!(
        "resize {}x{} → {width}x{height}",
        src.width,
        src.height
    );
    let mut dst = RgbFrame::new(width, height);
    Resizer::new().resize_into(src, &mut dst)?;
    Ok(dst)
}
