use std::path::Path;

use mz_core::error::MzmError;
use mz_core::frame::RgbFrame;

/// Charge une image (PNG, JPEG, BMP, GIF) en RGB 8 bits.
///
/// Luminance and alpha images are converted; alpha is dropped.
///
/// # Errors
/// `MzmError::ImageDecode` if the file cannot be opened or decoded.
///
/// # Example
/// ```no_run
/// use mz_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("title.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<RgbFrame, MzmError> {
    let img = image::open(path).map_err(|e| MzmError::ImageDecode {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    log::info!(
        "{}: {}x{} {:?}",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(RgbFrame {
        data: rgb.into_raw(),
        width,
        height,
    })
}
