use anyhow::{Context, Result};
use mz_core::config::Geometry;
use mz_core::error::MzmError;
use mz_core::frame::{IndexGrid, Layer, RgbFrame};
use mz_core::gradient::GlyphGradient;
use mz_core::palette::DiffusionTable;
use mz_core::traits::Quantizer;
use mz_source::resize::resize_frame;

use crate::reduce::reduce;

/// Build the MZM layer for a decoded image.
///
/// Resizes `frame` to exactly the geometry's pixel size (aspect ratio is
/// discarded), quantizes it against `table` with `quantizer`, then reduces
/// every cell in row-major order.
///
/// # Errors
/// Fails if the resize fails or a cell reduces to nothing.
///
/// # Example
/// ```
/// use mz_core::config::Geometry;
/// use mz_core::frame::RgbFrame;
/// use mz_core::gradient::GlyphGradient;
/// use mz_core::palette::Palette;
/// use mz_tile::layer::build_layer;
/// use mz_tile::quantize::FloydSteinberg;
///
/// let table = Palette::default().expand().diffusion_table();
/// let geometry = Geometry::new(4, 2, 8, 14).unwrap();
/// let frame = RgbFrame::filled(100, 60, (255, 255, 255));
/// let layer = build_layer(&frame, &table, &GlyphGradient::default(), &FloydSteinberg, &geometry).unwrap();
/// assert_eq!(layer.cells.len(), 8);
/// assert!(layer.cells.iter().all(|c| c.glyph == 219 && c.color == 0xFF));
/// ```
pub fn build_layer(
    frame: &RgbFrame,
    table: &DiffusionTable,
    gradient: &GlyphGradient,
    quantizer: &dyn Quantizer,
    geometry: &Geometry,
) -> Result<Layer> {
    let (pw, ph) = geometry.pixel_size();
    let resized = resize_frame(frame, pw, ph)
        .with_context(|| format!("Redimensionnement vers {pw}x{ph}"))?;

    log::info!("quantification {pw}x{ph} ({})", quantizer.name());
    let grid = quantizer.quantize(&resized, table);

    Ok(reduce_grid(&grid, gradient, geometry)?)
}

/// Scan a quantized grid cell by cell and reduce each cell.
///
/// # Errors
/// `MzmError::InvalidDimensions` if the grid does not match the geometry's
/// pixel size; `MzmError::DegenerateCell` if a cell holds no pixels.
pub fn reduce_grid(
    grid: &IndexGrid,
    gradient: &GlyphGradient,
    geometry: &Geometry,
) -> Result<Layer, MzmError> {
    let (pw, ph) = geometry.pixel_size();
    if (grid.width, grid.height) != (pw, ph) {
        return Err(MzmError::InvalidDimensions {
            width: grid.width,
            height: grid.height,
        });
    }

    let mut layer = Layer::new(geometry.grid_width, geometry.grid_height);
    for cy in 0..geometry.grid_height {
        for cx in 0..geometry.grid_width {
            let hist = grid.histogram(
                u32::from(cx) * geometry.cell_width,
                u32::from(cy) * geometry.cell_height,
                geometry.cell_width,
                geometry.cell_height,
            );
            layer.set(cx, cy, reduce(&hist, gradient)?);
        }
    }
    log::debug!(
        "layer {}x{} : {} cellules",
        layer.width,
        layer.height,
        layer.cells.len()
    );
    Ok(layer)
}
