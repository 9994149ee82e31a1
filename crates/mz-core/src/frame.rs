/// Buffer de pixels RGB, row-major, 3 bytes par pixel.
///
/// Luminance-only sources are widened to RGB before they get here.
///
/// # Example
/// ```
/// use mz_core::frame::RgbFrame;
/// let fb = RgbFrame::new(10, 10);
/// assert_eq!(fb.data.len(), 300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbFrame {
    /// Pixels RGB, row-major.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RgbFrame {
    /// Crée un buffer noir aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 3],
            width,
            height,
        }
    }

    /// Crée un buffer uni de couleur `rgb`.
    ///
    /// # Example
    /// ```
    /// use mz_core::frame::RgbFrame;
    /// let fb = RgbFrame::filled(2, 2, (1, 2, 3));
    /// assert_eq!(fb.pixel(1, 1), (1, 2, 3));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgb: (u8, u8, u8)) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..width as usize * height as usize {
            data.extend_from_slice(&[rgb.0, rgb.1, rgb.2]);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Accès au pixel (x, y) → (r, g, b).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Écrit le pixel (x, y).
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: (u8, u8, u8)) {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.data[idx] = rgb.0;
        self.data[idx + 1] = rgb.1;
        self.data[idx + 2] = rgb.2;
    }
}

/// Grille d'indices quantifiés, une entrée par pixel, dans la Diffusion Table.
///
/// # Example
/// ```
/// use mz_core::frame::IndexGrid;
/// let mut grid = IndexGrid::new(4, 4);
/// grid.set(1, 1, 17);
/// let hist = grid.histogram(0, 0, 2, 2);
/// assert_eq!(hist[17], 1);
/// assert_eq!(hist[0], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexGrid {
    /// Indices row-major.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl IndexGrid {
    /// Crée une grille remplie d'index 0.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Index at (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Set the index at (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, index: u8) {
        self.data[y as usize * self.width as usize + x as usize] = index;
    }

    /// 256-bin histogram of the block starting at (`x`, `y`) of size `w`×`h`.
    ///
    /// The block is clipped to the grid bounds.
    #[must_use]
    pub fn histogram(&self, x: u32, y: u32, w: u32, h: u32) -> [u32; 256] {
        let mut hist = [0u32; 256];
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for py in y.min(y_end)..y_end {
            let row = py as usize * self.width as usize;
            for &idx in &self.data[row + x.min(x_end) as usize..row + x_end as usize] {
                hist[idx as usize] += 1;
            }
        }
        hist
    }
}

/// One MZM output pair.
///
/// `color` packs the dominant color in the low nibble and the secondary
/// color in the high nibble.
///
/// # Example
/// ```
/// use mz_core::frame::TileCell;
/// let cell = TileCell::new(219, 3, 12);
/// assert_eq!(cell.color, 3 + 12 * 16);
/// assert_eq!(cell.dominant(), 3);
/// assert_eq!(cell.secondary(), 12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileCell {
    /// Glyph code (0-255).
    pub glyph: u8,
    /// Packed color byte.
    pub color: u8,
}

impl TileCell {
    /// Pack a glyph with dominant and secondary color indices (0-15).
    #[must_use]
    pub fn new(glyph: u8, dominant: u8, secondary: u8) -> Self {
        debug_assert!(dominant < 16 && secondary < 16);
        Self {
            glyph,
            color: (dominant & 0x0F) | ((secondary & 0x0F) << 4),
        }
    }

    /// Low nibble.
    #[must_use]
    pub fn dominant(self) -> u8 {
        self.color & 0x0F
    }

    /// High nibble.
    #[must_use]
    pub fn secondary(self) -> u8 {
        self.color >> 4
    }
}

/// Layer MZM : cellules en ordre row-major, `width * height` entrées.
///
/// # Example
/// ```
/// use mz_core::frame::{Layer, TileCell};
/// let mut layer = Layer::new(80, 25);
/// layer.set(0, 0, TileCell::new(219, 1, 1));
/// assert_eq!(layer.cells.len(), 80 * 25);
/// assert_eq!(layer.get(0, 0).glyph, 219);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    /// Flat array of cells, row-major.
    pub cells: Vec<TileCell>,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Layer {
    /// Crée un layer pré-alloué.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![TileCell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u16, y: u16, cell: TileCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get a cell at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> TileCell {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Flattened payload: glyph byte then color byte, per cell.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().flat_map(|c| [c.glyph, c.color]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_pixel_of_block() {
        let mut grid = IndexGrid::new(16, 28);
        for y in 0..28 {
            for x in 0..16 {
                grid.set(x, y, ((x / 8) + (y / 14) * 2) as u8);
            }
        }
        let hist = grid.histogram(8, 14, 8, 14);
        assert_eq!(hist[3], 8 * 14);
        assert_eq!(hist.iter().sum::<u32>(), 8 * 14);
    }

    #[test]
    fn histogram_clips_to_bounds() {
        let grid = IndexGrid::new(4, 4);
        let hist = grid.histogram(2, 2, 8, 8);
        assert_eq!(hist[0], 4);
    }

    #[test]
    fn layer_bytes_are_glyph_then_color() {
        let mut layer = Layer::new(2, 1);
        layer.set(0, 0, TileCell::new(176, 1, 2));
        layer.set(1, 0, TileCell::new(219, 15, 0));
        assert_eq!(layer.to_bytes(), vec![176, 0x21, 219, 0x0F]);
    }
}
