//! Quantification RGB → index de Diffusion Table.
//!
//! Toutes les recherches de couleur retournent l'index le plus bas parmi les
//! entrées équidistantes.

use mz_core::frame::{IndexGrid, RgbFrame};
use mz_core::palette::DiffusionTable;
use mz_core::traits::Quantizer;

/// Index of the table entry closest to `rgb` (squared RGB distance).
///
/// Ties resolve to the lowest index.
///
/// # Example
/// ```
/// use mz_core::palette::Palette;
/// use mz_tile::quantize::nearest_index;
/// let table = Palette::default().expand().diffusion_table();
/// assert_eq!(nearest_index(&table, [250, 250, 250]), 15);
/// assert_eq!(nearest_index(&table, [0, 0, 0]), 0);
/// ```
#[inline]
#[must_use]
pub fn nearest_index(table: &DiffusionTable, rgb: [i32; 3]) -> u8 {
    let mut best = 0usize;
    let mut best_dist = i32::MAX;
    for (i, entry) in table.entries().iter().enumerate() {
        let dr = rgb[0] - i32::from(entry[0]);
        let dg = rgb[1] - i32::from(entry[1]);
        let db = rgb[2] - i32::from(entry[2]);
        let dist = dr * dr + dg * dg + db * db;
        if dist < best_dist {
            best_dist = dist;
            best = i;
            if dist == 0 {
                break;
            }
        }
    }
    best as u8
}

/// Plus proche couleur, sans tramage.
///
/// Flat regions come out as a single index; kept as a reference backend for
/// tests and comparisons.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestColor;

impl Quantizer for NearestColor {
    fn quantize(&self, frame: &RgbFrame, table: &DiffusionTable) -> IndexGrid {
        let mut grid = IndexGrid::new(frame.width, frame.height);
        for (dst, px) in grid.data.iter_mut().zip(frame.data.chunks_exact(3)) {
            *dst = nearest_index(
                table,
                [i32::from(px[0]), i32::from(px[1]), i32::from(px[2])],
            );
        }
        grid
    }

    fn name(&self) -> &'static str {
        "nearest"
    }
}

/// Diffusion d'erreur Floyd–Steinberg (7/16, 3/16, 5/16, 1/16).
///
/// Scans rows left to right, top to bottom. The error carried into a pixel
/// is clamped with it to [0, 255] before the nearest-color search.
///
/// # Example
/// ```
/// use mz_core::frame::RgbFrame;
/// use mz_core::palette::Palette;
/// use mz_core::traits::Quantizer;
/// use mz_tile::quantize::FloydSteinberg;
/// let table = Palette::default().expand().diffusion_table();
/// let grid = FloydSteinberg.quantize(&RgbFrame::new(8, 14), &table);
/// assert!(grid.data.iter().all(|&i| i == 0));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FloydSteinberg;

impl Quantizer for FloydSteinberg {
    fn quantize(&self, frame: &RgbFrame, table: &DiffusionTable) -> IndexGrid {
        let w = frame.width as usize;
        let mut grid = IndexGrid::new(frame.width, frame.height);
        // Erreur accumulée : ligne courante et ligne suivante, 3 canaux.
        let mut cur = vec![[0i32; 3]; w + 2];
        let mut next = vec![[0i32; 3]; w + 2];

        for y in 0..frame.height {
            for x in 0..frame.width {
                let xi = x as usize + 1;
                let (r, g, b) = frame.pixel(x, y);
                let want = [
                    (i32::from(r) + cur[xi][0] / 16).clamp(0, 255),
                    (i32::from(g) + cur[xi][1] / 16).clamp(0, 255),
                    (i32::from(b) + cur[xi][2] / 16).clamp(0, 255),
                ];
                let idx = nearest_index(table, want);
                grid.set(x, y, idx);

                let got = table.entries()[idx as usize];
                for (c, (&w, &g)) in want.iter().zip(got.iter()).enumerate() {
                    let err = w - i32::from(g);
                    cur[xi + 1][c] += err * 7;
                    next[xi - 1][c] += err * 3;
                    next[xi][c] += err * 5;
                    next[xi + 1][c] += err;
                }
            }
            std::mem::swap(&mut cur, &mut next);
            next.iter_mut().for_each(|e| *e = [0; 3]);
        }
        grid
    }

    fn name(&self) -> &'static str {
        "floyd-steinberg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mz_core::palette::Palette;

    fn table() -> DiffusionTable {
        Palette::default().expand().diffusion_table()
    }

    #[test]
    fn nearest_prefers_lowest_duplicate() {
        let t = table();
        // [170, 170, 170] = couleur 7, présente aux index 7, 23, 39…
        assert_eq!(nearest_index(&t, [170, 170, 170]), 7);
        assert_eq!(nearest_index(&t, [168, 172, 171]), 7);
    }

    #[test]
    fn nearest_flat_frame_is_single_index() {
        let frame = RgbFrame::filled(8, 14, (0, 170, 170));
        let grid = NearestColor.quantize(&frame, &table());
        assert!(grid.data.iter().all(|&i| i == 3));
    }

    #[test]
    fn floyd_steinberg_exact_palette_color_is_stable() {
        let frame = RgbFrame::filled(16, 14, (85, 255, 85));
        let grid = FloydSteinberg.quantize(&frame, &table());
        assert!(grid.data.iter().all(|&i| i == 10));
    }

    #[test]
    fn floyd_steinberg_mixes_two_colors_for_midtone() {
        // Gris 128 entre la couleur 8 (85) et la couleur 7 (170).
        let frame = RgbFrame::filled(8, 14, (128, 128, 128));
        let grid = FloydSteinberg.quantize(&frame, &table());
        let hist = grid.histogram(0, 0, 8, 14);
        assert!(hist[7] > 0 && hist[8] > 0, "{:?}", &hist[..16]);
        assert_eq!(hist[7] + hist[8], 8 * 14);
    }

    #[test]
    fn floyd_steinberg_preserves_average_luminance() {
        let frame = RgbFrame::filled(32, 32, (100, 100, 100));
        let t = table();
        let grid = FloydSteinberg.quantize(&frame, &t);
        let sum: u32 = grid
            .data
            .iter()
            .map(|&i| u32::from(t.entries()[i as usize][0]))
            .sum();
        let mean = sum / (32 * 32);
        assert!(mean.abs_diff(100) <= 8, "moyenne {mean}");
    }

    #[test]
    fn indices_stay_in_first_palette_copy() {
        let mut frame = RgbFrame::new(20, 20);
        for y in 0..20 {
            for x in 0..20 {
                frame.set_pixel(x, y, ((x * 12) as u8, (y * 12) as u8, ((x + y) * 6) as u8));
            }
        }
        let grid = FloydSteinberg.quantize(&frame, &table());
        assert!(grid.data.iter().all(|&i| i < 16));
    }
}
