//! Tramage ordonné (Bayer 8×8) devant la recherche de plus proche couleur.

use mz_core::frame::{IndexGrid, RgbFrame};
use mz_core::palette::DiffusionTable;
use mz_core::traits::Quantizer;

use crate::quantize::nearest_index;

/// Matrice de Bayer 8x8. Normalisée sur 64 niveaux (0-63).
pub const BAYER_8X8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Applique le seuil Bayer 8x8 à un canal [0..255].
///
/// The offset spans one quantization step (`255 / levels`), centred on zero.
/// Values at the extremes are left alone so pure black and white stay pure.
///
/// # Example
/// ```
/// use mz_tile::dither::apply_bayer_8x8;
/// assert_eq!(apply_bayer_8x8(0, 3, 5, 4.0), 0);
/// assert_eq!(apply_bayer_8x8(255, 3, 5, 4.0), 255);
/// ```
#[must_use]
#[inline(always)]
pub fn apply_bayer_8x8(value: u8, x: u32, y: u32, levels: f32) -> u8 {
    if !(2..=253).contains(&value) {
        return value;
    }
    let bayer_val = f32::from(BAYER_8X8[(y % 8) as usize][(x % 8) as usize]);
    let threshold = (bayer_val / 64.0) - 0.5;
    let base_val = f32::from(value) / 255.0;
    let dithered = (base_val + threshold * (1.0 / levels.max(2.0))).clamp(0.0, 1.0);
    (dithered * 255.0).round() as u8
}

/// Quantizer à seuil ordonné : Bayer 8×8 par canal, puis plus proche couleur.
///
/// `levels` is the number of steps per channel the noise is sized for; the
/// default palette has 4 (0, 85, 170, 255 in the gray ramp).
#[derive(Clone, Copy, Debug)]
pub struct OrderedBayer {
    /// Paliers par canal.
    pub levels: f32,
}

impl Default for OrderedBayer {
    fn default() -> Self {
        Self { levels: 4.0 }
    }
}

impl Quantizer for OrderedBayer {
    fn quantize(&self, frame: &RgbFrame, table: &DiffusionTable) -> IndexGrid {
        let mut grid = IndexGrid::new(frame.width, frame.height);
        for y in 0..frame.height {
            for x in 0..frame.width {
                let (r, g, b) = frame.pixel(x, y);
                let want = [r, g, b].map(|c| i32::from(apply_bayer_8x8(c, x, y, self.levels)));
                grid.set(x, y, nearest_index(table, want));
            }
        }
        grid
    }

    fn name(&self) -> &'static str {
        "bayer"
    }
}
