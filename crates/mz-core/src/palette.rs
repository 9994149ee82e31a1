use std::io::Read;
use std::path::Path;

use crate::error::MzmError;

/// Nombre de couleurs logiques d'une palette MZX.
pub const PALETTE_COLORS: usize = 16;

/// Taille exacte d'un fichier palette : 16 triplets RGB 6 bits.
pub const PALETTE_FILE_LEN: usize = PALETTE_COLORS * 3;

/// Entrées de la Diffusion Table (16 répétitions de la palette).
pub const DIFFUSION_ENTRIES: usize = 256;

/// Plus grande valeur de canal en profondeur 6 bits.
pub const MAX_CHANNEL_6BIT: u8 = 63;

/// Palette texte par défaut, canaux 6 bits.
pub const DEFAULT_PALETTE: [[u8; 3]; PALETTE_COLORS] = [
    [0, 0, 0],
    [0, 0, 42],
    [0, 42, 0],
    [0, 42, 42],
    [42, 0, 0],
    [42, 0, 42],
    [42, 21, 0],
    [42, 42, 42],
    [21, 21, 21],
    [21, 21, 63],
    [21, 63, 21],
    [21, 63, 63],
    [63, 21, 21],
    [63, 21, 63],
    [63, 63, 21],
    [63, 63, 63],
];

/// Palette source : 16 couleurs, canaux dans [0, 63].
///
/// # Example
/// ```
/// use mz_core::palette::Palette;
/// let pal = Palette::default();
/// assert_eq!(pal.colors()[15], [63, 63, 63]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: [[u8; 3]; PALETTE_COLORS],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE,
        }
    }
}

impl Palette {
    /// Resolve the palette: built-in default when `source` is `None`,
    /// otherwise the first 48 bytes of the file.
    ///
    /// # Errors
    /// `MzmError::MalformedPalette` if the file cannot be opened, holds fewer
    /// than 48 bytes, or has a channel above 63.
    pub fn load(source: Option<&Path>) -> Result<Self, MzmError> {
        let Some(path) = source else {
            log::debug!("Palette par défaut");
            return Ok(Self::default());
        };

        let file = std::fs::File::open(path).map_err(|e| {
            MzmError::MalformedPalette(format!("{} : {e}", path.display()))
        })?;
        let mut bytes = Vec::with_capacity(PALETTE_FILE_LEN);
        file.take(PALETTE_FILE_LEN as u64)
            .read_to_end(&mut bytes)
            .map_err(|e| MzmError::MalformedPalette(format!("{} : {e}", path.display())))?;
        log::debug!("{} : {} octets de palette lus", path.display(), bytes.len());

        Self::from_bytes(&bytes)
    }

    /// Group 48 raw bytes into 16 RGB triples. Trailing bytes are ignored.
    ///
    /// # Errors
    /// `MzmError::MalformedPalette` if fewer than 48 bytes are given or a
    /// channel exceeds the 6-bit range.
    ///
    /// # Example
    /// ```
    /// use mz_core::palette::Palette;
    /// assert!(Palette::from_bytes(&[0u8; 30]).is_err());
    /// let pal = Palette::from_bytes(&[21u8; 48]).unwrap();
    /// assert_eq!(pal.colors()[7], [21, 21, 21]);
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MzmError> {
        if bytes.len() < PALETTE_FILE_LEN {
            return Err(MzmError::MalformedPalette(format!(
                "{} octets, {PALETTE_FILE_LEN} attendus",
                bytes.len()
            )));
        }

        let mut colors = [[0u8; 3]; PALETTE_COLORS];
        for (i, (slot, rgb)) in colors
            .iter_mut()
            .zip(bytes[..PALETTE_FILE_LEN].chunks_exact(3))
            .enumerate()
        {
            if let Some(&v) = rgb.iter().find(|&&v| v > MAX_CHANNEL_6BIT) {
                return Err(MzmError::MalformedPalette(format!(
                    "couleur {i} : canal {v} hors de [0, {MAX_CHANNEL_6BIT}]"
                )));
            }
            slot.copy_from_slice(rgb);
        }
        Ok(Self { colors })
    }

    /// The 16 source colors.
    #[must_use]
    pub fn colors(&self) -> &[[u8; 3]; PALETTE_COLORS] {
        &self.colors
    }

    /// Upscale every channel from 6 to 8 bits.
    #[must_use]
    pub fn expand(&self) -> ExpandedPalette {
        let mut colors = [[0u8; 3]; PALETTE_COLORS];
        for (dst, src) in colors.iter_mut().zip(&self.colors) {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = expand_channel(s);
            }
        }
        ExpandedPalette { colors }
    }
}

/// 6-bit → 8-bit channel upscale, `v*4 + v/16`.
///
/// Maps 0 → 0 and 63 → 255, spreading the low bits back into the bottom.
///
/// # Example
/// ```
/// use mz_core::palette::expand_channel;
/// assert_eq!(expand_channel(0), 0);
/// assert_eq!(expand_channel(42), 170);
/// assert_eq!(expand_channel(63), 255);
/// ```
#[inline(always)]
#[must_use]
pub fn expand_channel(v: u8) -> u8 {
    debug_assert!(v <= MAX_CHANNEL_6BIT);
    v * 4 + v / 16
}

/// Palette 16 couleurs, canaux 8 bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedPalette {
    colors: [[u8; 3]; PALETTE_COLORS],
}

impl ExpandedPalette {
    /// The 16 expanded colors.
    #[must_use]
    pub fn colors(&self) -> &[[u8; 3]; PALETTE_COLORS] {
        &self.colors
    }

    /// Repeat the palette 16 times into a 256-entry quantization table.
    ///
    /// # Example
    /// ```
    /// use mz_core::palette::Palette;
    /// let table = Palette::default().expand().diffusion_table();
    /// assert_eq!(table.entries().len(), 256);
    /// assert_eq!(table.entries()[16 + 9], table.entries()[9]);
    /// ```
    #[must_use]
    pub fn diffusion_table(&self) -> DiffusionTable {
        let mut entries = [[0u8; 3]; DIFFUSION_ENTRIES];
        for (i, slot) in entries.iter_mut().enumerate() {
            *slot = self.colors[i % PALETTE_COLORS];
        }
        DiffusionTable { entries }
    }
}

/// Table de quantification 256 entrées, identiques par groupes de 16.
///
/// Index `i` always denotes logical color `i % 16`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffusionTable {
    entries: [[u8; 3]; DIFFUSION_ENTRIES],
}

impl DiffusionTable {
    /// All 256 RGB entries.
    #[must_use]
    pub fn entries(&self) -> &[[u8; 3]; DIFFUSION_ENTRIES] {
        &self.entries
    }

    /// Logical palette color (0-15) of a table index.
    #[inline(always)]
    #[must_use]
    pub fn logical_color(index: u8) -> u8 {
        index % PALETTE_COLORS as u8
    }
}
