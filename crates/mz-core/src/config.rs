use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::MzmError;
use crate::gradient::DEFAULT_CHARS;

/// Backend de quantification utilisé par le Layer Builder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMode {
    /// Diffusion d'erreur 7/3/5/1.
    #[default]
    FloydSteinberg,
    /// Seuil ordonné Bayer 8×8.
    Bayer,
}

impl DitherMode {
    /// Parse a CLI name (`floyd-steinberg`, `fs`, `bayer`).
    ///
    /// # Example
    /// ```
    /// use mz_core::config::DitherMode;
    /// assert_eq!(DitherMode::from_name("bayer"), Some(DitherMode::Bayer));
    /// assert_eq!(DitherMode::from_name("none"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "floyd-steinberg" | "floyd_steinberg" | "fs" => Some(Self::FloydSteinberg),
            "bayer" | "ordered" => Some(Self::Bayer),
            _ => None,
        }
    }
}

/// Configuration complète d'une conversion.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use mz_core::config::LayerConfig;
/// let config = LayerConfig::default();
/// assert_eq!((config.width, config.height), (80, 25));
/// assert_eq!((config.char_width, config.char_height), (8, 14));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LayerConfig {
    /// Largeur du layer en cellules.
    pub width: u16,
    /// Hauteur du layer en cellules.
    pub height: u16,
    /// Largeur d'une cellule en pixels.
    pub char_width: u32,
    /// Hauteur d'une cellule en pixels.
    pub char_height: u32,
    /// Gradient de glyphes, du plus clair au plus dense.
    pub chars: String,
    /// Fichier palette 48 octets. None = palette par défaut.
    pub palette: Option<PathBuf>,
    /// Backend de quantification.
    pub dither: DitherMode,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 25,
            char_width: 8,
            char_height: 14,
            chars: DEFAULT_CHARS.to_string(),
            palette: None,
            dither: DitherMode::default(),
        }
    }
}

/// Géométrie validée : grille de cellules et taille de cellule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Width in cells.
    pub grid_width: u16,
    /// Height in cells.
    pub grid_height: u16,
    /// Cell width in pixels.
    pub cell_width: u32,
    /// Cell height in pixels.
    pub cell_height: u32,
}

impl Geometry {
    /// Validate a grid/cell combination.
    ///
    /// # Errors
    /// `MzmError::DegenerateCell` for a zero-area cell,
    /// `MzmError::InvalidDimensions` for an empty grid or a pixel size that
    /// overflows `u32`.
    ///
    /// # Example
    /// ```
    /// use mz_core::config::Geometry;
    /// let g = Geometry::new(80, 25, 8, 14).unwrap();
    /// assert_eq!(g.pixel_size(), (640, 350));
    /// assert!(Geometry::new(80, 25, 0, 14).is_err());
    /// ```
    pub fn new(
        grid_width: u16,
        grid_height: u16,
        cell_width: u32,
        cell_height: u32,
    ) -> Result<Self, MzmError> {
        if cell_width == 0 || cell_height == 0 {
            return Err(MzmError::DegenerateCell {
                width: cell_width,
                height: cell_height,
            });
        }
        if grid_width == 0 || grid_height == 0 {
            return Err(MzmError::InvalidDimensions {
                width: u32::from(grid_width),
                height: u32::from(grid_height),
            });
        }
        let overflow = u32::from(grid_width).checked_mul(cell_width).is_none()
            || u32::from(grid_height).checked_mul(cell_height).is_none();
        if overflow {
            return Err(MzmError::InvalidDimensions {
                width: cell_width,
                height: cell_height,
            });
        }
        Ok(Self {
            grid_width,
            grid_height,
            cell_width,
            cell_height,
        })
    }

    /// Pixel size of the resized image: (grid_w × cell_w, grid_h × cell_h).
    #[must_use]
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            u32::from(self.grid_width) * self.cell_width,
            u32::from(self.grid_height) * self.cell_height,
        )
    }

    /// Number of cells in the layer.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        usize::from(self.grid_width) * usize::from(self.grid_height)
    }
}

impl LayerConfig {
    /// Validate dimensions and return the geometry.
    ///
    /// # Errors
    /// See [`Geometry::new`].
    pub fn geometry(&self) -> Result<Geometry, MzmError> {
        Geometry::new(self.width, self.height, self.char_width, self.char_height)
    }
}

/// Fichier TOML, toutes sections optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    layer: Option<LayerSection>,
}

/// Layer section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct LayerSection {
    width: Option<u16>,
    height: Option<u16>,
    char_width: Option<u32>,
    char_height: Option<u32>,
    chars: Option<String>,
    palette: Option<PathBuf>,
    dither: Option<DitherMode>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// A relative `palette` path is resolved against the config file's directory.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use mz_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("image2mzm.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<LayerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    let mut config = LayerConfig::default();
    let Some(l) = file.layer else {
        log::warn!("{} : pas de section [layer], défauts utilisés", path.display());
        return Ok(config);
    };

    if let Some(v) = l.width {
        config.width = v;
    }
    if let Some(v) = l.height {
        config.height = v;
    }
    if let Some(v) = l.char_width {
        config.char_width = v;
    }
    if let Some(v) = l.char_height {
        config.char_height = v;
    }
    if let Some(v) = l.chars {
        config.chars = v;
    }
    if let Some(v) = l.palette {
        config.palette = Some(match path.parent() {
            Some(dir) if v.is_relative() => dir.join(v),
            _ => v,
        });
    }
    if let Some(v) = l.dither {
        config.dither = v;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_layer_section_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layer]\nwidth = 40\nchars = \"32,219\"\ndither = \"bayer\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.width, 40);
        assert_eq!(config.height, 25);
        assert_eq!(config.chars, "32,219");
        assert_eq!(config.dither, DitherMode::Bayer);
        assert!(config.palette.is_none());
    }

    #[test]
    fn relative_palette_resolves_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conv.toml");
        std::fs::write(&path, "[layer]\npalette = \"ega.pal\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.palette, Some(dir.path().join("ega.pal")));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layer\nwidth = ").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn zero_cell_is_degenerate() {
        let config = LayerConfig {
            char_height: 0,
            ..LayerConfig::default()
        };
        assert!(matches!(
            config.geometry(),
            Err(MzmError::DegenerateCell { width: 8, height: 0 })
        ));
    }

    #[test]
    fn zero_grid_is_invalid() {
        assert!(matches!(
            Geometry::new(0, 25, 8, 14),
            Err(MzmError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn default_geometry_is_640_by_350() {
        let g = LayerConfig::default().geometry().unwrap();
        assert_eq!(g.pixel_size(), (640, 350));
        assert_eq!(g.cell_count(), 2000);
    }
}
