use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use mz_core::config::{DitherMode, LayerConfig, load_config};

/// image2mzm — convertit une image en layer MZM3 (glyphe + couleur par cellule).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    pub input: PathBuf,

    /// Fichier MZM de sortie.
    pub output: PathBuf,

    /// Largeur du layer en cellules [défaut : 80].
    #[arg(long)]
    pub width: Option<u16>,

    /// Hauteur du layer en cellules [défaut : 25].
    #[arg(long)]
    pub height: Option<u16>,

    /// Largeur d'un caractère en pixels [défaut : 8].
    #[arg(long)]
    pub char_width: Option<u32>,

    /// Hauteur d'un caractère en pixels [défaut : 14].
    #[arg(long)]
    pub char_height: Option<u32>,

    /// Palette 48 octets (16 × RGB 6 bits) pour l'appariement des couleurs.
    #[arg(long)]
    pub palette: Option<PathBuf>,

    /// Gradient de glyphes séparés par des virgules, du plus clair au plus dense
    /// [défaut : 176,177,178,219].
    #[arg(long)]
    pub chars: Option<String>,

    /// Tramage : floyd-steinberg ou bayer [défaut : floyd-steinberg].
    #[arg(long)]
    pub dither: Option<String>,

    /// Fichier de configuration TOML (section [layer]).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Logs de debug.
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Logs informatifs.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Log level selected by `--debug` / `--verbose`. `--debug` wins.
    #[must_use]
    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else if self.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        }
    }

    /// Resolve the effective configuration: defaults, then `--config`, then
    /// explicit flags.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be loaded or `--dither`
    /// names an unknown mode.
    pub fn resolve_config(&self) -> Result<LayerConfig> {
        let mut config = match self.config.as_deref() {
            Some(path) => load_config(path)?,
            None => LayerConfig::default(),
        };

        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.height {
            config.height = v;
        }
        if let Some(v) = self.char_width {
            config.char_width = v;
        }
        if let Some(v) = self.char_height {
            config.char_height = v;
        }
        if let Some(ref v) = self.palette {
            config.palette = Some(v.clone());
        }
        if let Some(ref v) = self.chars {
            config.chars.clone_from(v);
        }
        if let Some(ref name) = self.dither {
            config.dither = DitherMode::from_name(name).ok_or_else(|| {
                anyhow::anyhow!("Tramage inconnu '{name}' (floyd-steinberg, bayer)")
            })?;
        }
        Ok(config)
    }
}
