use thiserror::Error;

/// Errors originating from the conversion pipeline.
///
/// Every variant is fatal: the CLI reports it and exits non-zero.
#[derive(Error, Debug)]
pub enum MzmError {
    /// Palette file missing, shorter than 48 bytes, or with a channel above 63.
    #[error("Palette invalide : {0}")]
    MalformedPalette(String),

    /// Glyph gradient list could not be parsed or has fewer than 2 entries.
    #[error("Gradient de glyphes invalide : {0}")]
    InvalidGradient(String),

    /// The input image could not be opened or decoded.
    #[error("Impossible de décoder {path} : {reason}")]
    ImageDecode {
        /// Path of the offending image.
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// A cell with zero area (or a histogram holding no pixels).
    #[error("Cellule dégénérée : {width}×{height}")]
    DegenerateCell {
        /// Cell width in pixels.
        width: u32,
        /// Cell height in pixels.
        height: u32,
    },

    /// Invalid grid or pixel dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// An MZM file read back from disk does not match the layer format.
    #[error("Fichier MZM invalide : {0}")]
    MalformedMzm(String),

    /// Underlying I/O failure (output write, palette read).
    #[error("Erreur d'entrée/sortie : {0}")]
    Io(#[from] std::io::Error),
}
