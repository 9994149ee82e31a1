/// Types partagés, palette, gradient et configuration pour image2mzm.
///
/// This crate holds every type that crosses a crate boundary in the
/// workspace: pixel/index buffers, the MZM layer, the palette chain and
/// the `Quantizer` seam.

pub mod config;
pub mod error;
pub mod frame;
pub mod gradient;
pub mod palette;
pub mod traits;

pub use config::{DitherMode, Geometry, LayerConfig};
pub use error::MzmError;
pub use frame::{IndexGrid, Layer, RgbFrame, TileCell};
pub use gradient::GlyphGradient;
pub use palette::{DiffusionTable, ExpandedPalette, Palette};
pub use traits::Quantizer;
