/// Moteur de réduction image → layer MZM.
///
/// Quantizes a pixel frame against the Diffusion Table, then reduces each
/// cell's index histogram to one glyph and one packed color byte.
pub mod dither;
pub mod layer;
pub mod quantize;
pub mod reduce;
