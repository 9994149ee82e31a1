use crate::frame::{IndexGrid, RgbFrame};
use crate::palette::DiffusionTable;

/// Réduit une frame RGB en indices de la Diffusion Table.
///
/// Implémenté par : `NearestColor`, `FloydSteinberg`, `OrderedBayer`.
///
/// # Example
/// ```
/// use mz_core::traits::Quantizer;
/// use mz_core::frame::{IndexGrid, RgbFrame};
/// use mz_core::palette::DiffusionTable;
///
/// struct Zero;
/// impl Quantizer for Zero {
///     fn quantize(&self, frame: &RgbFrame, _table: &DiffusionTable) -> IndexGrid {
///         IndexGrid::new(frame.width, frame.height)
///     }
///     fn name(&self) -> &'static str { "zero" }
/// }
/// ```
pub trait Quantizer {
    /// Produit une grille d'indices de mêmes dimensions que `frame`.
    ///
    /// CONTRAT : chaque index désigne une entrée de `table` ; seule sa
    /// valeur modulo 16 porte une couleur.
    fn quantize(&self, frame: &RgbFrame, table: &DiffusionTable) -> IndexGrid;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}
