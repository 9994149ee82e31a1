use mz_core::error::MzmError;
use mz_core::frame::TileCell;
use mz_core::gradient::GlyphGradient;
use mz_core::palette::DiffusionTable;

/// Bins d'un histogramme de cellule.
pub const HISTOGRAM_BINS: usize = 256;

/// Rank the 256 bins by count, descending.
///
/// Equal counts keep ascending bin order, so the lower index always wins a
/// tie.
///
/// # Example
/// ```
/// use mz_tile::reduce::rank_histogram;
/// let mut hist = [0u32; 256];
/// hist[40] = 5;
/// hist[7] = 5;
/// hist[3] = 9;
/// let ranking = rank_histogram(&hist);
/// assert_eq!(&ranking[..3], &[3, 7, 40]);
/// ```
#[must_use]
pub fn rank_histogram(hist: &[u32; HISTOGRAM_BINS]) -> [u8; HISTOGRAM_BINS] {
    let mut ranking = [0u8; HISTOGRAM_BINS];
    for (i, slot) in ranking.iter_mut().enumerate() {
        *slot = i as u8;
    }
    // sort_by_key est stable : l'ordre croissant des index départage les ex aequo.
    ranking.sort_by_key(|&i| std::cmp::Reverse(hist[i as usize]));
    ranking
}

/// Reduce one cell histogram to a glyph and a packed color byte.
///
/// The two most populated bins give the dominant and secondary colors
/// (`index % 16`). Their ratio `winner / (winner + second)` picks the glyph
/// from `gradient`. A uniform cell (empty runner-up bin) gets ratio 1 and the
/// dominant color in both nibbles.
///
/// # Errors
/// `MzmError::DegenerateCell` if the histogram holds no pixels.
///
/// # Example
/// ```
/// use mz_core::gradient::GlyphGradient;
/// use mz_tile::reduce::reduce;
/// let mut hist = [0u32; 256];
/// hist[4] = 112;
/// let cell = reduce(&hist, &GlyphGradient::default()).unwrap();
/// assert_eq!(cell.glyph, 219);
/// assert_eq!(cell.color, 4 + 4 * 16);
/// ```
pub fn reduce(
    hist: &[u32; HISTOGRAM_BINS],
    gradient: &GlyphGradient,
) -> Result<TileCell, MzmError> {
    let ranking = rank_histogram(hist);
    let (winner, second) = (ranking[0], ranking[1]);
    let winner_count = hist[winner as usize];
    let second_count = hist[second as usize];

    if winner_count == 0 {
        return Err(MzmError::DegenerateCell {
            width: 0,
            height: 0,
        });
    }

    let winner_color = DiffusionTable::logical_color(winner);
    let second_color = if second_count == 0 {
        winner_color
    } else {
        DiffusionTable::logical_color(second)
    };

    let ratio = f64::from(winner_count) / (f64::from(winner_count) + f64::from(second_count));
    let glyph = gradient.glyph_for_ratio(ratio);
    log::trace!(
        "bins {winner}:{winner_count} {second}:{second_count} ratio {ratio:.3} → glyph {glyph}"
    );

    Ok(TileCell::new(glyph, winner_color, second_color))
}
