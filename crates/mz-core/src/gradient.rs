use crate::error::MzmError;

/// Gradient par défaut : trames CP437 ░ ▒ ▓ puis bloc plein █.
pub const DEFAULT_CHARS: &str = "176,177,178,219";

/// Ordered glyph codes, lightest → densest.
///
/// # Example
/// ```
/// use mz_core::gradient::GlyphGradient;
/// let g = GlyphGradient::parse("176,177,178,219").unwrap();
/// assert_eq!(g.glyph_for_ratio(1.0), 219);
/// assert_eq!(g.glyph_for_ratio(0.0), 176);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphGradient {
    glyphs: Vec<u8>,
}

impl Default for GlyphGradient {
    fn default() -> Self {
        Self {
            glyphs: vec![176, 177, 178, 219],
        }
    }
}

impl GlyphGradient {
    /// Parse a comma-separated list of glyph codes.
    ///
    /// # Errors
    /// `MzmError::InvalidGradient` on a non-numeric or out-of-range token, or
    /// when the list has fewer than 2 entries.
    ///
    /// # Example
    /// ```
    /// use mz_core::gradient::GlyphGradient;
    /// assert!(GlyphGradient::parse("1").is_err());
    /// assert!(GlyphGradient::parse("32,x").is_err());
    /// assert_eq!(GlyphGradient::parse(" 32, 219 ").unwrap().glyphs(), &[32, 219]);
    /// ```
    pub fn parse(list: &str) -> Result<Self, MzmError> {
        let glyphs = list
            .split(',')
            .map(|tok| {
                let tok = tok.trim();
                tok.parse::<u8>().map_err(|_| {
                    MzmError::InvalidGradient(format!("« {tok} » n'est pas un code 0-255"))
                })
            })
            .collect::<Result<Vec<u8>, MzmError>>()?;

        Self::from_glyphs(glyphs)
    }

    /// Build from an explicit glyph list.
    ///
    /// # Errors
    /// `MzmError::InvalidGradient` if fewer than 2 glyphs are given.
    pub fn from_glyphs(glyphs: Vec<u8>) -> Result<Self, MzmError> {
        if glyphs.len() < 2 {
            return Err(MzmError::InvalidGradient(format!(
                "{} entrée(s), au moins 2 requises",
                glyphs.len()
            )));
        }
        Ok(Self { glyphs })
    }

    /// Glyph codes in order.
    #[must_use]
    pub fn glyphs(&self) -> &[u8] {
        &self.glyphs
    }

    /// Number of glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false: a gradient holds at least 2 glyphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Gradient position for a dominance ratio in [0, 1].
    ///
    /// `round(ratio * (len - 1))`, half-to-even, clamped into range.
    #[inline]
    #[must_use]
    pub fn index_for_ratio(&self, ratio: f64) -> usize {
        let last = self.glyphs.len() - 1;
        let pos = (ratio * last as f64).round_ties_even();
        if pos.is_nan() || pos <= 0.0 {
            0
        } else {
            (pos as usize).min(last)
        }
    }

    /// Glyph for a dominance ratio in [0, 1].
    #[inline]
    #[must_use]
    pub fn glyph_for_ratio(&self, ratio: f64) -> u8 {
        self.glyphs[self.index_for_ratio(ratio)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_entry_is_rejected() {
        assert!(matches!(
            GlyphGradient::parse("1"),
            Err(MzmError::InvalidGradient(_))
        ));
    }

    #[test]
    fn garbage_and_empty_tokens_are_rejected() {
        for list in ["", "176,,219", "a,b", "176,256", "-1,2"] {
            assert!(
                matches!(GlyphGradient::parse(list), Err(MzmError::InvalidGradient(_))),
                "{list:?} accepté"
            );
        }
    }

    #[test]
    fn default_matches_default_chars() {
        assert_eq!(
            GlyphGradient::parse(DEFAULT_CHARS).unwrap(),
            GlyphGradient::default()
        );
    }

    #[test]
    fn ratio_mapping_rounds_half_to_even() {
        let g = GlyphGradient::default();
        // 0.5 * 3 = 1.5 → 2
        assert_eq!(g.index_for_ratio(0.5), 2);
        assert_eq!(g.index_for_ratio(1.0), 3);

        let five = GlyphGradient::parse("1,2,3,4,5").unwrap();
        // 0.625 * 4 = 2.5 → 2, 0.375 * 4 = 1.5 → 2
        assert_eq!(five.index_for_ratio(0.625), 2);
        assert_eq!(five.index_for_ratio(0.375), 2);
    }

    #[test]
    fn ratio_mapping_is_clamped_and_monotonic() {
        let g = GlyphGradient::parse("1,2,3,4,5").unwrap();
        assert_eq!(g.index_for_ratio(-0.5), 0);
        assert_eq!(g.index_for_ratio(7.0), 4);
        let mut prev = 0;
        for i in 0..=100 {
            let idx = g.index_for_ratio(f64::from(i) / 100.0);
            assert!(idx >= prev, "non monotone à {i}");
            prev = idx;
        }
    }
}
