//! Polymorphic font contract and shared metric math
//!
//! Both font backends ([`crate::TrueTypeFont`], [`crate::Type1Font`])
//! expose their metrics through the [`Font`] trait. Raw accessors
//! return font units; the `*_at` accessors scale by
//! `font_size / units_per_em` into device units.

use crate::subset::FontSubsetter;
use crate::Result;

/// Bounding box in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
    pub top: i32,
}

/// A contiguous run of text with the kerning adjustment that applies
/// at its start.
///
/// Fragments returned by [`Font::kern`] concatenate back to the input
/// range exactly; the first fragment's `adjust` is always 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernFragment {
    pub text: String,
    pub adjust: i32,
}

/// Scale a font-unit value to device units, truncating toward zero
pub(crate) fn scale(value: i32, font_size: f64, units_per_em: u16) -> i32 {
    (value as f64 * font_size / units_per_em as f64) as i32
}

/// Scale a font-unit value to device units, rounding half away from zero
pub(crate) fn scale_round(value: i32, font_size: f64, units_per_em: u16) -> i32 {
    (value as f64 * font_size / units_per_em as f64).round() as i32
}

/// Shared contract over TrueType and Type-1 fonts.
///
/// Width and kerning lookups take `&mut self`: the TrueType backend
/// memoizes glyph indices on first use, and that cache doubles as the
/// record of mapped characters handed to the subsetter. A `Font` is
/// exclusively owned by its user; there is no internal locking.
pub trait Font {
    fn file_name(&self) -> &str;
    fn postscript_name(&self) -> &str;
    fn family_name(&self) -> &str;
    fn is_bold(&self) -> bool;
    fn is_italic(&self) -> bool;

    fn units_per_em(&self) -> u16;

    /// Ascender in font units
    fn ascender(&self) -> i32;
    /// Descender in font units (negative below the baseline)
    fn descender(&self) -> i32;
    fn x_height(&self) -> i32;
    fn cap_height(&self) -> i32;
    fn line_gap(&self) -> i32;
    /// Top of the underline stroke, in font units
    fn underline_position(&self) -> i32;
    fn underline_thickness(&self) -> i32;
    fn average_width(&self) -> i32;
    fn max_width(&self) -> i32;

    /// Advance width of a character in font units
    fn char_width(&mut self, c: char) -> u16;

    /// Kerning adjustment between two characters in font units; 0 when
    /// no pair exists
    fn kern_adjustment(&mut self, left: char, right: char) -> i32;

    /// Record that a character will appear in output (input to the
    /// subsetting step)
    fn map_character(&mut self, c: char);

    /// Shrink the font to its mapped characters through an external
    /// subsetter and reload parsed state from the produced buffer.
    ///
    /// Metrics-only fonts carry no embedded program; for those the
    /// call is accepted and does nothing.
    fn subset(&mut self, _subsetter: &dyn FontSubsetter) -> Result<()> {
        Ok(())
    }

    fn ascender_at(&self, font_size: f64) -> i32 {
        scale(self.ascender(), font_size, self.units_per_em())
    }

    fn descender_at(&self, font_size: f64) -> i32 {
        scale_round(self.descender(), font_size, self.units_per_em())
    }

    fn x_height_at(&self, font_size: f64) -> i32 {
        scale(self.x_height(), font_size, self.units_per_em())
    }

    fn cap_height_at(&self, font_size: f64) -> i32 {
        scale(self.cap_height(), font_size, self.units_per_em())
    }

    fn average_width_at(&self, font_size: f64) -> i32 {
        scale(self.average_width(), font_size, self.units_per_em())
    }

    fn max_width_at(&self, font_size: f64) -> i32 {
        scale(self.max_width(), font_size, self.units_per_em())
    }

    /// Ascent plus descent plus line gap, scaled
    fn default_line_spacing_at(&self, font_size: f64) -> i32 {
        let units = self.ascender() - self.descender() + self.line_gap();
        scale(units, font_size, self.units_per_em())
    }

    /// Center of the underline stroke, scaled and clamped below the
    /// baseline.
    ///
    /// Never returns more than -1, so the stroke keeps at least one
    /// device unit of separation even for degenerate metrics.
    fn underline_position_at(&self, font_size: f64) -> i32 {
        let center = self.underline_position() as f64 - self.underline_thickness() as f64 / 2.0;
        let scaled = (center * font_size / self.units_per_em() as f64) as i32;
        scaled.min(-1)
    }

    fn underline_thickness_at(&self, font_size: f64) -> f64 {
        self.underline_thickness() as f64 * font_size / self.units_per_em() as f64
    }

    /// Split `text[start..end]` (character indices) into kerning runs.
    ///
    /// A new fragment opens at every pair with a nonzero adjustment;
    /// the fragment carries that adjustment and starts at the right
    /// character of the pair. Concatenating the fragments reproduces
    /// the input range exactly.
    fn kern(&mut self, text: &str, start: usize, end: usize) -> Vec<KernFragment> {
        let chars: Vec<char> = text.chars().collect();
        let end = end.min(chars.len());
        let mut fragments = Vec::new();
        if start >= end {
            return fragments;
        }

        let mut frag_start = start;
        let mut frag_adjust = 0i32;
        for i in start..end - 1 {
            let adjust = self.kern_adjustment(chars[i], chars[i + 1]);
            if adjust != 0 {
                fragments.push(KernFragment {
                    text: chars[frag_start..=i].iter().collect(),
                    adjust: frag_adjust,
                });
                frag_start = i + 1;
                frag_adjust = adjust;
            }
        }
        fragments.push(KernFragment {
            text: chars[frag_start..end].iter().collect(),
            adjust: frag_adjust,
        });
        fragments
    }

    /// Kerned length of `text[start..end]` at `font_size`.
    ///
    /// The summed font-unit widths are multiplied by the size and the
    /// fragment adjustments are then added raw. Kerning values carry a
    /// negative sense, so adding them removes space.
    fn text_length(&mut self, text: &str, start: usize, end: usize, font_size: f64) -> i32 {
        let chars: Vec<char> = text.chars().collect();
        let end = end.min(chars.len());
        if start >= end {
            return 0;
        }

        let mut width = 0i64;
        for &c in &chars[start..end] {
            width += self.char_width(c) as i64;
        }
        let mut total = (width as f64 * font_size) as i64;
        for fragment in self.kern(text, start, end) {
            total += fragment.adjust as i64;
        }
        total as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_truncates_toward_zero() {
        assert_eq!(scale(1500, 10.0, 1000), 15);
        assert_eq!(scale(1999, 1.0, 1000), 1);
        assert_eq!(scale(-1999, 1.0, 1000), -1);
    }

    #[test]
    fn test_scale_round_half_away_from_zero() {
        assert_eq!(scale_round(1500, 1.0, 1000), 2);
        assert_eq!(scale_round(-1500, 1.0, 1000), -2);
        assert_eq!(scale_round(1400, 1.0, 1000), 1);
    }
}
