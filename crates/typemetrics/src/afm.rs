//! Type-1 font metrics from Adobe Font Metrics (AFM) files
//!
//! Line-oriented key matching, no full grammar: known keys populate
//! the model, anything unrecognized or malformed is skipped silently.
//! AFM metrics are always expressed on a 1000 units-per-em grid.

use std::path::Path;

use crate::font::{BoundingBox, Font};
use crate::Result;

/// Units per em for all AFM metrics
const AFM_UNITS_PER_EM: u16 = 1000;

/// Map an AFM `Weight` token to the 100-900 numeric scale; anything
/// unrecognized is normal weight.
pub(crate) fn weight_from_name(name: &str) -> u16 {
    match name.trim().to_ascii_lowercase().as_str() {
        "thin" => 100,
        "extra-light" | "extralight" => 200,
        "light" => 300,
        "normal" | "regular" => 400,
        "medium" => 500,
        "semi-bold" | "semibold" | "demi-bold" | "demibold" => 600,
        "bold" => 700,
        "extra-bold" | "extrabold" | "ultra-bold" | "ultrabold" => 800,
        "black" | "heavy" => 900,
        _ => 400,
    }
}

/// A Type-1 font described by its AFM metrics.
///
/// Standard-14 metrics only: there is no embedded font program, so
/// character codes index the width table directly, kerning is absent
/// and mapping/subsetting are no-ops.
pub struct Type1Font {
    file_name: String,
    font_name: String,
    family_name: String,
    weight: u16,
    bold: bool,
    italic: bool,
    fixed_pitch: bool,
    underline_position: i32,
    underline_thickness: i32,
    bbox: BoundingBox,
    cap_height: i32,
    x_height: i32,
    ascender: i32,
    descender: i32,
    first_char: u16,
    last_char: u16,
    /// Widths for `[first_char, last_char]`, index = code - first_char
    widths: Vec<u16>,
    average_width: i32,
    max_width: i32,
}

impl Type1Font {
    /// Read an AFM file whole and parse it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::parse(&text, file_name))
    }

    /// Parse AFM text. Never fails: unknown and malformed lines are
    /// ignored and missing metrics stay zero.
    pub fn parse(text: &str, file_name: impl Into<String>) -> Self {
        let mut font = Self {
            file_name: file_name.into(),
            font_name: String::new(),
            family_name: String::new(),
            weight: 400,
            bold: false,
            italic: false,
            fixed_pitch: false,
            underline_position: 0,
            underline_thickness: 0,
            bbox: BoundingBox::default(),
            cap_height: 0,
            x_height: 0,
            ascender: 0,
            descender: 0,
            first_char: 0,
            last_char: 0,
            widths: Vec::new(),
            average_width: 0,
            max_width: 0,
        };

        // per-code widths while scanning; trimmed to the seen range at
        // the end
        let mut code_widths = [0u16; 256];
        let mut first: Option<u16> = None;
        let mut last: Option<u16> = None;
        let mut width_sum: i64 = 0;
        let mut width_count: i64 = 0;

        for line in text.lines() {
            let line = line.trim();
            let (key, rest) = match line.split_once(char::is_whitespace) {
                Some((key, rest)) => (key, rest.trim()),
                None => (line, ""),
            };
            match key {
                "FontName" => font.font_name = rest.to_string(),
                "FamilyName" => font.family_name = rest.to_string(),
                "Weight" => {
                    font.weight = weight_from_name(rest);
                    font.bold = font.weight >= 600;
                }
                "ItalicAngle" => {
                    if let Ok(angle) = rest.parse::<f32>() {
                        font.italic = angle != 0.0;
                    }
                }
                "IsFixedPitch" => font.fixed_pitch = rest == "true",
                "UnderlinePosition" => parse_int(rest, &mut font.underline_position),
                "UnderlineThickness" => parse_int(rest, &mut font.underline_thickness),
                "CapHeight" => parse_int(rest, &mut font.cap_height),
                "XHeight" => parse_int(rest, &mut font.x_height),
                "Ascender" => parse_int(rest, &mut font.ascender),
                "Descender" => parse_int(rest, &mut font.descender),
                "FontBBox" => {
                    let mut parts = rest.split_whitespace().map(str::parse::<i32>);
                    if let (Some(Ok(l)), Some(Ok(b)), Some(Ok(r)), Some(Ok(t))) =
                        (parts.next(), parts.next(), parts.next(), parts.next())
                    {
                        font.bbox = BoundingBox {
                            left: l,
                            bottom: b,
                            right: r,
                            top: t,
                        };
                    }
                }
                "EndCharMetrics" => break,
                "C" => {
                    if let Some((code, width)) = parse_char_metric(line) {
                        code_widths[code as usize] = width;
                        first = Some(first.map_or(code, |f| f.min(code)));
                        last = Some(last.map_or(code, |l| l.max(code)));
                        width_sum += width as i64;
                        width_count += 1;
                        font.max_width = font.max_width.max(width as i32);
                    }
                }
                _ => {} // unrecognized lines are not an error
            }
        }

        if let (Some(first), Some(last)) = (first, last) {
            font.first_char = first;
            font.last_char = last;
            font.widths = code_widths[first as usize..=last as usize].to_vec();
        }
        if width_count > 0 {
            font.average_width = (width_sum / width_count) as i32;
        }
        font
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn is_fixed_pitch(&self) -> bool {
        self.fixed_pitch
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    pub fn first_char(&self) -> u16 {
        self.first_char
    }

    pub fn last_char(&self) -> u16 {
        self.last_char
    }
}

fn parse_int(text: &str, slot: &mut i32) {
    if let Ok(value) = text.trim().parse::<f32>() {
        *slot = value as i32;
    }
}

/// Parse a `C <code> ; WX <width> ; ...` character-metric line.
/// Codes outside 0-255 (notably -1 for unencoded glyphs) are skipped.
fn parse_char_metric(line: &str) -> Option<(u16, u16)> {
    let mut code: Option<i32> = None;
    let mut width: Option<i32> = None;
    for part in line.split(';') {
        let mut tokens = part.split_whitespace();
        match tokens.next() {
            Some("C") => code = tokens.next().and_then(|t| t.parse().ok()),
            Some("WX") => width = tokens.next().and_then(|t| t.parse().ok()),
            _ => {}
        }
    }
    match (code, width) {
        (Some(code @ 0..=255), Some(width @ 0..)) => Some((code as u16, width as u16)),
        _ => None,
    }
}

impl Font for Type1Font {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn postscript_name(&self) -> &str {
        &self.font_name
    }

    fn family_name(&self) -> &str {
        &self.family_name
    }

    fn is_bold(&self) -> bool {
        self.bold
    }

    fn is_italic(&self) -> bool {
        self.italic
    }

    fn units_per_em(&self) -> u16 {
        AFM_UNITS_PER_EM
    }

    fn ascender(&self) -> i32 {
        self.ascender
    }

    fn descender(&self) -> i32 {
        self.descender
    }

    fn x_height(&self) -> i32 {
        self.x_height
    }

    fn cap_height(&self) -> i32 {
        self.cap_height
    }

    fn line_gap(&self) -> i32 {
        0
    }

    fn underline_position(&self) -> i32 {
        self.underline_position
    }

    fn underline_thickness(&self) -> i32 {
        self.underline_thickness
    }

    fn average_width(&self) -> i32 {
        self.average_width
    }

    fn max_width(&self) -> i32 {
        self.max_width
    }

    fn char_width(&mut self, c: char) -> u16 {
        let code = c as u32;
        if code < self.first_char as u32 || code > self.last_char as u32 {
            return 0;
        }
        self.widths
            .get((code - self.first_char as u32) as usize)
            .copied()
            .unwrap_or(0)
    }

    /// The standard-14 model carries no kern data
    fn kern_adjustment(&mut self, _left: char, _right: char) -> i32 {
        0
    }

    /// No embedded program to subset, so nothing to record
    fn map_character(&mut self, _c: char) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
StartFontMetrics 4.1
FontName Helvetica
FamilyName Helvetica
Weight Medium
ItalicAngle 0
IsFixedPitch false
FontBBox -166 -225 1000 931
UnderlinePosition -100
UnderlineThickness 50
CapHeight 718
XHeight 523
Ascender 718
Descender -207
StartCharMetrics 3
C 32 ; WX 278 ; N space ; B 0 0 0 0 ;
C 65 ; WX 667 ; N A ; B 14 0 654 718 ;
C 66 ; WX 667 ; N B ; B 74 0 627 718 ;
EndCharMetrics
EndFontMetrics
";

    #[test]
    fn test_parse_names_and_metrics() {
        let font = Type1Font::parse(SAMPLE, "Helvetica.afm");
        assert_eq!(font.postscript_name(), "Helvetica");
        assert_eq!(font.family_name(), "Helvetica");
        assert_eq!(font.cap_height(), 718);
        assert_eq!(font.x_height(), 523);
        assert_eq!(font.ascender(), 718);
        assert_eq!(font.descender(), -207);
        assert_eq!(font.underline_position(), -100);
        assert_eq!(font.underline_thickness(), 50);
        assert_eq!(font.units_per_em(), 1000);
        assert_eq!(
            font.bounding_box(),
            BoundingBox {
                left: -166,
                bottom: -225,
                right: 1000,
                top: 931
            }
        );
    }

    #[test]
    fn test_width_table_range() {
        let mut font = Type1Font::parse(SAMPLE, "Helvetica.afm");
        assert_eq!(font.first_char(), 32);
        assert_eq!(font.last_char(), 66);
        assert_eq!(font.char_width(' '), 278);
        assert_eq!(font.char_width('A'), 667);
        // covered by the range but never declared
        assert_eq!(font.char_width('!'), 0);
        // outside the range
        assert_eq!(font.char_width('z'), 0);
    }

    #[test]
    fn test_average_and_max_width() {
        let font = Type1Font::parse(SAMPLE, "Helvetica.afm");
        assert_eq!(font.average_width(), (278 + 667 + 667) / 3);
        assert_eq!(font.max_width(), 667);
    }

    #[test]
    fn test_weight_table() {
        assert_eq!(weight_from_name("Bold"), 700);
        assert_eq!(weight_from_name("Heavy"), 900);
        assert_eq!(weight_from_name("black"), 900);
        assert_eq!(weight_from_name("Demi-Bold"), 600);
        assert_eq!(weight_from_name("Regular"), 400);
        assert_eq!(weight_from_name("Oblique-ish"), 400);
    }

    #[test]
    fn test_bold_italic_flags() {
        let text = "Weight Bold\nItalicAngle 0\n";
        let font = Type1Font::parse(text, "test.afm");
        assert!(font.is_bold());
        assert!(!font.is_italic());
        assert_eq!(font.weight(), 700);

        let text = "Weight Light\nItalicAngle -12\n";
        let font = Type1Font::parse(text, "test.afm");
        assert!(!font.is_bold());
        assert!(font.is_italic());
    }

    #[test]
    fn test_malformed_lines_ignored() {
        let text = "FontName\nWeight\nCapHeight abc\nC xx ; WX 100 ;\nNoSuchKey 1 2 3\n";
        let font = Type1Font::parse(text, "test.afm");
        assert_eq!(font.cap_height(), 0);
        assert_eq!(font.first_char(), 0);
        assert_eq!(font.last_char(), 0);
    }

    #[test]
    fn test_unencoded_glyphs_skipped() {
        let text = "C -1 ; WX 500 ; N dotlessi ;\nC 97 ; WX 444 ; N a ;\n";
        let mut font = Type1Font::parse(text, "test.afm");
        assert_eq!(font.first_char(), 97);
        assert_eq!(font.last_char(), 97);
        assert_eq!(font.char_width('a'), 444);
    }

    #[test]
    fn test_kerning_and_mapping_are_noops() {
        let mut font = Type1Font::parse(SAMPLE, "Helvetica.afm");
        assert_eq!(font.kern_adjustment('A', 'V'), 0);
        font.map_character('A');
        let fragments = font.kern("AB", 0, 2);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "AB");
        assert_eq!(fragments[0].adjust, 0);
    }
}
