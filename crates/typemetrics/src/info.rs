//! Metadata-only font probe
//!
//! Directory scanners need family/face/style flags for every file in
//! a font folder without paying for a full parse. The probe sniffs the
//! container (SFNT magic vs the AFM `StartFontMetrics` signature) and
//! reads only the tables or lines that carry naming and style bits.

use std::path::Path;

use crate::afm::weight_from_name;
use crate::reader::ByteReader;
use crate::sfnt::tables::{NameTable, Os2Table};
use crate::{FontError, Result};

/// Container format of a probed file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontType {
    TrueType,
    Type1,
}

/// Lightweight font metadata for directory scanning
#[derive(Debug, Clone)]
pub struct FontInfo {
    pub family_name: String,
    pub face_name: String,
    pub file_name: String,
    pub font_type: FontType,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
}

/// Probe a font file on disk
pub fn probe(path: impl AsRef<Path>) -> Result<FontInfo> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    probe_bytes(&data, file_name)
}

/// Probe an in-memory buffer. `UnknownFormat` means "not a font this
/// engine reads", which scanners treat as skip-this-file.
pub fn probe_bytes(data: &[u8], file_name: impl Into<String>) -> Result<FontInfo> {
    let file_name = file_name.into();
    if data.len() >= 4 {
        let version = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        if version == 0x00010000 || version == 0x74727565 {
            return probe_sfnt(data, file_name);
        }
    }
    if data.starts_with(b"StartFontMetrics") {
        return probe_afm(data, file_name);
    }
    Err(FontError::UnknownFormat)
}

/// Read just the table directory, `name` and OS/2; no glyph or
/// kerning data is touched.
fn probe_sfnt(data: &[u8], file_name: String) -> Result<FontInfo> {
    let mut r = ByteReader::new(data);
    let _version = r.read_u32()?;
    let num_tables = r.read_u16()?;
    let _search_range = r.read_u16()?;
    let _entry_selector = r.read_u16()?;
    let _range_shift = r.read_u16()?;

    let mut name_slice = None;
    let mut os2_slice = None;
    for _ in 0..num_tables {
        let tag = r.read_tag()?;
        let _checksum = r.read_u32()?;
        let offset = r.read_u32()? as usize;
        let length = r.read_u32()? as usize;
        let end = offset.saturating_add(length);
        if end > data.len() {
            continue;
        }
        match &tag {
            b"name" => name_slice = Some(&data[offset..end]),
            b"OS/2" => os2_slice = Some(&data[offset..end]),
            _ => {}
        }
    }

    let name = NameTable::parse(name_slice.ok_or(FontError::TableNotFound("name"))?)?;
    let os2 = Os2Table::parse(os2_slice.ok_or(FontError::TableNotFound("OS/2"))?)?;

    let face_name = if name.full_name.is_empty() {
        name.subfamily_name.clone()
    } else {
        name.full_name.clone()
    };
    let info = FontInfo {
        family_name: name.family_name,
        face_name,
        file_name,
        font_type: FontType::TrueType,
        bold: os2.is_bold(),
        italic: os2.is_italic(),
        underline: os2.is_underscored(),
        strikeout: os2.is_strikeout(),
    };
    tracing::debug!(family = %info.family_name, "probed TrueType font");
    Ok(info)
}

/// Scan header lines only; the width section is never reached
fn probe_afm(data: &[u8], file_name: String) -> Result<FontInfo> {
    let text = std::str::from_utf8(data).map_err(|_| FontError::BadAfmHeader)?;

    let mut family_name = String::new();
    let mut face_name = String::new();
    let mut bold = false;
    let mut italic = false;
    for line in text.lines() {
        let (key, rest) = match line.trim().split_once(char::is_whitespace) {
            Some((key, rest)) => (key, rest.trim()),
            None => (line.trim(), ""),
        };
        match key {
            "FamilyName" => family_name = rest.to_string(),
            "FontName" => face_name = rest.to_string(),
            "FullName" => face_name = rest.to_string(),
            "Weight" => bold = weight_from_name(rest) >= 600,
            "ItalicAngle" => italic = rest.parse::<f32>().map(|a| a != 0.0).unwrap_or(false),
            "StartCharMetrics" => break,
            _ => {}
        }
    }

    let info = FontInfo {
        family_name,
        face_name,
        file_name,
        font_type: FontType::Type1,
        bold,
        italic,
        underline: false,
        strikeout: false,
    };
    tracing::debug!(family = %info.family_name, "probed AFM font");
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_afm() {
        let afm = b"StartFontMetrics 4.1\nFontName Times-Bold\nFullName Times Bold\n\
FamilyName Times\nWeight Bold\nItalicAngle 0\nStartCharMetrics 1\nC 32 ; WX 250 ;\n";
        let info = probe_bytes(afm, "Times-Bold.afm").unwrap();
        assert_eq!(info.font_type, FontType::Type1);
        assert_eq!(info.family_name, "Times");
        assert_eq!(info.face_name, "Times Bold");
        assert!(info.bold);
        assert!(!info.italic);
        assert!(!info.underline);
    }

    #[test]
    fn test_probe_unknown_format() {
        assert!(matches!(
            probe_bytes(b"%PDF-1.7 not a font", "doc.pdf"),
            Err(FontError::UnknownFormat)
        ));
        assert!(matches!(
            probe_bytes(b"", "empty"),
            Err(FontError::UnknownFormat)
        ));
    }
}
