//! SFNT table definitions
//!
//! Each table parses from its own byte slice. Loaders that depend on
//! fields of earlier tables (`post` on the glyph count, `hmtx` on the
//! metric count) take those values as explicit parameters so every
//! loader stays independently testable against a synthetic buffer.

use crate::font::BoundingBox;
use crate::reader::ByteReader;
use crate::{FontError, Result};

/// head table (font header)
#[derive(Debug, Clone)]
pub struct HeadTable {
    pub font_revision: f32,
    pub flags: u16,
    pub units_per_em: u16,
    pub created: i64,
    pub modified: i64,
    pub bbox: BoundingBox,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub index_to_loc_format: i16,
}

impl HeadTable {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let _version = r.read_fixed_version()?;
        let font_revision = r.read_fixed()?;
        let _checksum_adjustment = r.read_u32()?;
        let _magic = r.read_u32()?;
        let flags = r.read_u16()?;
        let units_per_em = r.read_u16()?;
        let created = r.read_long_date_time()?;
        let modified = r.read_long_date_time()?;
        let x_min = r.read_i16()?;
        let y_min = r.read_i16()?;
        let x_max = r.read_i16()?;
        let y_max = r.read_i16()?;
        let mac_style = r.read_u16()?;
        let lowest_rec_ppem = r.read_u16()?;
        let _font_direction_hint = r.read_i16()?;
        let index_to_loc_format = r.read_i16()?;

        Ok(Self {
            font_revision,
            flags,
            units_per_em,
            created,
            modified,
            bbox: BoundingBox {
                left: x_min as i32,
                bottom: y_min as i32,
                right: x_max as i32,
                top: y_max as i32,
            },
            mac_style,
            lowest_rec_ppem,
            index_to_loc_format,
        })
    }
}

/// hhea table (horizontal header)
#[derive(Debug, Clone)]
pub struct HheaTable {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_width_max: u16,
    pub number_of_h_metrics: u16,
}

impl HheaTable {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let _version = r.read_fixed_version()?;
        let ascender = r.read_i16()?;
        let descender = r.read_i16()?;
        let line_gap = r.read_i16()?;
        let advance_width_max = r.read_u16()?;
        // min side bearings, extent, caret slope/offset, reserved,
        // metric data format
        r.skip(22)?;
        let number_of_h_metrics = r.read_u16()?;

        Ok(Self {
            ascender,
            descender,
            line_gap,
            advance_width_max,
            number_of_h_metrics,
        })
    }
}

/// maxp table (maximum profile), version 1.0 only
#[derive(Debug, Clone)]
pub struct MaxpTable {
    pub num_glyphs: u16,
}

impl MaxpTable {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let version = r.read_fixed_version()?;
        if version != 1.0 {
            return Err(FontError::UnsupportedVersion {
                table: "maxp",
                version,
            });
        }
        let num_glyphs = r.read_u16()?;
        Ok(Self { num_glyphs })
    }
}

/// post table (PostScript metadata), versions 2.0 and 3.0 only
#[derive(Debug, Clone)]
pub struct PostTable {
    pub version: f32,
    pub italic_angle: f32,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: bool,
}

impl PostTable {
    pub fn parse(data: &[u8], num_glyphs: u16) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let version = r.read_fixed_version()?;
        if version != 2.0 && version != 3.0 {
            return Err(FontError::UnsupportedVersion {
                table: "post",
                version,
            });
        }
        let italic_angle = r.read_fixed()?;
        let underline_position = r.read_i16()?;
        let underline_thickness = r.read_i16()?;
        let is_fixed_pitch = r.read_u32()? != 0;
        // min/max memory usage for type 42 and type 1
        r.skip(16)?;
        if version == 2.0 {
            let name_count = r.read_u16()?;
            // Glyph name indices; the count tracks maxp's glyph count.
            r.skip(name_count.min(num_glyphs) as usize * 2)?;
        }

        Ok(Self {
            version,
            italic_angle,
            underline_position,
            underline_thickness,
            is_fixed_pitch,
        })
    }
}

/// OS/2 table (Windows metrics), versions 0 through 5.
///
/// The field block ends where the table's own version says it ends;
/// the version-2 extras (x-height, cap height, default/break char,
/// max context) only exist from version 2 up.
#[derive(Debug, Clone)]
pub struct Os2Table {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub weight_class: u16,
    pub width_class: u16,
    pub fs_type: u16,
    pub strikeout_size: i16,
    pub strikeout_position: i16,
    pub fs_selection: u16,
    pub first_char_index: u16,
    pub last_char_index: u16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    pub win_ascent: u16,
    pub win_descent: u16,
    pub x_height: i16,
    cap_height: i16,
    pub default_char: u16,
    pub break_char: u16,
    pub max_context: u16,
}

impl Os2Table {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let version = r.read_u16()?;
        let x_avg_char_width = r.read_i16()?;
        let weight_class = r.read_u16()?;
        let width_class = r.read_u16()?;
        let fs_type = r.read_u16()?;
        // subscript/superscript size and offset
        r.skip(16)?;
        let strikeout_size = r.read_i16()?;
        let strikeout_position = r.read_i16()?;
        let _family_class = r.read_i16()?;
        // panose classification
        r.skip(10)?;
        // ulUnicodeRange1..4
        r.skip(16)?;
        let _vend_id = r.read_tag()?;
        let fs_selection = r.read_u16()?;
        let first_char_index = r.read_u16()?;
        let last_char_index = r.read_u16()?;
        let typo_ascender = r.read_i16()?;
        let typo_descender = r.read_i16()?;
        let typo_line_gap = r.read_i16()?;
        let win_ascent = r.read_u16()?;
        let win_descent = r.read_u16()?;

        let mut table = Self {
            version,
            x_avg_char_width,
            weight_class,
            width_class,
            fs_type,
            strikeout_size,
            strikeout_position,
            fs_selection,
            first_char_index,
            last_char_index,
            typo_ascender,
            typo_descender,
            typo_line_gap,
            win_ascent,
            win_descent,
            x_height: 0,
            cap_height: 0,
            default_char: 0,
            break_char: 0,
            max_context: 0,
        };

        if version >= 1 {
            // ulCodePageRange1..2
            r.skip(8)?;
        }
        if version >= 2 {
            table.x_height = r.read_i16()?;
            table.cap_height = r.read_i16()?;
            table.default_char = r.read_u16()?;
            table.break_char = r.read_u16()?;
            table.max_context = r.read_u16()?;
        }

        Ok(table)
    }

    /// Stored cap height from version 2 up; synthesized from the typo
    /// ascent span for older tables.
    pub fn cap_height(&self) -> i16 {
        if self.version >= 2 {
            self.cap_height
        } else {
            self.typo_ascender - self.typo_descender
        }
    }

    pub fn is_bold(&self) -> bool {
        self.fs_selection & 0x0020 != 0
    }

    pub fn is_italic(&self) -> bool {
        self.fs_selection & 0x0001 != 0
    }

    pub fn is_underscored(&self) -> bool {
        self.fs_selection & 0x0002 != 0
    }

    pub fn is_strikeout(&self) -> bool {
        self.fs_selection & 0x0010 != 0
    }
}

/// Common name IDs
pub mod name_ids {
    pub const FAMILY: u16 = 1;
    pub const SUBFAMILY: u16 = 2;
    pub const FULL_NAME: u16 = 4;
    pub const POSTSCRIPT_NAME: u16 = 6;
}

/// name table (format 0): the handful of naming strings the engine
/// needs, Windows entries preferred over Macintosh ones.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    pub family_name: String,
    pub subfamily_name: String,
    pub full_name: String,
    pub postscript_name: String,
}

impl NameTable {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let format = r.read_u16()?;
        if format != 0 {
            return Err(FontError::UnsupportedFormat {
                table: "name",
                format,
            });
        }
        let count = r.read_u16()?;
        let string_offset = r.read_u16()? as usize;

        let mut table = Self::default();
        for _ in 0..count {
            let platform_id = r.read_u16()?;
            let _encoding_id = r.read_u16()?;
            let _language_id = r.read_u16()?;
            let name_id = r.read_u16()?;
            let length = r.read_u16()? as usize;
            let offset = r.read_u16()? as usize;

            let slot = match name_id {
                name_ids::FAMILY => &mut table.family_name,
                name_ids::SUBFAMILY => &mut table.subfamily_name,
                name_ids::FULL_NAME => &mut table.full_name,
                name_ids::POSTSCRIPT_NAME => &mut table.postscript_name,
                _ => continue,
            };
            // Windows strings are UCS-2 and win over an earlier
            // Macintosh entry for the same id.
            if !slot.is_empty() && platform_id != 3 {
                continue;
            }

            let mut sr = ByteReader::new(data);
            sr.set_pos(string_offset + offset);
            *slot = if platform_id == 3 {
                sr.read_string_ucs2(length)?
            } else {
                sr.read_string_ascii(length)?
            };
        }

        Ok(table)
    }
}

/// Materialize the hmtx advance widths into one entry per glyph.
///
/// hmtx may carry fewer advances than glyphs, with the last advance
/// applying to every remaining glyph. Consumers index the result by
/// glyph id directly, so the tail is filled in here rather than
/// resolved per lookup.
pub fn read_widths(data: &[u8], number_of_h_metrics: u16, num_glyphs: u16) -> Result<Vec<u16>> {
    let mut r = ByteReader::new(data);
    let mut widths = Vec::with_capacity(num_glyphs as usize);
    for _ in 0..number_of_h_metrics.min(num_glyphs) {
        widths.push(r.read_u16()?);
        // left side bearing
        r.skip(2)?;
    }
    let last = widths.last().copied().unwrap_or(0);
    while widths.len() < num_glyphs as usize {
        widths.push(last);
    }
    Ok(widths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maxp_bytes(major: u16, minor: u16, num_glyphs: u16) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&major.to_be_bytes());
        data.extend_from_slice(&minor.to_be_bytes());
        data.extend_from_slice(&num_glyphs.to_be_bytes());
        data
    }

    #[test]
    fn test_maxp_version_1() {
        let data = maxp_bytes(1, 0, 97);
        let table = MaxpTable::parse(&data);
        assert_eq!(table.unwrap().num_glyphs, 97);
    }

    #[test]
    fn test_maxp_rejects_version_05() {
        let data = maxp_bytes(0, 5, 97);
        assert!(matches!(
            MaxpTable::parse(&data),
            Err(FontError::UnsupportedVersion { table: "maxp", .. })
        ));
    }

    #[test]
    fn test_widths_expand_to_glyph_count() {
        // three metrics of 600, five glyphs
        let mut data = Vec::new();
        for _ in 0..3 {
            data.extend_from_slice(&600u16.to_be_bytes());
            data.extend_from_slice(&0u16.to_be_bytes());
        }
        let widths = read_widths(&data, 3, 5).unwrap();
        assert_eq!(widths, vec![600, 600, 600, 600, 600]);
    }

    #[test]
    fn test_widths_exact_count() {
        let mut data = Vec::new();
        for w in [100u16, 200, 300] {
            data.extend_from_slice(&w.to_be_bytes());
            data.extend_from_slice(&0u16.to_be_bytes());
        }
        let widths = read_widths(&data, 3, 3).unwrap();
        assert_eq!(widths, vec![100, 200, 300]);
    }

    #[test]
    fn test_widths_empty_metrics() {
        let widths = read_widths(&[], 0, 2).unwrap();
        assert_eq!(widths, vec![0, 0]);
    }

    fn post_bytes(major: u16, minor: u16) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&major.to_be_bytes());
        data.extend_from_slice(&minor.to_be_bytes());
        data.extend_from_slice(&[0, 0, 0, 0]); // italic angle
        data.extend_from_slice(&(-125i16).to_be_bytes());
        data.extend_from_slice(&50i16.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes()); // fixed pitch
        data.extend_from_slice(&[0; 16]); // memory usage
        data
    }

    #[test]
    fn test_post_version_3() {
        let table = PostTable::parse(&post_bytes(3, 0), 10).unwrap();
        assert_eq!(table.underline_position, -125);
        assert_eq!(table.underline_thickness, 50);
        assert!(!table.is_fixed_pitch);
    }

    #[test]
    fn test_post_version_2_reads_name_indices() {
        let mut data = post_bytes(2, 0);
        data.extend_from_slice(&2u16.to_be_bytes());
        data.extend_from_slice(&[0; 4]); // two glyph name indices
        assert!(PostTable::parse(&data, 2).is_ok());
    }

    #[test]
    fn test_post_version_1_rejected() {
        assert!(matches!(
            PostTable::parse(&post_bytes(1, 0), 10),
            Err(FontError::UnsupportedVersion { table: "post", .. })
        ));
    }

    #[test]
    fn test_name_table_strings() {
        let name = b"Demo";
        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_be_bytes()); // format
        data.extend_from_slice(&1u16.to_be_bytes()); // count
        data.extend_from_slice(&18u16.to_be_bytes()); // string offset
        data.extend_from_slice(&1u16.to_be_bytes()); // platform: Macintosh
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&name_ids::FAMILY.to_be_bytes());
        data.extend_from_slice(&(name.len() as u16).to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(name);
        let table = NameTable::parse(&data).unwrap();
        assert_eq!(table.family_name, "Demo");
        assert_eq!(table.postscript_name, "");
    }

    #[test]
    fn test_os2_version_2_cap_height() {
        let mut data = vec![0u8; 96];
        data[0..2].copy_from_slice(&2u16.to_be_bytes());
        data[86..88].copy_from_slice(&520i16.to_be_bytes()); // x height
        data[88..90].copy_from_slice(&710i16.to_be_bytes()); // cap height
        let table = Os2Table::parse(&data).unwrap();
        assert_eq!(table.cap_height(), 710);
        assert_eq!(table.x_height, 520);
    }

    #[test]
    fn test_os2_version_1_synthesizes_cap_height() {
        let mut data = vec![0u8; 86];
        data[0..2].copy_from_slice(&1u16.to_be_bytes());
        data[68..70].copy_from_slice(&1500i16.to_be_bytes()); // typo ascender
        data[70..72].copy_from_slice(&(-500i16).to_be_bytes()); // typo descender
        let table = Os2Table::parse(&data).unwrap();
        assert_eq!(table.cap_height(), 2000);
    }

    #[test]
    fn test_os2_version_0_stops_short() {
        // version 0 ends after usWinDescent at offset 78
        let mut data = vec![0u8; 78];
        data[0..2].copy_from_slice(&0u16.to_be_bytes());
        assert!(Os2Table::parse(&data).is_ok());
    }
}
