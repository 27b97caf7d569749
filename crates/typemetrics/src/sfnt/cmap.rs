//! Character to glyph mapping (cmap table, format 4)
//!
//! Only the Windows Unicode BMP subtable (platform 3, encoding 1) in
//! format 4 is supported; anything else fails the font load.

use crate::reader::ByteReader;
use crate::{FontError, Result};

/// One glyph-index range of a format-4 subtable
#[derive(Debug, Clone, Copy)]
pub struct CmapSegment {
    pub start: u16,
    pub end: u16,
    pub id_delta: i16,
    pub id_range_offset: u16,
    pub index: u16,
}

/// Parsed format-4 character map
#[derive(Debug, Clone)]
pub struct CmapTable {
    seg_count: u16,
    /// Ordered by strictly ascending `end`
    segments: Vec<CmapSegment>,
    glyph_id_array: Vec<u16>,
}

impl CmapTable {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let version = r.read_u16()?;
        if version != 0 {
            return Err(FontError::UnsupportedVersion {
                table: "cmap",
                version: version as f32,
            });
        }
        let num_tables = r.read_u16()?;

        let mut subtable_offset = None;
        for _ in 0..num_tables {
            let platform_id = r.read_u16()?;
            let encoding_id = r.read_u16()?;
            let offset = r.read_u32()?;
            if platform_id == 3 && encoding_id == 1 {
                subtable_offset = Some(offset as usize);
            }
        }
        let offset = subtable_offset.ok_or(FontError::MissingCmapSubtable)?;
        if offset >= data.len() {
            return Err(FontError::Truncated);
        }
        Self::parse_format4(&data[offset..])
    }

    fn parse_format4(data: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let format = r.read_u16()?;
        if format != 4 {
            return Err(FontError::UnsupportedFormat {
                table: "cmap",
                format,
            });
        }
        let length = r.read_u16()? as usize;
        let _language = r.read_u16()?;
        let seg_count = r.read_u16()? / 2;
        // search range, entry selector, range shift
        r.skip(6)?;

        let mut ends = Vec::with_capacity(seg_count as usize);
        for _ in 0..seg_count {
            ends.push(r.read_u16()?);
        }
        let _reserved_pad = r.read_u16()?;
        let mut starts = Vec::with_capacity(seg_count as usize);
        for _ in 0..seg_count {
            starts.push(r.read_u16()?);
        }
        let mut deltas = Vec::with_capacity(seg_count as usize);
        for _ in 0..seg_count {
            deltas.push(r.read_i16()?);
        }
        let mut range_offsets = Vec::with_capacity(seg_count as usize);
        for _ in 0..seg_count {
            range_offsets.push(r.read_u16()?);
        }

        let segments = (0..seg_count as usize)
            .map(|i| CmapSegment {
                start: starts[i],
                end: ends[i],
                id_delta: deltas[i],
                id_range_offset: range_offsets[i],
                index: i as u16,
            })
            .collect();

        // The glyph id array fills the rest of the subtable length.
        let remaining = length.min(data.len()).saturating_sub(r.pos()) / 2;
        let mut glyph_id_array = Vec::with_capacity(remaining);
        for _ in 0..remaining {
            glyph_id_array.push(r.read_u16()?);
        }

        Ok(Self {
            seg_count,
            segments,
            glyph_id_array,
        })
    }

    /// Resolve a BMP character code to a glyph index; 0 for unmapped.
    ///
    /// Segments are scanned in ascending `end` order until the first
    /// segment that could contain the code. Delta arithmetic wraps at
    /// 16 bits as the format requires.
    pub fn glyph_index(&self, code: u16) -> u16 {
        let segment = match self.segments.iter().find(|s| s.end >= code) {
            Some(s) => *s,
            None => return 0,
        };
        if segment.start > code {
            return 0;
        }

        if segment.id_range_offset == 0 {
            return (segment.id_delta as i32 + code as i32) as u16;
        }

        let id_index = -(self.seg_count as i32)
            + segment.index as i32
            + (segment.id_range_offset / 2) as i32
            + (code - segment.start) as i32;
        if id_index < 0 {
            return 0;
        }
        match self.glyph_id_array.get(id_index as usize) {
            Some(&0) | None => 0,
            Some(&glyph) => glyph.wrapping_add(segment.id_delta as u16),
        }
    }
}
