//! TrueType (SFNT) font engine
//!
//! Parses the binary table directory and the metric tables into an
//! owned, queryable model. Tables load in dependency order because
//! later loaders consume fields of earlier ones: head (units per em)
//! feeds nothing downstream but anchors the scale, maxp supplies the
//! glyph count to post and hmtx, and hhea supplies the metric count
//! to hmtx.

pub mod cmap;
pub mod kern;
pub mod tables;

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::font::{BoundingBox, Font};
use crate::reader::ByteReader;
use crate::subset::FontSubsetter;
use crate::{FontError, Result};

use cmap::CmapTable;
use kern::KernTable;
use tables::{HeadTable, HheaTable, MaxpTable, NameTable, Os2Table, PostTable};

/// Table directory record
#[derive(Debug, Clone, Copy)]
struct TableRecord {
    tag: [u8; 4],
    offset: u32,
    length: u32,
}

/// All parsed tables of one SFNT buffer
#[derive(Debug, Clone)]
struct SfntTables {
    head: HeadTable,
    hhea: HheaTable,
    os2: Os2Table,
    post: PostTable,
    name: NameTable,
    cmap: CmapTable,
    kern: KernTable,
    num_glyphs: u16,
    /// One advance width per glyph, index = glyph id
    widths: Vec<u16>,
}

impl SfntTables {
    fn load(data: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let sfnt_version = r.read_u32()?;
        match sfnt_version {
            0x00010000 | 0x74727565 => {}
            _ => return Err(FontError::UnknownFormat),
        }
        let num_tables = r.read_u16()?;
        let _search_range = r.read_u16()?;
        let _entry_selector = r.read_u16()?;
        let _range_shift = r.read_u16()?;

        let mut records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let tag = r.read_tag()?;
            let _checksum = r.read_u32()?;
            let offset = r.read_u32()?;
            let length = r.read_u32()?;
            records.push(TableRecord {
                tag,
                offset,
                length,
            });
        }

        let head = HeadTable::parse(required(data, &records, b"head")?)?;
        let maxp = MaxpTable::parse(required(data, &records, b"maxp")?)?;
        let post = PostTable::parse(required(data, &records, b"post")?, maxp.num_glyphs)?;
        let hhea = HheaTable::parse(required(data, &records, b"hhea")?)?;
        let widths = tables::read_widths(
            required(data, &records, b"hmtx")?,
            hhea.number_of_h_metrics,
            maxp.num_glyphs,
        )?;
        let kern = match table_slice(data, &records, b"kern") {
            Some(slice) => KernTable::parse(slice)?,
            None => KernTable::default(),
        };
        let os2 = Os2Table::parse(required(data, &records, b"OS/2")?)?;
        let name = NameTable::parse(required(data, &records, b"name")?)?;
        let cmap = CmapTable::parse(required(data, &records, b"cmap")?)?;

        tracing::debug!(
            glyphs = maxp.num_glyphs,
            units_per_em = head.units_per_em,
            kerned = !kern.is_empty(),
            "loaded sfnt tables"
        );

        Ok(Self {
            head,
            hhea,
            os2,
            post,
            name,
            cmap,
            kern,
            num_glyphs: maxp.num_glyphs,
            widths,
        })
    }
}

fn find_record(records: &[TableRecord], tag: &[u8; 4]) -> Option<TableRecord> {
    records.iter().find(|t| &t.tag == tag).copied()
}

fn table_slice<'a>(data: &'a [u8], records: &[TableRecord], tag: &[u8; 4]) -> Option<&'a [u8]> {
    let record = find_record(records, tag)?;
    let start = record.offset as usize;
    let end = start.checked_add(record.length as usize)?;
    if end > data.len() {
        return None;
    }
    Some(&data[start..end])
}

fn required<'a>(
    data: &'a [u8],
    records: &[TableRecord],
    tag: &'static [u8; 4],
) -> Result<&'a [u8]> {
    table_slice(data, records, tag).ok_or(FontError::TableNotFound(
        // tags are 4 ASCII characters by construction
        std::str::from_utf8(tag).unwrap_or("????"),
    ))
}

/// A parsed TrueType font.
///
/// Owns its byte buffer and parsed tables. Glyph lookups memoize into
/// an internal character cache; that cache is also the set of mapped
/// characters supplied to [`TrueTypeFont::subset`].
pub struct TrueTypeFont {
    data: Vec<u8>,
    file_name: String,
    tables: SfntTables,
    glyph_cache: HashMap<char, u16>,
}

impl TrueTypeFont {
    /// Load a font file whole into memory and parse it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(data, file_name)
    }

    /// Parse a font from an in-memory buffer
    pub fn from_bytes(data: Vec<u8>, file_name: impl Into<String>) -> Result<Self> {
        let tables = SfntTables::load(&data)?;
        let file_name = file_name.into();
        tracing::info!(file = %file_name, "parsed TrueType font");
        Ok(Self {
            data,
            file_name,
            tables,
            glyph_cache: HashMap::new(),
        })
    }

    /// Resolve a character to its glyph index, memoized.
    ///
    /// Unmapped characters resolve to glyph 0; the miss is cached too
    /// so repeated lookups skip the segment scan.
    pub fn glyph_index(&mut self, c: char) -> u16 {
        if let Some(&glyph) = self.glyph_cache.get(&c) {
            return glyph;
        }
        let glyph = if (c as u32) <= 0xFFFF {
            self.tables.cmap.glyph_index(c as u16)
        } else {
            // format 4 covers the BMP only
            0
        };
        self.glyph_cache.insert(c, glyph);
        glyph
    }

    /// Number of glyphs in the font
    pub fn num_glyphs(&self) -> u16 {
        self.tables.num_glyphs
    }

    /// Font bounding box in font units
    pub fn bounding_box(&self) -> BoundingBox {
        self.tables.head.bbox
    }

    /// Characters that have been resolved or mapped so far
    pub fn mapped_characters(&self) -> BTreeSet<char> {
        self.glyph_cache.keys().copied().collect()
    }

    /// The raw font buffer (post-subset once [`Font::subset`] has run)
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Font for TrueTypeFont {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn postscript_name(&self) -> &str {
        &self.tables.name.postscript_name
    }

    fn family_name(&self) -> &str {
        &self.tables.name.family_name
    }

    fn is_bold(&self) -> bool {
        self.tables.os2.is_bold()
    }

    fn is_italic(&self) -> bool {
        self.tables.os2.is_italic()
    }

    fn units_per_em(&self) -> u16 {
        self.tables.head.units_per_em
    }

    fn ascender(&self) -> i32 {
        self.tables.hhea.ascender as i32
    }

    fn descender(&self) -> i32 {
        self.tables.hhea.descender as i32
    }

    fn x_height(&self) -> i32 {
        self.tables.os2.x_height as i32
    }

    fn cap_height(&self) -> i32 {
        self.tables.os2.cap_height() as i32
    }

    fn line_gap(&self) -> i32 {
        self.tables.hhea.line_gap as i32
    }

    fn underline_position(&self) -> i32 {
        self.tables.post.underline_position as i32
    }

    fn underline_thickness(&self) -> i32 {
        self.tables.post.underline_thickness as i32
    }

    fn average_width(&self) -> i32 {
        self.tables.os2.x_avg_char_width as i32
    }

    fn max_width(&self) -> i32 {
        self.tables.hhea.advance_width_max as i32
    }

    fn char_width(&mut self, c: char) -> u16 {
        let glyph = self.glyph_index(c);
        self.tables
            .widths
            .get(glyph as usize)
            .copied()
            .unwrap_or(0)
    }

    fn kern_adjustment(&mut self, left: char, right: char) -> i32 {
        if self.tables.kern.is_empty() {
            return 0;
        }
        let left = self.glyph_index(left);
        let right = self.glyph_index(right);
        self.tables.kern.adjustment(left, right) as i32
    }

    fn map_character(&mut self, c: char) {
        let _ = self.glyph_index(c);
    }

    /// Reload all parsed state from the subsetter's buffer. The glyph
    /// cache is cleared: subsetting renumbers glyphs.
    fn subset(&mut self, subsetter: &dyn FontSubsetter) -> Result<()> {
        let keep = self.mapped_characters();
        let data = subsetter.subset(&self.data, &keep)?;
        let tables = SfntTables::load(&data)?;
        tracing::info!(
            file = %self.file_name,
            kept = keep.len(),
            bytes = data.len(),
            "reloaded subset font"
        );
        self.data = data;
        self.tables = tables;
        self.glyph_cache.clear();
        Ok(())
    }
}
