//! typemetrics - Font Metrics Engine
//!
//! This crate provides font metrics and glyph mapping for document
//! generation:
//! - TrueType (SFNT) binary parsing (head, hhea, maxp, hmtx, cmap,
//!   kern, OS/2, post, name)
//! - Type-1 metrics from Adobe Font Metrics (AFM) text files
//! - Character to glyph-index resolution (cmap format 4)
//! - Kerning-aware text measurement
//! - A metadata-only probe for directory scanners
//!
//! Glyph outlines, hinting and OpenType layout (GSUB/GPOS) are out of
//! scope; only the metrics side of the formats is implemented.

pub mod afm;
pub mod font;
pub mod info;
pub mod reader;
pub mod sfnt;
pub mod subset;

pub use afm::Type1Font;
pub use font::{BoundingBox, Font, KernFragment};
pub use info::{FontInfo, FontType, probe, probe_bytes};
pub use reader::ByteReader;
pub use sfnt::TrueTypeFont;
pub use subset::FontSubsetter;

/// Font engine error types
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Unexpected end of font data")]
    Truncated,

    #[error("Required table not found: {0}")]
    TableNotFound(&'static str),

    #[error("Unsupported {table} version: {version}")]
    UnsupportedVersion { table: &'static str, version: f32 },

    #[error("Unsupported {table} format: {format}")]
    UnsupportedFormat { table: &'static str, format: u16 },

    #[error("No Windows Unicode BMP (3,1) cmap subtable")]
    MissingCmapSubtable,

    #[error("Not an AFM file: missing StartFontMetrics header")]
    BadAfmHeader,

    #[error("Unrecognized font file format")]
    UnknownFormat,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FontError>;
