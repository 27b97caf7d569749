//! Pairwise kerning (kern table, format 0)

use crate::reader::ByteReader;
use crate::Result;

/// A glyph pair with its font-unit adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernPair {
    pub left: u16,
    pub right: u16,
    pub value: i16,
}

impl KernPair {
    /// Sort/search key: left glyph in the high half, right in the low
    fn key(left: u16, right: u16) -> u32 {
        (left as u32) << 16 | right as u32
    }
}

/// One format-0 subtable: pairs ordered ascending by packed key
#[derive(Debug, Clone)]
pub struct KernSubtable {
    pairs: Vec<KernPair>,
}

impl KernSubtable {
    fn adjustment(&self, left: u16, right: u16) -> Option<i16> {
        let key = KernPair::key(left, right);
        self.pairs
            .binary_search_by_key(&key, |p| KernPair::key(p.left, p.right))
            .ok()
            .map(|i| self.pairs[i].value)
    }
}

/// Parsed kern table; empty when the font carries none
#[derive(Debug, Clone, Default)]
pub struct KernTable {
    subtables: Vec<KernSubtable>,
}

impl KernTable {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let _version = r.read_u16()?;
        let n_tables = r.read_u16()?;

        let mut subtables = Vec::new();
        for _ in 0..n_tables {
            let subtable_start = r.pos();
            let _sub_version = r.read_u16()?;
            let length = r.read_u16()? as usize;
            let coverage = r.read_u16()?;
            let format = coverage >> 8;

            if format == 0 {
                let n_pairs = r.read_u16()?;
                // search range, entry selector, range shift
                r.skip(6)?;
                let mut pairs = Vec::with_capacity(n_pairs as usize);
                for _ in 0..n_pairs {
                    pairs.push(KernPair {
                        left: r.read_u16()?,
                        right: r.read_u16()?,
                        value: r.read_i16()?,
                    });
                }
                subtables.push(KernSubtable { pairs });
            }
            // Other formats carry state-machine or 2D-array data this
            // engine does not use; their length field skips them.
            let next = subtable_start + length.max(6);
            if next <= subtable_start + 6 || next > data.len() {
                break;
            }
            r.set_pos(next);
        }

        Ok(Self { subtables })
    }

    /// Adjustment for a glyph pair: the first subtable with a nonzero
    /// match wins; 0 when no subtable has one.
    pub fn adjustment(&self, left: u16, right: u16) -> i16 {
        for subtable in &self.subtables {
            match subtable.adjustment(left, right) {
                Some(value) if value != 0 => return value,
                _ => {}
            }
        }
        0
    }

    pub fn is_empty(&self) -> bool {
        self.subtables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serialize a kern table with one format-0 subtable. Pairs must
    /// already be ordered by packed key.
    fn kern_bytes(pairs: &[(u16, u16, i16)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_be_bytes()); // version
        data.extend_from_slice(&1u16.to_be_bytes()); // n tables
        data.extend_from_slice(&0u16.to_be_bytes()); // subtable version
        let length = 14 + pairs.len() * 6;
        data.extend_from_slice(&(length as u16).to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes()); // coverage: format 0
        data.extend_from_slice(&(pairs.len() as u16).to_be_bytes());
        data.extend_from_slice(&[0; 6]); // search metadata
        for &(left, right, value) in pairs {
            data.extend_from_slice(&left.to_be_bytes());
            data.extend_from_slice(&right.to_be_bytes());
            data.extend_from_slice(&value.to_be_bytes());
        }
        data
    }

    #[test]
    fn test_pair_lookup() {
        let table = KernTable::parse(&kern_bytes(&[(36, 57, -120), (36, 58, -80)])).unwrap();
        assert_eq!(table.adjustment(36, 57), -120);
        assert_eq!(table.adjustment(36, 58), -80);
        assert_eq!(table.adjustment(57, 36), 0);
    }

    #[test]
    fn test_missing_pair_is_zero() {
        let table = KernTable::parse(&kern_bytes(&[(1, 2, -50)])).unwrap();
        assert_eq!(table.adjustment(1, 3), 0);
        assert_eq!(table.adjustment(0, 0), 0);
    }

    #[test]
    fn test_empty_table() {
        let table = KernTable::default();
        assert_eq!(table.adjustment(1, 2), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_non_format0_subtable_skipped() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&1u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes()); // subtable version
        data.extend_from_slice(&8u16.to_be_bytes()); // length
        data.extend_from_slice(&(2u16 << 8).to_be_bytes()); // coverage: format 2
        data.extend_from_slice(&[0; 2]);
        let table = KernTable::parse(&data).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.adjustment(1, 2), 0);
    }
}
