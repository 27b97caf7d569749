//! External subsetting boundary
//!
//! Subsetting itself is an OS-level operation outside this crate. The
//! engine's part of the contract is to accumulate the set of mapped
//! characters (the glyph cache keys) and to reload parsed state from
//! whatever buffer the subsetter produces.

use std::collections::BTreeSet;

use crate::Result;

/// Produces a reduced font buffer containing only the given
/// characters' glyphs.
///
/// Implementations wrap a platform call or an external tool; the
/// returned buffer must itself be a parseable SFNT font.
pub trait FontSubsetter {
    fn subset(&self, data: &[u8], keep: &BTreeSet<char>) -> Result<Vec<u8>>;
}
