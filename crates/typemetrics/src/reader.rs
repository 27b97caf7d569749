//! Binary reader for font data

use crate::{FontError, Result};

/// Big-endian binary reader with bounds checking
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Get current position
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Set position
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Skip bytes
    pub fn skip(&mut self, n: usize) -> Result<()> {
        if self.pos + n > self.data.len() {
            return Err(FontError::Truncated);
        }
        self.pos += n;
        Ok(())
    }

    /// Remaining bytes
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Read u8
    pub fn read_u8(&mut self) -> Result<u8> {
        if self.pos >= self.data.len() {
            return Err(FontError::Truncated);
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    /// Read big-endian u16
    pub fn read_u16(&mut self) -> Result<u16> {
        if self.pos + 2 > self.data.len() {
            return Err(FontError::Truncated);
        }
        let v = u16::from_be_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(v)
    }

    /// Read big-endian i16
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Read big-endian u32
    pub fn read_u32(&mut self) -> Result<u32> {
        if self.pos + 4 > self.data.len() {
            return Err(FontError::Truncated);
        }
        let v = u32::from_be_bytes([
            self.data[self.pos],
            self.data[self.pos + 1],
            self.data[self.pos + 2],
            self.data[self.pos + 3],
        ]);
        self.pos += 4;
        Ok(v)
    }

    /// Read big-endian i64 (longDateTime: seconds since 1904-01-01)
    pub fn read_long_date_time(&mut self) -> Result<i64> {
        let hi = self.read_u32()? as i64;
        let lo = self.read_u32()? as i64;
        Ok((hi << 32) | lo)
    }

    /// Read the legacy 16.16 "Fixed" type.
    ///
    /// The fractional half is combined as the reciprocal of the second
    /// u16 (not the canonical `frac / 65536`); a zero fractional word
    /// contributes nothing. Table loads depend on this exact rule.
    pub fn read_fixed(&mut self) -> Result<f32> {
        let whole = self.read_u16()?;
        let frac = self.read_u16()?;
        if frac == 0 {
            Ok(whole as f32)
        } else {
            Ok(whole as f32 + 1.0 / frac as f32)
        }
    }

    /// Read a two-u16 version and combine it as the decimal `major.minor`.
    ///
    /// `maxp` 1.0 arrives as `[0,1, 0,0]`; the minor word is appended
    /// textually, so a minor of 10 reads as `.10`.
    pub fn read_fixed_version(&mut self) -> Result<f32> {
        let major = self.read_u16()?;
        let minor = self.read_u16()?;
        let text = format!("{}.{}", major, minor);
        // Both halves are decimal u16s, so the text always parses.
        Ok(text.parse::<f32>().unwrap_or(major as f32))
    }

    /// Read 4-byte tag
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        if self.pos + 4 > self.data.len() {
            return Err(FontError::Truncated);
        }
        let tag = [
            self.data[self.pos],
            self.data[self.pos + 1],
            self.data[self.pos + 2],
            self.data[self.pos + 3],
        ];
        self.pos += 4;
        Ok(tag)
    }

    /// Read a fixed-length ASCII string (one byte per character)
    pub fn read_string_ascii(&mut self, len: usize) -> Result<String> {
        if self.pos + len > self.data.len() {
            return Err(FontError::Truncated);
        }
        let s = self.data[self.pos..self.pos + len]
            .iter()
            .map(|&b| b as char)
            .collect();
        self.pos += len;
        Ok(s)
    }

    /// Read a fixed-byte-length UCS-2 string (two bytes per character,
    /// big-endian)
    pub fn read_string_ucs2(&mut self, byte_len: usize) -> Result<String> {
        let mut s = String::with_capacity(byte_len / 2);
        let mut read = 0;
        while read + 2 <= byte_len {
            let unit = self.read_u16()?;
            s.push(char::from_u32(unit as u32).unwrap_or('\u{fffd}'));
            read += 2;
        }
        Ok(s)
    }

    /// Read bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(FontError::Truncated);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u16() {
        let data = [0x12, 0x34, 0x56, 0x78];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u16().unwrap(), 0x5678);
    }

    #[test]
    fn test_read_i16_negative() {
        let data = [0xFF, 0x88]; // -120
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_i16().unwrap(), -120);
    }

    #[test]
    fn test_read_u32() {
        let data = [0x00, 0x01, 0x00, 0x00];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u32().unwrap(), 0x10000);
    }

    #[test]
    fn test_read_tag() {
        let data = b"headtest";
        let mut reader = ByteReader::new(data);
        assert_eq!(reader.read_tag().unwrap(), *b"head");
    }

    #[test]
    fn test_read_past_end() {
        let data = [0x00];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(reader.read_u16(), Err(FontError::Truncated)));
    }

    #[test]
    fn test_read_fixed_reciprocal() {
        // whole = 2, frac = 4 -> 2 + 1/4
        let data = [0x00, 0x02, 0x00, 0x04];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_fixed().unwrap(), 2.25);
    }

    #[test]
    fn test_read_fixed_zero_fraction() {
        let data = [0x00, 0x01, 0x00, 0x00];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_fixed().unwrap(), 1.0);
    }

    #[test]
    fn test_read_fixed_version() {
        let data = [0x00, 0x01, 0x00, 0x00];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_fixed_version().unwrap(), 1.0);

        let data = [0x00, 0x02, 0x00, 0x05];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_fixed_version().unwrap(), 2.5);
    }

    #[test]
    fn test_read_long_date_time() {
        let data = [0, 0, 0, 0, 0, 0, 0, 0x2A];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_long_date_time().unwrap(), 42);
    }

    #[test]
    fn test_read_string_ascii() {
        let data = b"cmap";
        let mut reader = ByteReader::new(data);
        assert_eq!(reader.read_string_ascii(4).unwrap(), "cmap");
    }

    #[test]
    fn test_read_string_ucs2() {
        let data = [0x00, 0x41, 0x00, 0x42];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_string_ucs2(4).unwrap(), "AB");
    }
}
