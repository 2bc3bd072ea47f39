/// A forward-only reader over a byte slice which refuses to read into a
/// reserved region at the end of the slice.
pub struct ByteReader<'a> {
    input: &'a [u8],

    byte_offset: usize,

    /// Index of the first reserved byte. Reads never cross it.
    limit: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader over `input` with the last `reserved` bytes
    /// off limits. Returns [`None`] if the input is shorter than the
    /// reserved region.
    pub fn new(input: &'a [u8], reserved: usize) -> Option<Self> {
        let limit = input.len().checked_sub(reserved)?;

        Some(Self {
            input,
            byte_offset: 0,
            limit,
        })
    }

    /// Get the current offset of the reader
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Bytes left before the reserved region
    pub fn remaining(&self) -> usize {
        self.limit - self.byte_offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Option<u8> {
        let [byte] = self.read::<1>()?;
        Some(byte)
    }

    /// Read exactly `N` bytes, or nothing at all if fewer remain
    pub fn read<const N: usize>(&mut self) -> Option<[u8; N]> {
        if self.remaining() < N {
            return None;
        }

        let mut out = [0u8; N];
        out.copy_from_slice(&self.input[self.byte_offset..self.byte_offset + N]);
        self.byte_offset += N;

        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::ByteReader;

    #[test]
    fn stops_at_reserved_region() {
        let data = [1, 2, 3, 4, 5];
        let mut reader = ByteReader::new(&data, 2).unwrap();

        assert_eq!(reader.read::<2>(), Some([1, 2]));
        assert_eq!(reader.read::<2>(), None);
        // A failed read consumes nothing
        assert_eq!(reader.byte_offset(), 2);
        assert_eq!(reader.read_u8(), Some(3));
        assert!(reader.is_exhausted());
        assert_eq!(reader.read_u8(), None);
    }

    #[test]
    fn input_shorter_than_reserved() {
        assert!(ByteReader::new(&[0; 7], 8).is_none());
        assert!(ByteReader::new(&[0; 8], 8).unwrap().is_exhausted());
    }
}
