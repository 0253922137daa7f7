use super::error::{SerError, SerKind, SerResult};

/// Cursor over a byte slice providing structured reads with error context.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new cursor over the provided byte slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// The number of bytes remaining in the cursor.
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    /// Read exactly `len` bytes from the cursor.
    pub fn read_exact(
        &mut self,
        len: usize,
        kind: SerKind,
        field: &'static str,
    ) -> SerResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(SerError::unexpected_end(kind, field));
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.bytes[start..start + len])
    }

    /// Read a fixed-size byte array from the cursor.
    pub fn read_array<const N: usize>(
        &mut self,
        kind: SerKind,
        field: &'static str,
    ) -> SerResult<[u8; N]> {
        let bytes = self.read_exact(N, kind, field)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

impl<'a> From<&'a [u8]> for ByteReader<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ByteReader::new(bytes)
    }
}
