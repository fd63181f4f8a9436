use crate::error::DecodeError;

// A bounds checked sequential reader over a map file held in memory.
// Every read goes through read_bytes, so nothing can run past the end of the
// buffer and nothing is ever silently truncated.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    // Move to an absolute position. The end of the buffer itself is a valid position.
    pub fn seek(&mut self, pos: usize) -> Result<(), DecodeError> {
        if pos > self.data.len() {
            return Err(DecodeError::OutOfBounds {
                pos,
                len: self.data.len(),
            });
        }

        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        let end = self.window_end(n)?;
        self.pos = end;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.window_end(n)?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    // Read a fixed size window into an owned array, so it can be decrypted in place
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut result = [0u8; N];
        result.copy_from_slice(self.read_bytes(N)?);
        Ok(result)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    // End offset of an n byte window at the current position, if it fits
    fn window_end(&self, n: usize) -> Result<usize, DecodeError> {
        match self.pos.checked_add(n) {
            Some(end) if end <= self.data.len() => Ok(end),
            _ => Err(DecodeError::UnexpectedEnd {
                pos: self.pos,
                wanted: n,
                len: self.data.len(),
            }),
        }
    }
}
