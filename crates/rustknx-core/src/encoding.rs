use crate::error::FrameError;

/// Bounds-checked cursor over a received byte buffer.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8, FrameError> {
        let byte = self
            .buf
            .get(self.pos)
            .copied()
            .ok_or(FrameError::Truncated)?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_be_u16(&mut self) -> Result<u16, FrameError> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], FrameError> {
        if self.remaining() < len {
            return Err(FrameError::Truncated);
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..start + len])
    }
}

/// Bounds-checked writer into a caller-supplied buffer.
#[derive(Debug)]
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn as_written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), FrameError> {
        self.write_all(&[value])
    }

    pub fn write_be_u16(&mut self, value: u16) -> Result<(), FrameError> {
        self.write_all(&value.to_be_bytes())
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), FrameError> {
        let end = self.pos + data.len();
        if end > self.buf.len() {
            return Err(FrameError::BufferTooSmall);
        }
        self.buf[self.pos..end].copy_from_slice(data);
        self.pos = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Reader, Writer};
    use crate::error::FrameError;

    #[test]
    fn reader_reads_and_bounds() {
        let mut r = Reader::new(&[0x11, 0x22, 0x33]);
        assert_eq!(r.read_u8().unwrap(), 0x11);
        assert_eq!(r.read_be_u16().unwrap(), 0x2233);
        assert!(r.is_empty());
        assert_eq!(r.read_u8().unwrap_err(), FrameError::Truncated);
    }

    #[test]
    fn writer_writes_and_bounds() {
        let mut buf = [0u8; 3];
        let mut w = Writer::new(&mut buf);
        w.write_u8(0x11).unwrap();
        w.write_be_u16(0x2233).unwrap();
        assert_eq!(w.as_written(), &[0x11, 0x22, 0x33]);
        assert_eq!(w.write_u8(0x44).unwrap_err(), FrameError::BufferTooSmall);
    }
}
