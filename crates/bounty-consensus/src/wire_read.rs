use crate::error::{ErrorCode, TxError};

pub struct Reader<'a> {
    b: &'a [u8],
    off: usize,
}

impl<'a> Reader<'a> {
    pub fn new(b: &'a [u8]) -> Self {
        Self { b, off: 0 }
    }

    pub fn offset(&self) -> usize {
        self.off
    }

    pub fn remaining(&self) -> usize {
        self.b.len().saturating_sub(self.off)
    }

    pub fn is_empty(&self) -> bool {
        self.off >= self.b.len()
    }

    pub fn read_u8(&mut self) -> Result<u8, TxError> {
        let [v] = self.read_array::<1>("unexpected EOF (u8)")?;
        Ok(v)
    }

    pub fn read_u16_le(&mut self) -> Result<u16, TxError> {
        Ok(u16::from_le_bytes(self.read_array("unexpected EOF (u16le)")?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, TxError> {
        Ok(u32::from_le_bytes(self.read_array("unexpected EOF (u32le)")?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, TxError> {
        Ok(u64::from_le_bytes(self.read_array("unexpected EOF (u64le)")?))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], TxError> {
        self.take(n, "unexpected EOF (bytes)")
    }

    fn read_array<const N: usize>(&mut self, eof: &'static str) -> Result<[u8; N], TxError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, eof)?);
        Ok(out)
    }

    fn take(&mut self, n: usize, eof: &'static str) -> Result<&'a [u8], TxError> {
        let end = self
            .off
            .checked_add(n)
            .filter(|end| *end <= self.b.len())
            .ok_or(TxError::new(ErrorCode::TxErrParse, eof))?;
        let v = &self.b[self.off..end];
        self.off = end;
        Ok(v)
    }
}
