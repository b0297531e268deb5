use crate::InodeKind;
use anyhow::{anyhow, Context, Result};

#[derive(Debug, Default)]
pub struct RecordWriter {
    data: Vec<u8>,
}

impl RecordWriter {
    pub fn u8(&mut self, val: u8) {
        self.data.push(val);
    }

    pub fn u32(&mut self, val: u32) {
        self.data.extend_from_slice(&val.to_be_bytes());
    }

    pub fn u64(&mut self, val: u64) {
        self.data.extend_from_slice(&val.to_be_bytes());
    }

    pub fn bytes(&mut self, val: &[u8]) {
        self.data.extend_from_slice(val);
    }

    /// Writes a name prefixed with its length
    pub fn name(&mut self, name: &str) -> Result<()> {
        let len = u8::try_from(name.len()).with_context(|| format!("name too long: {:?}", name))?;

        self.u8(len);
        self.bytes(name.as_bytes());

        Ok(())
    }

    pub fn kind(&mut self, kind: InodeKind) {
        self.u8(if kind == InodeKind::Directory { 0 } else { 1 })
    }

    pub fn finish(self) -> Vec<u8> {
        self.data
    }
}

#[derive(Debug)]
pub struct RecordReader<'a> {
    data: &'a [u8],
    len: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, len: 0 }
    }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let out = self
            .data
            .get(self.len..)
            .and_then(|rest| rest.get(..n))
            .with_context(|| format!("unexpected end of dump at byte {}", self.len))?;

        self.len += n;

        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.bytes(1)?[0])
    }

    pub fn u32(&mut self) -> Result<u32> {
        let bytes = self.bytes(4)?;

        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn u64(&mut self) -> Result<u64> {
        let mut buf = [0; 8];

        buf.copy_from_slice(self.bytes(8)?);

        Ok(u64::from_be_bytes(buf))
    }

    pub fn name(&mut self) -> Result<String> {
        let len = self.u8()?;
        let bytes = self.bytes(len as usize)?;

        String::from_utf8(bytes.to_vec()).context("name is not valid UTF-8")
    }

    pub fn kind(&mut self) -> Result<InodeKind> {
        match self.u8()? {
            0 => Ok(InodeKind::Directory),
            1 => Ok(InodeKind::File),
            kind => Err(anyhow!("unknown inode kind: {}", kind)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len >= self.data.len()
    }
}
