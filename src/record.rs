use crate::{Inode, InodeKind, RecordReader, RecordWriter};
use anyhow::{anyhow, Context, Result};

/// Single inode in a dump.
///
/// A dump is the magic, the format version and then one record per inode in
/// pre-order; `child_count` tells how many of the following subtrees belong
/// to this inode, which is enough to rebuild the shape of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub kind: InodeKind,
    pub mode: u32,
    pub size: u64,
    pub id: u32,
    pub child_count: u32,
    pub name: String,
}

impl Record {
    pub const MAGIC: &'static [u8; 6] = b"INOFS\0";
    pub const VERSION: u8 = 1;

    pub fn from_inode(inode: &Inode) -> Result<Self> {
        Ok(Self {
            kind: inode.kind,
            mode: inode.mode,
            size: inode.size,
            id: inode.id,
            child_count: u32::try_from(inode.children.len())
                .with_context(|| format!("too many children in {:?}", inode.name))?,
            name: inode.name.clone(),
        })
    }

    pub fn encode(&self, writer: &mut RecordWriter) -> Result<()> {
        writer.kind(self.kind);
        writer.u32(self.mode);
        writer.u64(self.size);
        writer.u32(self.id);
        writer.u32(self.child_count);
        writer.name(&self.name)?;

        Ok(())
    }

    pub fn decode(reader: &mut RecordReader) -> Result<Self> {
        let record = Self {
            kind: reader.kind()?,
            mode: reader.u32()?,
            size: reader.u64()?,
            id: reader.u32()?,
            child_count: reader.u32()?,
            name: reader.name()?,
        };

        if !Inode::is_valid_name(&record.name) {
            return Err(anyhow!("invalid inode name: {:?}", record.name));
        }

        Ok(record)
    }

    pub fn encode_header(writer: &mut RecordWriter) {
        writer.bytes(Self::MAGIC);
        writer.u8(Self::VERSION);
    }

    pub fn decode_header(reader: &mut RecordReader) -> Result<()> {
        if reader.bytes(Self::MAGIC.len()).ok() != Some(Self::MAGIC.as_slice()) {
            return Err(anyhow!("not an inofs dump (bad magic)"));
        }

        match reader.u8()? {
            Self::VERSION => Ok(()),
            version => Err(anyhow!("unsupported dump version: {}", version)),
        }
    }
}
