use anyhow::{Context, Result};
use std::fmt;

/// Arena handle of an inode.
///
/// Unlike [`crate::Inode::id`], which is a display-only number, handles are
/// unique for the lifetime of an [`crate::Inodes`] arena and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InodeId(u64);

impl InodeId {
    pub const ROOT: Self = Self(1);

    pub fn new(iid: u64) -> Self {
        Self(iid)
    }

    pub fn fetch_add(&mut self) -> Result<Self> {
        let this = *self;

        self.0 = self
            .0
            .checked_add(1)
            .context("reached the maximum number of inodes")?;

        Ok(this)
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for InodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
