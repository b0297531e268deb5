use crate::InodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InodeKind {
    File,
    Directory,
}

#[derive(Debug)]
pub struct Inode {
    pub name: String,
    pub kind: InodeKind,
    pub size: u64,
    pub mode: u32,

    /// Display number; set to the parent's child count at creation, so it's
    /// neither unique nor stable
    pub id: u32,

    /// `None` for the root only
    pub parent: Option<InodeId>,
    pub children: Vec<InodeId>,
}

impl Inode {
    /// Longest name (in bytes) an inode can carry
    pub const NAME_MAX: usize = 99;

    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name.len() <= Self::NAME_MAX
            && !name.contains('/')
            && name != "."
            && name != ".."
    }

    pub fn is_dir(&self) -> bool {
        self.kind == InodeKind::Directory
    }
}
