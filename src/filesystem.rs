mod cd;
mod getattr;
mod lookup;
mod mk;
mod mv;
mod ops;
mod readdir;
mod rename;
mod result;
mod rm;
mod setattr;
mod tree;

pub use self::result::*;
use crate::{Inode, InodeId, InodeKind, Inodes};
use std::fmt;
use tracing::warn;

/// Inode tree together with the current-directory cursor.
///
/// Operations that take a parent [`InodeId`] work relative to that inode;
/// only [`Filesystem::cd()`] and [`Filesystem::rm()`] look at the cursor.
#[derive(Debug)]
pub struct Filesystem {
    inodes: Inodes,
    cwd: InodeId,
    options: FsOptions,
}

impl Filesystem {
    /// Builds a tree holding just the root.
    ///
    /// A root name that couldn't be dumped and loaded back (see
    /// [`Inode::is_valid_name()`]) is replaced with the default one.
    pub fn new(mut options: FsOptions) -> Self {
        if !Inode::is_valid_name(&options.root_name) {
            let fallback = FsOptions::default().root_name;

            warn!(
                "invalid root name {:?}, using {:?} instead",
                options.root_name, fallback
            );

            options.root_name = fallback;
        }

        let inodes = Inodes::new(&options.root_name, options.root_mode);

        Self::from_inodes(inodes, options)
    }

    /// Wraps an already built tree (e.g. one loaded from a dump), with the
    /// cursor at its root.
    pub fn from_inodes(inodes: Inodes, options: FsOptions) -> Self {
        Self {
            inodes,
            cwd: InodeId::ROOT,
            options,
        }
    }

    pub fn inodes(&self) -> &Inodes {
        &self.inodes
    }

    pub fn cwd(&self) -> InodeId {
        self.cwd
    }

    fn attr(&self, iid: InodeId) -> FsResult<Stat> {
        let inode = self.inodes.get(iid)?;

        let parent = match inode.parent {
            Some(parent_iid) => Some(self.inodes.get(parent_iid)?.name.clone()),
            None => None,
        };

        let children = inode
            .children
            .iter()
            .map(|&child_iid| -> FsResult<String> {
                Ok(self.inodes.get(child_iid)?.name.clone())
            })
            .collect::<FsResult<_>>()?;

        Ok(Stat {
            iid,
            name: inode.name.clone(),
            kind: inode.kind,
            size: inode.size,
            mode: inode.mode,
            id: inode.id,
            parent,
            children,
        })
    }

    fn validate_name(name: &str) -> FsResult<()> {
        if Inode::is_valid_name(name) {
            Ok(())
        } else {
            Err(FsError::InvalidName(name.to_owned()))
        }
    }
}

#[derive(Clone, Debug)]
pub struct FsOptions {
    pub root_name: String,
    pub root_mode: u32,

    /// Mode given to inodes created with [`Filesystem::touch()`]
    pub file_mode: u32,

    /// Mode given to inodes created with [`Filesystem::mkdir()`]
    pub dir_mode: u32,
}

impl Default for FsOptions {
    fn default() -> Self {
        Self {
            root_name: "root".into(),
            root_mode: 0o777,
            file_mode: 0o666,
            dir_mode: 0o000,
        }
    }
}

/// Metadata of a single inode, as reported by [`Filesystem::stat()`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stat {
    pub iid: InodeId,
    pub name: String,
    pub kind: InodeKind,
    pub size: u64,
    pub mode: u32,
    pub id: u32,
    pub parent: Option<String>,
    pub children: Vec<String>,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            InodeKind::File => "file",
            InodeKind::Directory => "directory",
        };

        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "kind: {}", kind)?;
        writeln!(f, "size: {}", self.size)?;
        writeln!(f, "mode: {:04o}", self.mode)?;
        writeln!(f, "id: {}", self.id)?;
        writeln!(f, "parent: {}", self.parent.as_deref().unwrap_or("none"))?;

        if self.children.is_empty() {
            write!(f, "children: none")
        } else {
            write!(f, "children: {}", self.children.join(" "))
        }
    }
}
