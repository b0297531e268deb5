use super::{FsError, FsResult};
use crate::{Filesystem, InodeId, InodeKind};
use anyhow::Context;
use tracing::{debug, instrument};

impl Filesystem {
    /// Creates an empty file at the end of `parent_iid`'s children.
    ///
    /// Unlike [`Self::mkdir()`], refuses to create a second entry with the
    /// same name.
    #[instrument(skip(self))]
    pub fn touch(&mut self, parent_iid: InodeId, name: &str) -> FsResult<InodeId> {
        debug!("op: touch()");

        Self::validate_name(name)?;

        if self.inodes.find_child(parent_iid, name)?.is_some() {
            return Err(FsError::AlreadyExists(name.to_owned()));
        }

        self.mk(parent_iid, name, InodeKind::File, self.options.file_mode)
    }

    #[instrument(skip(self))]
    pub fn mkdir(&mut self, parent_iid: InodeId, name: &str) -> FsResult<InodeId> {
        debug!("op: mkdir()");

        Self::validate_name(name)?;

        self.mk(parent_iid, name, InodeKind::Directory, self.options.dir_mode)
    }

    fn mk(
        &mut self,
        parent_iid: InodeId,
        name: &str,
        kind: InodeKind,
        mode: u32,
    ) -> FsResult<InodeId> {
        // New inode's display id is its future position among its siblings
        let id = self.inodes.resolve_children(parent_iid)?.len();
        let id = u32::try_from(id).context("too many children")?;

        let iid = self.inodes.create(parent_iid, name, kind, 0, mode, id)?;

        if let Err(err) = self.inodes.attach(parent_iid, iid) {
            self.inodes.free(iid)?;

            return Err(err.into());
        }

        Ok(iid)
    }
}
