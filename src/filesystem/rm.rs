use super::{FsError, FsResult};
use crate::{Filesystem, InodeId};
use tracing::{debug, instrument};

impl Filesystem {
    /// Removes child `name` of `parent_iid` together with everything beneath
    /// it.
    ///
    /// Refuses to remove the current directory or any of its ancestors.
    #[instrument(skip(self))]
    pub fn rm(&mut self, parent_iid: InodeId, name: &str) -> FsResult<()> {
        debug!("op: rm()");

        if self.inodes.get(parent_iid)?.name == name {
            return Err(FsError::IsCwdName(name.to_owned()));
        }

        let iid = self.find(parent_iid, name)?;

        if self.inodes.is_ancestor_of(iid, self.cwd)? {
            return Err(FsError::Busy(name.to_owned()));
        }

        self.inodes.free(iid)?;

        Ok(())
    }
}
