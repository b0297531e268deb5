use super::FsResult;
use crate::{Filesystem, InodeId};
use tracing::{debug, instrument};

impl Filesystem {
    /// Renames a child in place.
    ///
    /// Doesn't check whether `new_name` is already taken, so this can leave
    /// two siblings with the same name.
    #[instrument(skip(self))]
    pub fn rename(&mut self, parent_iid: InodeId, old_name: &str, new_name: &str) -> FsResult<()> {
        debug!("op: rename()");

        Self::validate_name(new_name)?;

        let iid = self.find(parent_iid, old_name)?;

        self.inodes.get_mut(iid)?.name = new_name.to_owned();

        Ok(())
    }
}
