use super::FsResult;
use crate::{Filesystem, InodeId};
use tracing::{debug, instrument};

impl Filesystem {
    /// Returns names of the inode's direct children, in insertion order.
    #[instrument(skip(self))]
    pub fn ls(&self, iid: InodeId) -> FsResult<Vec<String>> {
        debug!("op: ls()");

        let names = self
            .inodes
            .resolve_children(iid)?
            .iter()
            .map(|&child_iid| -> FsResult<String> {
                Ok(self.inodes.get(child_iid)?.name.clone())
            })
            .collect::<FsResult<_>>()?;

        Ok(names)
    }
}
