use super::{FsError, FsResult};
use crate::{Filesystem, InodeId};
use tracing::instrument;

impl Filesystem {
    /// Goes through inode's children and looks for the first one with given
    /// name.
    ///
    /// If no such child exists, bails out with [`FsError::NotFound`].
    #[instrument(skip(self))]
    pub fn find(&self, parent_iid: InodeId, name: &str) -> FsResult<InodeId> {
        self.inodes
            .find_child(parent_iid, name)?
            .ok_or_else(|| FsError::NotFound(name.to_owned()))
    }
}
