use super::FsResult;
use crate::{Filesystem, InodeId};
use tracing::{debug, instrument};

impl Filesystem {
    #[instrument(skip(self))]
    pub fn chmod(&mut self, parent_iid: InodeId, name: &str, mode: u32) -> FsResult<()> {
        debug!("op: chmod()");

        let iid = self.find(parent_iid, name)?;

        self.inodes.get_mut(iid)?.mode = mode;

        Ok(())
    }
}
