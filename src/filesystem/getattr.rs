use super::{FsResult, Stat};
use crate::{Filesystem, InodeId};
use tracing::{debug, instrument};

impl Filesystem {
    #[instrument(skip(self))]
    pub fn stat(&self, parent_iid: InodeId, name: &str) -> FsResult<Stat> {
        debug!("op: stat()");

        let iid = self.find(parent_iid, name)?;

        self.attr(iid)
    }
}
