use super::FsResult;
use crate::{Filesystem, InodeId};
use std::io::Write;
use tracing::{debug, instrument};

impl Filesystem {
    /// Writes metadata of `iid` and of all its descendants (pre-order), one
    /// [`super::Stat`] block per inode, separated by blank lines.
    #[instrument(skip(self, out))]
    pub fn print_tree(&self, iid: InodeId, out: &mut dyn Write) -> FsResult<()> {
        debug!("op: print_tree()");

        let mut pending = vec![iid];
        let mut first = true;

        while let Some(iid) = pending.pop() {
            if !first {
                writeln!(out)?;
            }

            writeln!(out, "{}", self.attr(iid)?)?;
            first = false;

            pending.extend(self.inodes.resolve_children(iid)?.iter().rev());
        }

        Ok(())
    }
}
