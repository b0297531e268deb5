use super::{FsError, FsResult};
use crate::Filesystem;
use tracing::{debug, instrument};

impl Filesystem {
    /// Moves the cursor to `.`, `..` or a child directory of the current
    /// one; on failure the cursor stays where it was.
    #[instrument(skip(self))]
    pub fn cd(&mut self, name: &str) -> FsResult<()> {
        debug!("op: cd()");

        match name {
            "." => Ok(()),

            ".." => {
                self.cwd = self.inodes.resolve_parent(self.cwd)?.ok_or(FsError::AtRoot)?;

                Ok(())
            }

            name => {
                for &iid in self.inodes.resolve_children(self.cwd)? {
                    if iid == self.cwd {
                        continue;
                    }

                    let inode = self.inodes.get(iid)?;

                    if inode.name != name {
                        continue;
                    }

                    if !inode.is_dir() {
                        return Err(FsError::NotADirectory(name.to_owned()));
                    }

                    self.cwd = iid;

                    return Ok(());
                }

                Err(FsError::NotFound(name.to_owned()))
            }
        }
    }
}
