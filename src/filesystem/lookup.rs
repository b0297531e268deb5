use super::{FsError, FsResult};
use crate::{Filesystem, InodeId};
use tracing::{debug, instrument};

impl Filesystem {
    /// Resolves a `/`-separated path, starting at the root when the path is
    /// absolute and at the current directory otherwise.
    #[instrument(skip(self))]
    pub fn resolve(&self, path: &str) -> FsResult<InodeId> {
        debug!("op: resolve()");

        let (mut iid, rest) = match path.strip_prefix('/') {
            Some(rest) => (InodeId::ROOT, rest),
            None => (self.cwd, path),
        };

        for component in rest.split('/').filter(|c| !c.is_empty()) {
            iid = match component {
                "." => iid,
                ".." => self.inodes.resolve_parent(iid)?.ok_or(FsError::AtRoot)?,
                name => self.find(iid, name)?,
            };
        }

        Ok(iid)
    }

    /// Returns the absolute path of the current directory.
    pub fn pwd(&self) -> FsResult<String> {
        let mut names = Vec::new();
        let mut cursor = self.cwd;

        while let Some(parent_iid) = self.inodes.resolve_parent(cursor)? {
            names.push(self.inodes.get(cursor)?.name.as_str());
            cursor = parent_iid;
        }

        names.reverse();

        Ok(format!("/{}", names.join("/")))
    }
}
