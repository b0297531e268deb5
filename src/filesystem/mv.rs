use super::{FsError, FsResult};
use crate::{Filesystem, InodeId};
use tracing::{debug, instrument};

impl Filesystem {
    /// Moves child `name` of `src_iid` to the end of `dst_iid`'s children.
    ///
    /// Moving a directory into itself or into one of its descendants is
    /// rejected. `src_iid == dst_iid` is fine and just moves the child to the
    /// end of the listing.
    #[instrument(skip(self))]
    pub fn mv(&mut self, name: &str, src_iid: InodeId, dst_iid: InodeId) -> FsResult<()> {
        debug!("op: mv()");

        let iid = self.find(src_iid, name)?;

        self.inodes.get(dst_iid)?;

        if self.inodes.is_ancestor_of(iid, dst_iid)? {
            return Err(FsError::WouldCycle(name.to_owned()));
        }

        self.inodes.reparent(iid, dst_iid)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{FsError, FsOptions, Filesystem, InodeId};

    #[test]
    fn moves_file_between_directories() {
        let mut fs = Filesystem::new(FsOptions::default());
        let home = fs.mkdir(InodeId::ROOT, "home").unwrap();
        fs.mkdir(InodeId::ROOT, "etc").unwrap();
        let guide = fs.touch(home, "user_guide.txt").unwrap();

        fs.mv("user_guide.txt", home, InodeId::ROOT).unwrap();

        assert!(fs.ls(home).unwrap().is_empty());
        assert_eq!(fs.ls(InodeId::ROOT).unwrap(), ["home", "etc", "user_guide.txt"]);

        let stat = fs.stat(InodeId::ROOT, "user_guide.txt").unwrap();
        assert_eq!(stat.iid, guide);
        assert_eq!(stat.parent.as_deref(), Some("root"));
    }

    #[test]
    fn parent_tracks_the_latest_destination() {
        let mut fs = Filesystem::new(FsOptions::default());
        let a = fs.mkdir(InodeId::ROOT, "a").unwrap();
        let b = fs.mkdir(InodeId::ROOT, "b").unwrap();
        let f = fs.touch(InodeId::ROOT, "f").unwrap();

        let hops = [(InodeId::ROOT, a), (a, b), (b, InodeId::ROOT), (InodeId::ROOT, b)];

        for (src, dst) in hops {
            fs.mv("f", src, dst).unwrap();

            assert_eq!(fs.inodes().resolve_parent(f).unwrap(), Some(dst));

            let holders = [InodeId::ROOT, a, b]
                .into_iter()
                .filter(|&dir| fs.inodes().resolve_children(dir).unwrap().contains(&f))
                .count();

            assert_eq!(holders, 1);
        }
    }

    #[test]
    fn moving_within_the_same_directory_goes_to_the_end() {
        let mut fs = Filesystem::new(FsOptions::default());
        fs.mkdir(InodeId::ROOT, "a").unwrap();
        fs.mkdir(InodeId::ROOT, "b").unwrap();
        fs.mkdir(InodeId::ROOT, "c").unwrap();

        fs.mv("a", InodeId::ROOT, InodeId::ROOT).unwrap();

        assert_eq!(fs.ls(InodeId::ROOT).unwrap(), ["b", "c", "a"]);
    }

    #[test]
    fn refuses_to_create_cycles() {
        let mut fs = Filesystem::new(FsOptions::default());
        let a = fs.mkdir(InodeId::ROOT, "a").unwrap();
        let b = fs.mkdir(a, "b").unwrap();

        assert!(matches!(
            fs.mv("a", InodeId::ROOT, a),
            Err(FsError::WouldCycle(_))
        ));
        assert!(matches!(
            fs.mv("a", InodeId::ROOT, b),
            Err(FsError::WouldCycle(_))
        ));

        assert_eq!(fs.ls(InodeId::ROOT).unwrap(), ["a"]);
        assert_eq!(fs.ls(a).unwrap(), ["b"]);
    }

    #[test]
    fn missing_source_is_not_found() {
        let mut fs = Filesystem::new(FsOptions::default());
        let home = fs.mkdir(InodeId::ROOT, "home").unwrap();

        assert!(matches!(
            fs.mv("user_guide.txt", home, InodeId::ROOT),
            Err(FsError::NotFound(_))
        ));
        assert_eq!(fs.ls(InodeId::ROOT).unwrap(), ["home"]);
    }
}
