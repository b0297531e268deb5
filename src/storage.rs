use crate::{InodeId, Inodes, Record, RecordReader, RecordWriter};
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{info, instrument, trace};

/// Dumps the subtree rooted at `iid` into given file, replacing it.
#[instrument(skip(inodes))]
pub fn save_tree(path: &Path, inodes: &Inodes, iid: InodeId) -> Result<()> {
    info!("saving tree");

    let file =
        File::create(path).with_context(|| format!("couldn't create: {}", path.display()))?;

    let mut sink = BufWriter::new(file);

    write_tree(&mut sink, inodes, iid)?;

    sink.flush()
        .with_context(|| format!("couldn't write: {}", path.display()))?;

    Ok(())
}

#[instrument]
pub fn load_tree(path: &Path) -> Result<Inodes> {
    info!("loading tree");

    let file = File::open(path).with_context(|| format!("couldn't open: {}", path.display()))?;

    read_tree(&mut BufReader::new(file))
        .with_context(|| format!("couldn't load: {}", path.display()))
}

pub fn write_tree(sink: &mut impl Write, inodes: &Inodes, iid: InodeId) -> Result<()> {
    let mut writer = RecordWriter::default();

    Record::encode_header(&mut writer);

    let mut pending = vec![iid];

    while let Some(iid) = pending.pop() {
        let inode = inodes.get(iid)?;

        Record::from_inode(inode)?.encode(&mut writer)?;

        pending.extend(inode.children.iter().rev());
    }

    sink.write_all(&writer.finish())
        .context("write() failed")?;

    Ok(())
}

/// Rebuilds a tree written by [`write_tree()`]; the first record becomes the
/// root.
pub fn read_tree(source: &mut impl Read) -> Result<Inodes> {
    let mut data = Vec::new();

    source.read_to_end(&mut data).context("read() failed")?;

    let mut reader = RecordReader::new(&data);

    Record::decode_header(&mut reader)?;

    let root = Record::decode(&mut reader)?;
    let mut inodes = Inodes::new(&root.name, root.mode);

    {
        let inode = inodes.get_mut(InodeId::ROOT)?;

        inode.kind = root.kind;
        inode.size = root.size;
        inode.id = root.id;
    }

    // (inode, how many of its children are still to be read)
    let mut pending = vec![(InodeId::ROOT, root.child_count)];

    while let Some((parent_iid, remaining)) = pending.last_mut() {
        if *remaining == 0 {
            pending.pop();
            continue;
        }

        *remaining -= 1;

        let parent_iid = *parent_iid;
        let record = Record::decode(&mut reader)?;

        let iid = inodes.create(
            parent_iid,
            &record.name,
            record.kind,
            record.size,
            record.mode,
            record.id,
        )?;

        inodes.attach(parent_iid, iid)?;

        trace!("loaded {:?} as {}", record.name, iid);

        pending.push((iid, record.child_count));
    }

    if !reader.is_empty() {
        return Err(anyhow!("found trailing bytes after the last record"));
    }

    Ok(inodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FsOptions, Filesystem, InodeKind};

    fn sample() -> Filesystem {
        let mut fs = Filesystem::new(FsOptions::default());
        let home = fs.mkdir(InodeId::ROOT, "home").unwrap();
        let etc = fs.mkdir(InodeId::ROOT, "etc").unwrap();
        fs.touch(InodeId::ROOT, "README.md").unwrap();
        fs.chmod(InodeId::ROOT, "README.md", 0o644).unwrap();
        fs.touch(home, "user_guide.txt").unwrap();
        fs.mkdir(etc, "ssh").unwrap();
        fs
    }

    fn dump(fs: &Filesystem) -> Vec<String> {
        let mut out = Vec::new();
        fs.print_tree(InodeId::ROOT, &mut out).unwrap();

        String::from_utf8(out)
            .unwrap()
            .split("\n\n")
            .map(|block| block.to_owned())
            .collect()
    }

    #[test]
    fn round_trip() {
        let fs = sample();

        let mut data = Vec::new();
        write_tree(&mut data, fs.inodes(), InodeId::ROOT).unwrap();

        let inodes = read_tree(&mut data.as_slice()).unwrap();
        let loaded = Filesystem::from_inodes(inodes, FsOptions::default());

        assert_eq!(loaded.inodes().len(), fs.inodes().len());
        assert_eq!(dump(&loaded), dump(&fs));

        let readme = loaded.stat(InodeId::ROOT, "README.md").unwrap();
        assert_eq!(readme.kind, InodeKind::File);
        assert_eq!(readme.mode, 0o644);
        assert_eq!(readme.id, 2);
    }

    #[test]
    fn subtree_round_trip() {
        let fs = sample();
        let home = fs.find(InodeId::ROOT, "home").unwrap();

        let mut data = Vec::new();
        write_tree(&mut data, fs.inodes(), home).unwrap();

        let loaded = Filesystem::from_inodes(
            read_tree(&mut data.as_slice()).unwrap(),
            FsOptions::default(),
        );

        assert_eq!(loaded.ls(InodeId::ROOT).unwrap(), ["user_guide.txt"]);
        assert_eq!(loaded.inodes().get(InodeId::ROOT).unwrap().name, "home");
    }

    #[test]
    fn malformed_dumps_are_rejected() {
        let fs = sample();

        let mut data = Vec::new();
        write_tree(&mut data, fs.inodes(), InodeId::ROOT).unwrap();

        let truncated = &data[..data.len() - 3];
        assert!(read_tree(&mut &truncated[..]).is_err());

        let mut trailing = data.clone();
        trailing.push(0);
        assert!(read_tree(&mut trailing.as_slice()).is_err());

        let mut bad_magic = data.clone();
        bad_magic[0] = b'X';
        assert!(read_tree(&mut bad_magic.as_slice()).is_err());

        assert!(read_tree(&mut &b""[..]).is_err());
    }

    #[test]
    fn save_and_load_through_a_file() {
        let fs = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.ino");

        save_tree(&path, fs.inodes(), InodeId::ROOT).unwrap();
        let inodes = load_tree(&path).unwrap();

        let loaded = Filesystem::from_inodes(inodes, FsOptions::default());
        assert_eq!(dump(&loaded), dump(&fs));
    }

    #[test]
    fn custom_root_name_survives_round_trip() {
        for root_name in ["top", "my/root"] {
            let mut fs = Filesystem::new(FsOptions {
                root_name: root_name.to_owned(),
                ..FsOptions::default()
            });

            fs.mkdir(InodeId::ROOT, "home").unwrap();

            let mut data = Vec::new();
            write_tree(&mut data, fs.inodes(), InodeId::ROOT).unwrap();

            let loaded = Filesystem::from_inodes(
                read_tree(&mut data.as_slice()).unwrap(),
                FsOptions::default(),
            );

            assert_eq!(dump(&loaded), dump(&fs));
        }
    }

    #[test]
    fn deep_chains_round_trip() {
        let mut fs = Filesystem::new(FsOptions::default());
        let mut cursor = InodeId::ROOT;

        for _ in 0..200_000 {
            cursor = fs.mkdir(cursor, "d").unwrap();
        }

        let mut data = Vec::new();
        write_tree(&mut data, fs.inodes(), InodeId::ROOT).unwrap();

        let mut loaded = Filesystem::from_inodes(
            read_tree(&mut data.as_slice()).unwrap(),
            FsOptions::default(),
        );

        assert_eq!(loaded.inodes().len(), fs.inodes().len());

        loaded.rm(InodeId::ROOT, "d").unwrap();
        assert_eq!(loaded.inodes().len(), 1);
    }

    #[test]
    fn loading_a_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();

        assert!(load_tree(&dir.path().join("nope.ino")).is_err());
    }
}
