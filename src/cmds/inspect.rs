use crate::{load_tree, FsOptions, Filesystem};
use anyhow::Result;
use std::io;
use std::path::PathBuf;
use structopt::StructOpt;

/// Prints the tree stored in a dump
#[derive(Debug, StructOpt)]
pub struct InspectCmd {
    /// Path to the dump
    src: PathBuf,

    /// When set, shows just the subtree at this path
    #[structopt(short, long)]
    path: Option<String>,
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        let fs = Filesystem::from_inodes(load_tree(&self.src)?, FsOptions::default());

        let iid = match &self.path {
            Some(path) => fs.resolve(path)?,
            None => fs.cwd(),
        };

        fs.print_tree(iid, &mut io::stdout().lock())?;

        Ok(())
    }
}
