use crate::{save_tree, FsOptions, FsResult, Filesystem, InodeId};
use anyhow::Result;
use std::io::{self, Write};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::debug;

/// Builds a small tree, shuffles it around and prints what happens along the
/// way
#[derive(Debug, StructOpt)]
pub struct DemoCmd {
    /// When set, dumps the final tree into this file
    #[structopt(long)]
    save: Option<PathBuf>,
}

impl DemoCmd {
    pub fn run(self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        let fs = run_demo(&mut out)?;

        if let Some(path) = &self.save {
            save_tree(path, fs.inodes(), InodeId::ROOT)?;
            writeln!(out, "saved to {}", path.display())?;
        }

        debug!("tearing down");

        Ok(())
    }
}

/// Runs the demonstration and returns the tree it ended up with.
pub fn run_demo(out: &mut dyn Write) -> Result<Filesystem> {
    let mut fs = Filesystem::new(FsOptions::default());
    let root = fs.cwd();

    writeln!(out, "$ mkdir home")?;
    report(out, "mkdir", fs.mkdir(root, "home"))?;

    writeln!(out, "$ mkdir etc")?;
    report(out, "mkdir", fs.mkdir(root, "etc"))?;

    writeln!(out, "$ touch readme.txt")?;
    if report(out, "touch", fs.touch(root, "readme.txt"))?.is_some() {
        writeln!(out, "file 'readme.txt' created")?;
    }

    writeln!(out, "$ rename readme.txt README.md")?;
    report(out, "rename", fs.rename(root, "readme.txt", "README.md"))?;

    writeln!(out, "$ chmod 0644 README.md")?;
    report(out, "chmod", fs.chmod(root, "README.md", 0o644))?;

    writeln!(out, "$ stat README.md")?;
    if let Some(stat) = report(out, "stat", fs.stat(root, "README.md"))? {
        writeln!(out, "{}", stat)?;
    }

    ls(out, &fs)?;

    writeln!(out, "$ cd home")?;
    report(out, "cd", fs.cd("home"))?;

    writeln!(out, "$ touch user_guide.txt")?;
    if report(out, "touch", fs.touch(fs.cwd(), "user_guide.txt"))?.is_some() {
        writeln!(out, "file 'user_guide.txt' created")?;
    }

    ls(out, &fs)?;

    writeln!(out, "$ cd ..")?;
    report(out, "cd", fs.cd(".."))?;

    writeln!(out, "$ mv home/user_guide.txt .")?;
    if let Some(home) = report(out, "mv", fs.find(fs.cwd(), "home"))? {
        report(out, "mv", fs.mv("user_guide.txt", home, fs.cwd()))?;
    }

    ls(out, &fs)?;

    writeln!(out, "$ rm etc")?;
    report(out, "rm", fs.rm(fs.cwd(), "etc"))?;

    ls(out, &fs)?;

    Ok(fs)
}

fn ls(out: &mut dyn Write, fs: &Filesystem) -> Result<()> {
    writeln!(out, "$ ls")?;

    if let Some(names) = report(out, "ls", fs.ls(fs.cwd()))? {
        for name in names {
            writeln!(out, "{}", name)?;
        }
    }

    Ok(())
}

fn report<T>(out: &mut dyn Write, op: &str, result: FsResult<T>) -> Result<Option<T>> {
    match result {
        Ok(val) => Ok(Some(val)),

        Err(err) => {
            writeln!(out, "{}: {}", op, err)?;
            err.log_and_convert();

            Ok(None)
        }
    }
}
