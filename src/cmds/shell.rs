use crate::{load_tree, save_tree, FsError, FsOptions, FsResult, Filesystem, Inode, InodeId};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::process;
use structopt::StructOpt;
use tracing::{debug, info};

const HELP: &str = "\
ls [path]              list entries
cd <name>              enter a child directory, `.` or `..`
pwd                    print the current directory
touch <name>           create a file
mkdir <name>           create a directory
rename <old> <new>     rename an entry
chmod <mode> <name>    change mode (octal)
stat <name>            show metadata
mv <path> <dir>        move an entry into another directory
rm <name>              remove an entry together with its contents
tree [path]            show metadata of the whole subtree
save <file>            dump the tree into a file
load <file>            replace the tree with a dump
help                   show this message
exit                   leave";

/// Runs commands against a fresh tree, one command per line
#[derive(Debug, StructOpt)]
pub struct ShellCmd {
    /// Reads commands from this file instead of stdin
    #[structopt(short, long)]
    script: Option<PathBuf>,

    /// Stops at the first failing command, exiting with its errno
    #[structopt(long)]
    strict: bool,

    /// Name of the root directory
    #[structopt(long, default_value = "root", parse(try_from_str = parse_root_name))]
    root_name: String,

    /// Mode of the root directory (octal)
    #[structopt(long, default_value = "777", parse(try_from_str = parse_mode))]
    root_mode: u32,

    /// Mode given to new files (octal)
    #[structopt(long, default_value = "666", parse(try_from_str = parse_mode))]
    file_mode: u32,

    /// Mode given to new directories (octal)
    #[structopt(long, default_value = "0", parse(try_from_str = parse_mode))]
    dir_mode: u32,
}

impl ShellCmd {
    pub fn run(self) -> Result<()> {
        let input: Box<dyn BufRead> = match &self.script {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("couldn't open: {}", path.display()))?;

                Box::new(BufReader::new(file))
            }

            None => Box::new(io::stdin().lock()),
        };

        let options = FsOptions {
            root_name: self.root_name.clone(),
            root_mode: self.root_mode,
            file_mode: self.file_mode,
            dir_mode: self.dir_mode,
        };

        let stdout = io::stdout();
        let mut out = stdout.lock();
        let mut shell = Shell::new(options);

        for line in input.lines() {
            let line = line.context("couldn't read command")?;
            let args: Vec<_> = line.split_whitespace().collect();

            let Some((&cmd, args)) = args.split_first() else {
                continue;
            };

            if cmd.starts_with('#') {
                continue;
            }

            if cmd == "exit" {
                break;
            }

            if let Err(err) = shell.exec(cmd, args, &mut out) {
                writeln!(out, "{}: {}", cmd, err)?;

                let errno = err.log_and_convert();

                if self.strict {
                    out.flush()?;
                    process::exit(errno);
                }
            }
        }

        Ok(())
    }
}

fn parse_mode(mode: &str) -> Result<u32, ParseIntError> {
    u32::from_str_radix(mode.trim_start_matches("0o"), 8)
}

fn parse_root_name(name: &str) -> FsResult<String> {
    if Inode::is_valid_name(name) {
        Ok(name.to_owned())
    } else {
        Err(FsError::InvalidName(name.to_owned()))
    }
}

/// Splits `a/b/c` into `("a/b", "c")`; paths without a slash live in the
/// current directory.
fn split_path(path: &str) -> (&str, &str) {
    let path = path.trim_end_matches('/');

    match path.rsplit_once('/') {
        Some(("", name)) => ("/", name),
        Some((dir, name)) => (dir, name),
        None => (".", path),
    }
}

#[derive(Debug)]
pub struct Shell {
    fs: Filesystem,
    options: FsOptions,
}

impl Shell {
    pub fn new(options: FsOptions) -> Self {
        Self {
            fs: Filesystem::new(options.clone()),
            options,
        }
    }

    pub fn exec(&mut self, cmd: &str, args: &[&str], out: &mut dyn Write) -> FsResult<()> {
        debug!("exec: {} {:?}", cmd, args);

        let cwd = self.fs.cwd();

        match (cmd, args) {
            ("ls", []) => self.ls(".", out),
            ("ls", [path]) => self.ls(path, out),

            ("cd", [name]) => self.fs.cd(name),

            ("pwd", []) => {
                writeln!(out, "{}", self.fs.pwd()?)?;
                Ok(())
            }

            ("touch", [name]) => {
                self.fs.touch(cwd, name)?;
                writeln!(out, "file '{}' created", name)?;
                Ok(())
            }

            ("mkdir", [name]) => {
                self.fs.mkdir(cwd, name)?;
                Ok(())
            }

            ("rename", [old_name, new_name]) => self.fs.rename(cwd, old_name, new_name),

            ("chmod", [mode, name]) => {
                let mode = parse_mode(mode)
                    .map_err(|_| FsError::InvalidArgument(format!("invalid mode: {}", mode)))?;

                self.fs.chmod(cwd, name, mode)
            }

            ("stat", [name]) => {
                writeln!(out, "{}", self.fs.stat(cwd, name)?)?;
                Ok(())
            }

            ("mv", [path, dst]) => {
                let (src, name) = split_path(path);
                let src_iid = self.fs.resolve(src)?;
                let dst_iid = self.fs.resolve(dst)?;

                self.fs.mv(name, src_iid, dst_iid)
            }

            ("rm", [name]) => self.fs.rm(cwd, name),

            ("tree", []) => self.fs.print_tree(cwd, out),

            ("tree", [path]) => {
                let iid = self.fs.resolve(path)?;

                self.fs.print_tree(iid, out)
            }

            ("save", [path]) => {
                save_tree(Path::new(path), self.fs.inodes(), InodeId::ROOT)?;
                writeln!(out, "saved to {}", path)?;
                Ok(())
            }

            ("load", [path]) => {
                let inodes = load_tree(Path::new(path))?;

                info!("loaded {} inodes", inodes.len());

                self.fs = Filesystem::from_inodes(inodes, self.options.clone());
                Ok(())
            }

            ("help", []) => {
                writeln!(out, "{}", HELP)?;
                Ok(())
            }

            _ => Err(FsError::InvalidArgument(
                "unknown command or wrong number of arguments (try `help`)".into(),
            )),
        }
    }

    fn ls(&self, path: &str, out: &mut dyn Write) -> FsResult<()> {
        let iid = self.fs.resolve(path)?;

        for name in self.fs.ls(iid)? {
            writeln!(out, "{}", name)?;
        }

        Ok(())
    }
}
