mod cmds;
mod filesystem;
mod inode;
mod inode_id;
mod inodes;
mod record;
mod record_rw;
mod storage;

pub use self::cmds::*;
pub use self::filesystem::*;
pub use self::inode::*;
pub use self::inode_id::*;
pub use self::inodes::*;
pub use self::record::*;
pub use self::record_rw::*;
pub use self::storage::*;
use anyhow::Result;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

/// InoFS, an in-memory inode tree you can poke at from a tiny shell
#[derive(Debug, StructOpt)]
enum Cmd {
    Demo(DemoCmd),
    Inspect(InspectCmd),
    Shell(ShellCmd),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cmd::from_args() {
        Cmd::Demo(cmd) => cmd.run(),
        Cmd::Inspect(cmd) => cmd.run(),
        Cmd::Shell(cmd) => cmd.run(),
    }
}
