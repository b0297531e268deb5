use crate::Inode;
use anyhow::Error;
use libc::{EBUSY, EEXIST, EINVAL, EIO, ENAMETOOLONG, ENOENT, ENOTDIR};
use std::ffi::c_int;
use std::{fmt, io};
use tracing::{debug, error};

pub type FsResult<T> = Result<T, FsError>;

#[derive(Debug)]
pub enum FsError {
    NotFound(String),
    AlreadyExists(String),
    NotADirectory(String),
    AtRoot,

    /// Tried to remove an entry named like the directory it's removed from
    IsCwdName(String),

    /// Tried to remove the current directory or one of its ancestors
    Busy(String),

    /// Tried to move a directory into itself or one of its descendants
    WouldCycle(String),

    InvalidName(String),
    InvalidArgument(String),
    Other(Error),
}

impl FsError {
    pub fn errno(&self) -> c_int {
        match self {
            FsError::NotFound(_) => ENOENT,
            FsError::AlreadyExists(_) => EEXIST,
            FsError::NotADirectory(_) => ENOTDIR,
            FsError::IsCwdName(_) | FsError::Busy(_) => EBUSY,
            FsError::InvalidName(name) if name.len() > Inode::NAME_MAX => ENAMETOOLONG,
            FsError::AtRoot
            | FsError::WouldCycle(_)
            | FsError::InvalidName(_)
            | FsError::InvalidArgument(_) => EINVAL,
            FsError::Other(_) => EIO,
        }
    }

    pub fn log_and_convert(self) -> c_int {
        let errno = self.errno();

        match self {
            FsError::Other(err) => {
                error!("... {:?}", err);
            }

            err => {
                debug!("... {}", err);
            }
        }

        errno
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::NotFound(name) => write!(f, "no such file or directory: {}", name),
            FsError::AlreadyExists(name) => write!(f, "file '{}' already exists", name),
            FsError::NotADirectory(name) => write!(f, "not a directory: {}", name),
            FsError::AtRoot => write!(f, "already at root"),
            FsError::IsCwdName(_) => write!(f, "cannot remove the current working directory"),
            FsError::Busy(name) => write!(
                f,
                "refusing to remove '{}': it's the current directory or one of its parents",
                name
            ),
            FsError::WouldCycle(name) => write!(
                f,
                "cannot move '{}' into itself or one of its descendants",
                name
            ),
            FsError::InvalidName(name) => write!(f, "invalid name: {:?}", name),
            FsError::InvalidArgument(msg) => write!(f, "{}", msg),
            FsError::Other(err) => write!(f, "{:#}", err),
        }
    }
}

impl std::error::Error for FsError {}

impl From<Error> for FsError {
    fn from(err: Error) -> Self {
        FsError::Other(err)
    }
}

impl From<io::Error> for FsError {
    fn from(err: io::Error) -> Self {
        FsError::Other(err.into())
    }
}
