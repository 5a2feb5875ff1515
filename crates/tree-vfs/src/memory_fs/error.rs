use std::{fmt::{Display, Formatter, Result as FmtResult}, path::PathBuf};
use std::io::{Error as IoError, ErrorKind};

use thiserror::Error;

use crate::util_traits::FSError;


/// The kind of I/O which a [`MemoryFile`] was not opened for.
///
/// [`MemoryFile`]: super::file::MemoryFile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
}

impl Display for FileOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Read  => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

// Note that the `Debug` implementation of `Path` provides wrapping quotes, so the messages below
// do not need to provide quotes. Weird paths are escaped rather than lossily displayed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Nothing exists at the path, or at one of its parent paths, and creation was not
    /// requested.
    #[error("no file or directory could be found at path {0:?} in a MemoryFS")]
    NotFound(PathBuf),
    /// A directory was expected at the path or at one of its parent paths, but a file was found.
    #[error("expected a directory, but found a file, at or above path {0:?} in a MemoryFS")]
    NotADirectory(PathBuf),
    #[error("expected a file, but found a directory, at path {0:?} in a MemoryFS")]
    IsADirectory(PathBuf),
    #[error("expected an empty directory, but found a nonempty directory at path {0:?} in a MemoryFS")]
    DirectoryNotEmpty(PathBuf),
    #[error("the root directory of a MemoryFS cannot be removed or moved")]
    RootDirectory,
    #[error("attempted to move the directory at {0:?} to a new path inside itself in a MemoryFS")]
    MoveIntoSelf(PathBuf),
    #[error("the file {0:?} in a MemoryFS has already been closed")]
    Closed(PathBuf),
    #[error("{operation} is not supported by the flags which {path:?} was opened with in a MemoryFS")]
    Unsupported {
        operation: FileOperation,
        path:      PathBuf,
    },
    #[error("attempted to seek to a negative or overflowing position in {0:?} in a MemoryFS")]
    InvalidSeek(PathBuf),
    /// If you manage to seek a `MemoryFile` to an offset that doesn't fit in a `usize` and then
    /// write to it, you can win the "Hypothetical 16 Exabyte File Award" and receive this error.
    #[error(
        "you win the Hypothetical 16 Exabyte File Award: offset {offset} in {path:?} \
         could not fit in a usize in a MemoryFS"
    )]
    OffsetTooLarge {
        path:   PathBuf,
        offset: u64,
    },
    #[error("could not find an unused temporary file name after {attempts} attempts in a MemoryFS")]
    TempFilesExhausted {
        attempts: u32,
    },
}

impl Error {
    /// The [`ErrorKind`] that this error is reported as, when converted into a
    /// [`std::io::Error`].
    #[must_use]
    pub const fn io_kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_)                           => ErrorKind::NotFound,
            Self::NotADirectory(_)                      => ErrorKind::NotADirectory,
            Self::IsADirectory(_)                       => ErrorKind::IsADirectory,
            Self::DirectoryNotEmpty(_)                  => ErrorKind::DirectoryNotEmpty,
            Self::RootDirectory                         => ErrorKind::PermissionDenied,
            Self::Unsupported { .. }                    => ErrorKind::Unsupported,
            Self::MoveIntoSelf(_) | Self::InvalidSeek(_) => ErrorKind::InvalidInput,
            Self::Closed(_)
                | Self::OffsetTooLarge { .. }
                | Self::TempFilesExhausted { .. }       => ErrorKind::Other,
        }
    }
}

impl From<Error> for IoError {
    /// The resulting `io::Error` wraps the `MemoryFS` error, which can be recovered with
    /// [`IoError::get_ref`] and `downcast_ref`.
    fn from(err: Error) -> Self {
        Self::new(err.io_kind(), err)
    }
}

impl FSError for Error {
    #[inline]
    fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Nothing in a `MemoryFS` can be interrupted.
    #[inline]
    fn is_interrupted(&self) -> bool {
        false
    }

    #[inline]
    fn is_not_a_directory(&self) -> bool {
        matches!(self, Self::NotADirectory(_))
    }

    #[inline]
    fn is_a_directory(&self) -> bool {
        matches!(self, Self::IsADirectory(_))
    }

    #[inline]
    fn is_directory_not_empty(&self) -> bool {
        matches!(self, Self::DirectoryNotEmpty(_))
    }
}
