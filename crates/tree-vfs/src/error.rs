use std::{io::{Error as IoError, ErrorKind}, path::PathBuf};

use thiserror::Error;

use crate::util_traits::FSError;


/// The error returned by I/O on a [`StandardFile`] which has already been closed.
///
/// [`StandardFile`]: crate::std_fs::StandardFile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("the file {0:?} has already been closed")]
pub struct FileClosed(pub PathBuf);

impl From<FileClosed> for IoError {
    fn from(err: FileClosed) -> Self {
        Self::other(err)
    }
}

impl FSError for IoError {
    #[inline]
    fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    #[inline]
    fn is_interrupted(&self) -> bool {
        self.kind() == ErrorKind::Interrupted
    }

    #[inline]
    fn is_not_a_directory(&self) -> bool {
        self.kind() == ErrorKind::NotADirectory
    }

    #[inline]
    fn is_a_directory(&self) -> bool {
        self.kind() == ErrorKind::IsADirectory
    }

    #[inline]
    fn is_directory_not_empty(&self) -> bool {
        self.kind() == ErrorKind::DirectoryNotEmpty
    }
}
