use std::{fs::{File, Metadata as StdMetadata, OpenOptions}, io::Result as IoResult};
use std::os::unix::fs::{FileExt, OpenOptionsExt as _, PermissionsExt as _};

use crate::util_traits::RandomAccess;


impl RandomAccess for File {
    /// The file cursor is not affected by (and does not affect) Unix's [`FileExt::read_at`].
    #[inline]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
        FileExt::read_at(self, buf, offset)
    }
}

/// Set the permission bits a file created by `options` should have.
#[inline]
pub(super) fn set_creation_mode(options: &mut OpenOptions, mode: u32) {
    options.mode(mode);
}

/// The permission bits of a file or directory.
#[inline]
#[must_use]
pub(super) fn mode_of(metadata: &StdMetadata) -> u32 {
    metadata.permissions().mode()
}

/// Read at `offset`. Unix's `read_at` already leaves the file cursor alone.
#[inline]
pub(super) fn read_at_keeping_cursor(file: &File, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
    FileExt::read_at(file, buf, offset)
}
