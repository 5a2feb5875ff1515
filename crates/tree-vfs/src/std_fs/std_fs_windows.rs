use std::fs::{File, Metadata as StdMetadata, OpenOptions};
use std::io::{Result as IoResult, Seek as _, SeekFrom};
use std::os::windows::fs::FileExt;

use crate::util_traits::RandomAccess;


impl RandomAccess for File {
    /// The file cursor does not affect Windows' implementation of `read_at`. However, the
    /// implementation _does_ change the file cursor; [`StandardFile`] restores it afterwards.
    ///
    /// [`StandardFile`]: super::StandardFile
    #[inline]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
        FileExt::seek_read(self, buf, offset)
    }
}

/// Windows has no Unix permission bits to set at creation.
#[inline]
pub(super) const fn set_creation_mode(_options: &mut OpenOptions, _mode: u32) {}

/// A nominal mode: read-only entries are `0o444`, and everything else `0o666`.
#[inline]
#[must_use]
pub(super) fn mode_of(metadata: &StdMetadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

/// Read at `offset`, then move the file cursor back to where it was before the read.
pub(super) fn read_at_keeping_cursor(file: &File, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
    let mut cursor = file;
    let position = cursor.stream_position()?;

    let read_result = FileExt::seek_read(file, buf, offset);

    cursor.seek(SeekFrom::Start(position))?;
    read_result
}
