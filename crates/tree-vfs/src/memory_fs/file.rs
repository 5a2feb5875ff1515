use std::path::{Path, PathBuf};
use std::io::{Read, Result as IoResult, Seek, SeekFrom, Write};

use crate::{open_flags::OpenFlags, util_traits::{RandomAccess, VfsFile}};
use super::{content::ContentBuffer, error::{Error, FileOperation}};


/// An open handle to a file in a [`MemoryFS`].
///
/// Each handle has its own file cursor, flags, and open/closed state, but every handle opened on
/// the same path shares that file's [`ContentBuffer`]: writes made through one handle are seen
/// by the others, and truncating the file affects all of them.
///
/// A `MemoryFile` is not `Send` or `Sync`; a `MemoryFS` and its files live on one thread.
///
/// [`MemoryFS`]: super::fs::MemoryFS
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name:     PathBuf,
    content:  ContentBuffer,
    position: u64,
    flags:    OpenFlags,
    closed:   bool,
}

impl MemoryFile {
    /// Open a handle onto `content`. The cursor starts at the end of the content if `APPEND`
    /// is set, and at the start otherwise; the caller is responsible for truncation.
    pub(super) fn open(name: PathBuf, content: ContentBuffer, flags: OpenFlags) -> Self {
        let position = if flags.is_append() {
            super::tree::usize_to_u64(content.len())
        } else {
            0
        };

        Self {
            name,
            content,
            position,
            flags,
            closed: false,
        }
    }

    /// Returns the current length of the file in bytes.
    ///
    /// This works even if the handle is closed.
    #[inline]
    #[must_use]
    pub fn len(&self) -> u64 {
        super::tree::usize_to_u64(self.content.len())
    }

    /// Checks whether the file has a length of zero bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The flags this handle was opened with.
    #[inline]
    #[must_use]
    pub const fn flags(&self) -> OpenFlags {
        self.flags
    }

    /// The current position of the file cursor.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Mark a closed handle as open again, keeping its cursor and flags. Does nothing if the
    /// handle is open.
    #[inline]
    pub const fn reopen(&mut self) {
        self.closed = false;
    }

    /// The buffer backing this file, shared with every other handle on the same file.
    #[inline]
    #[must_use]
    pub const fn content(&self) -> &ContentBuffer {
        &self.content
    }

    fn check_open(&self) -> Result<(), Error> {
        if self.closed {
            Err(Error::Closed(self.name.clone()))
        } else {
            Ok(())
        }
    }

    /// Check that the handle is open, and was opened with flags permitting `operation`.
    fn check_access(&self, operation: FileOperation) -> Result<(), Error> {
        self.check_open()?;

        let permitted = match operation {
            FileOperation::Read  => self.flags.is_readable(),
            FileOperation::Write => self.flags.is_writable(),
        };

        if permitted {
            Ok(())
        } else {
            Err(Error::Unsupported {
                operation,
                path: self.name.clone(),
            })
        }
    }

    /// Read from the buffer at `offset`, without touching the cursor.
    fn read_from(&self, offset: u64, buf: &mut [u8]) -> Result<usize, Error> {
        self.check_access(FileOperation::Read)?;

        let Ok(offset) = usize::try_from(offset) else {
            // If the offset is larger than `usize::MAX`, then it must be well past EOF for
            // our inner buffer.
            return Ok(0);
        };

        Ok(self.content.read_at(buf, offset))
    }
}

impl Read for MemoryFile {
    /// Read up to `buf.len()`-many bytes into the provided buffer, starting from the file
    /// cursor, and move the cursor forwards by the number of bytes read.
    ///
    /// `Ok(0)` is returned once the cursor is at or past the end of the file.
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed or was opened write-only.
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        let read_len = self.read_from(self.position, buf)?;

        self.position += super::tree::usize_to_u64(read_len);
        Ok(read_len)
    }
}

impl RandomAccess for MemoryFile {
    /// Read up to `buf.len()`-many bytes into the provided buffer, beginning from
    /// the indicated offset within this `MemoryFile`.
    ///
    /// The file cursor of the `MemoryFile` is unaffected.
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed or was opened write-only.
    #[inline]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
        Ok(self.read_from(offset, buf)?)
    }
}

impl Write for MemoryFile {
    /// Write the whole buffer at the file cursor, overwriting any bytes already there, and move
    /// the cursor forwards by the length of the buffer.
    ///
    /// If the cursor is past the end of the file, the gap is filled with zeroes.
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed or was opened read-only, or if the cursor is too large to
    /// index an in-memory buffer.
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        self.check_access(FileOperation::Write)?;

        let offset_too_large = || Error::OffsetTooLarge {
            path:   self.name.clone(),
            offset: self.position,
        };

        let offset = usize::try_from(self.position).map_err(|_| offset_too_large())?;
        self.content.write_at(buf, offset).ok_or_else(offset_too_large)?;

        self.position += super::tree::usize_to_u64(buf.len());
        Ok(buf.len())
    }

    /// Does nothing other than check that the handle is open, as the file is already backed
    /// by an in-memory buffer.
    #[inline]
    fn flush(&mut self) -> IoResult<()> {
        Ok(self.check_open()?)
    }
}

impl Seek for MemoryFile {
    /// Move the file cursor. Seeking past the end of the file is permitted; seeking to a
    /// negative position is an `InvalidInput` error.
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed, or if the new position would be negative or overflow.
    fn seek(&mut self, pos: SeekFrom) -> IoResult<u64> {
        self.check_open()?;

        let new_position = match pos {
            SeekFrom::Start(offset)   => Some(offset),
            SeekFrom::Current(offset) => self.position.checked_add_signed(offset),
            SeekFrom::End(offset)     => self.len().checked_add_signed(offset),
        };

        let new_position = new_position.ok_or_else(|| Error::InvalidSeek(self.name.clone()))?;
        self.position = new_position;
        Ok(new_position)
    }
}

impl VfsFile for MemoryFile {
    #[inline]
    fn name(&self) -> &Path {
        &self.name
    }

    /// Mark the handle as closed. The file itself, and other handles to it, are unaffected.
    ///
    /// # Errors
    ///
    /// Returns a `Closed` error if the handle was already closed.
    fn close(&mut self) -> IoResult<()> {
        self.check_open()?;
        self.closed = true;
        Ok(())
    }
}
