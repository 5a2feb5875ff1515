use std::{error::Error, path::Path};
use std::io::{Error as IoError, ErrorKind, Read, Result as IoResult, Seek, Write};


/// A file interface for reading at arbitrary positions without moving a file cursor.
///
/// This is the `ReadAt` half of a [`VfsFile`]; the file cursor used by [`Read`], [`Write`] and
/// [`Seek`] is neither read nor changed by these methods.
///
/// [`Read`]: std::io::Read
/// [`Seek`]: std::io::Seek
/// [`Write`]: std::io::Write
pub trait RandomAccess {
    /// Read up to `buf.len()`-many bytes from the file, starting at `offset`.
    ///
    /// On success, the number of bytes read is returned; this has the same semantics as the
    /// return value of [`read`]. In particular, `Ok(0)` with a nonempty `buf` indicates that
    /// `offset` is at or beyond the end of the file.
    ///
    /// [`read`]: std::io::Read::read
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize>;

    /// Attempt to read exactly `buf.len()`-many bytes from the file, starting at `offset`.
    ///
    /// The function repeatedly calls [`read_at`] until either `buf.len()`-many bytes have been,
    /// or an error condition is met. Calls to [`read_at`] are retried when
    /// [`ErrorKind::Interrupted`] is returned.
    ///
    /// An error is returned both when [`read_at`] fails with a non-[`ErrorKind::Interrupted`]
    /// error, as well as when end-of-file is reached before `buf.len()`-many bytes are read.
    /// On error, the contents of `buf` are unspecified.
    /// This has the same semantics as as [`read_exact`], aside from the below caveat that will
    /// likely never apply:
    ///
    /// The buffer's length must fit in a u64;
    /// if the buffer isn't less than 16 exabytes in length, an error is returned.
    /// (Technically, this refers not to 16 decimal exabytes but 16 exbibytes or binary exabytes.)
    ///
    /// [`read_at`]: RandomAccess::read_at
    /// [`read_exact`]: std::io::Read::read_exact
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<()> {

        if u64::try_from(buf.len()).is_err() {
            return Err(IoError::other(
                "cannot read into a buffer with a length of 16 binary exabytes (EiB) or more",
            ));
        }

        let mut bytes_read = 0_usize;

        while bytes_read < buf.len() {
            // By the above check on `buf.len()`, and since `bytes_read` is smaller,
            // we know that `bytes_read` fits in a `u64`.
            #[expect(
                clippy::as_conversions,
                reason = "`bytes_read` is known to fit in u64",
            )]
            let bytes_read_u64 = bytes_read as u64;

            #[expect(
                clippy::indexing_slicing,
                reason = "`bytes_read < buf.len()`, so this does not panic",
            )]
            match self.read_at(offset + bytes_read_u64, &mut buf[bytes_read..]) {
                Ok(0) => break,
                Ok(additional_bytes) => {
                    bytes_read += additional_bytes;
                }
                #[expect(
                    clippy::ref_patterns,
                    reason = "the `Read::read_exact` impl uses `ref`",
                )]
                Err(ref err) if err.kind() == ErrorKind::Interrupted => {}
                Err(other_err) => return Err(other_err),
            }
        }

        if bytes_read == buf.len() {
            Ok(())
        } else {
            Err(ErrorKind::UnexpectedEof.into())
        }
    }
}

/// An open file handle obtained from a [`Filesystem`].
///
/// Each handle has its own file cursor, used by [`Read`], [`Write`] and [`Seek`], and its own
/// open/closed state. Once a handle is closed, every I/O method fails.
///
/// [`Filesystem`]: crate::fs_traits::Filesystem
pub trait VfsFile: Read + Write + Seek + RandomAccess {
    /// The path this handle was opened with, relative to the base of the filesystem which
    /// opened it.
    fn name(&self) -> &Path;

    /// Close the handle.
    ///
    /// # Errors
    ///
    /// Closing a handle which is already closed is an error. Implementations may also report
    /// errors from flushing data.
    fn close(&mut self) -> IoResult<()>;
}

/// Basic interface for the [`Filesystem::Error`] associated type.
///
/// [`Filesystem::Error`]: crate::fs_traits::Filesystem::Error
pub trait FSError: Error {
    /// Whether the error occurred because a file, directory, or other filesystem entry
    /// could not be found at a given path.
    fn is_not_found(&self) -> bool;
    /// Whether the error occurred because a read, write, or other process was interrupted.
    fn is_interrupted(&self) -> bool;
    /// Whether the error occurred because a directory was expected, but something else was found.
    fn is_not_a_directory(&self) -> bool;
    /// Whether the error occurred because a directory was found where it was not permitted.
    fn is_a_directory(&self) -> bool;
    /// Whether the error occurred because a directory which needed to be empty had entries.
    fn is_directory_not_empty(&self) -> bool;
}
