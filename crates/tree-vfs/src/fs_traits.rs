use std::path::{Path, PathBuf};

use crate::{metadata::Metadata, open_flags::OpenFlags, path::join_paths};
use crate::util_traits::{FSError, VfsFile};


// ================================================================
//  Main filesystem trait
// ================================================================

/// The operations shared by every filesystem backend in this crate.
///
/// Every path given to these methods is resolved relative to the filesystem's [`base`]; an
/// absolute path does not escape the base, it is joined onto it as with [`join_paths`].
///
/// Implementations are interchangeable: code written against `Filesystem` (such as
/// [`copy_file`]) works the same way for [`MemoryFS`] and [`StandardFS`].
///
/// [`base`]: Filesystem::base
/// [`copy_file`]: crate::utils::copy_file
/// [`MemoryFS`]: crate::memory_fs::MemoryFS
/// [`StandardFS`]: crate::std_fs::StandardFS
pub trait Filesystem {
    /// An open file handle.
    type File:  VfsFile;
    type Error: FSError;

    /// Create or truncate the file at the provided path, and open it for reading and writing.
    /// Any missing parent directories are created.
    ///
    /// Equivalent to [`open_file`] with `RDWR | CREATE | TRUNC`.
    ///
    /// [`open_file`]: Filesystem::open_file
    #[inline]
    fn create(&self, path: &Path) -> Result<Self::File, Self::Error> {
        self.open_file(path, OpenFlags::RDWR | OpenFlags::CREATE | OpenFlags::TRUNC, 0o666)
    }

    /// Open an existing file for reading.
    ///
    /// Equivalent to [`open_file`] with `RDONLY`.
    ///
    /// [`open_file`]: Filesystem::open_file
    #[inline]
    fn open(&self, path: &Path) -> Result<Self::File, Self::Error> {
        self.open_file(path, OpenFlags::RDONLY, 0)
    }

    /// Open a file with the given [`OpenFlags`], analogous to POSIX `open()`.
    ///
    /// `mode` is the permission mode a newly-created file should have, if the backend tracks
    /// permissions at all.
    fn open_file(
        &self,
        path:  &Path,
        flags: OpenFlags,
        mode:  u32,
    ) -> Result<Self::File, Self::Error>;

    /// Returns the metadata of the file or directory at the provided path.
    fn stat(&self, path: &Path) -> Result<Metadata, Self::Error>;

    /// Returns the metadata of every entry directly contained in the directory at the provided
    /// path, in an unspecified order.
    fn read_dir(&self, path: &Path) -> Result<Vec<Metadata>, Self::Error>;

    /// Create the directory at the provided path, along with any missing parent directories.
    /// Succeeds if the directory already exists.
    fn create_dir_all(&self, path: &Path) -> Result<(), Self::Error>;

    /// Move the file or directory at `from` to `to`.
    ///
    /// A file may replace an existing file, and a directory may replace an empty directory.
    fn rename(&self, from: &Path, to: &Path) -> Result<(), Self::Error>;

    /// Remove the file or empty directory at the provided path.
    fn remove(&self, path: &Path) -> Result<(), Self::Error>;

    /// Create a new file, with a name starting with `prefix`, in the directory `dir`, and open it
    /// for reading and writing.
    ///
    /// Only a bounded number of candidate names are tried before giving up.
    fn temp_file(&self, dir: &Path, prefix: &str) -> Result<Self::File, Self::Error>;

    /// Join path segments together, and lexically clean the result.
    ///
    /// See [`join_paths`].
    #[inline]
    #[must_use]
    fn join(&self, segments: &[&Path]) -> PathBuf {
        join_paths(segments)
    }

    /// Return a view of this filesystem rooted at `path`, relative to the current base.
    ///
    /// Mutations made through either view are visible through the other.
    #[must_use]
    fn dir(&self, path: &Path) -> Self
    where
        Self: Sized;

    /// The base path which paths given to this filesystem are relative to.
    fn base(&self) -> &Path;

    /// The storage which this filesystem is a view of, if known.
    ///
    /// If two filesystems return the same `StorageId`, then joining each one's [`base`] with a
    /// path gives a full path, and equal full paths refer to the same entry in both. Symbolic
    /// links are not taken into account.
    ///
    /// [`base`]: Filesystem::base
    #[inline]
    #[must_use]
    fn storage_id(&self) -> Option<StorageId> {
        None
    }
}

/// Identifies the storage behind a [`Filesystem`]; see [`Filesystem::storage_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageId {
    /// The host's filesystem.
    Host,
    /// The directory tree of a [`MemoryFS`], identified by its address. Every view of a tree
    /// has the same id.
    ///
    /// [`MemoryFS`]: crate::memory_fs::MemoryFS
    Memory(usize),
}
