use std::{cell::{Cell, RefCell}, rc::Rc};
use std::{ffi::{OsStr, OsString}, path::Path};

use tracing::Level as LogLevel;

use crate::{MAX_TEMP_FILE_ATTEMPTS, metadata::Metadata, open_flags::OpenFlags};
use crate::{fs_traits::{Filesystem, StorageId}, path::{join_paths, temp_file_name}};
use super::{
    error::Error,
    file::MemoryFile,
    path::NormalizedPathBuf,
    tree::{DirectoryNode, Resolved},
};


#[expect(
    clippy::doc_markdown,
    reason = "There are no backticks around MemoryFS in the header, as it is already in quotes \
              and looks better in the header without both IMO.",
)]
/// An in-memory virtual filesystem. Supports files and directories, but not symlinks, hard links,
/// permissions, or other special files and behavior.
///
/// A `MemoryFS` is a cheap handle onto a directory tree. Views created with [`dir`] (or with
/// `clone`) share the same tree, so a file created through one view is visible through every
/// other. Nothing is synchronized: the tree, and the files in it, are `!Send` and `!Sync`.
///
/// ### Filesystem Paths
///
/// Paths provided to a `MemoryFS` are joined onto its [`base`] and then normalized to handle any
/// `..` and `.` components. Note that in the root directory, using `..` is not an error, and
/// refers to the root directory; in particular, `..` can be used to leave the base of a view.
/// Any [Windows prefix] component is ignored, and an absolute path is treated the same as a
/// relative one: it is still joined onto the base.
///
/// ### "MemoryFS" files
///
/// Opening a file with the `CREATE` flag also creates any missing parent directories.
/// Every handle opened on a path shares one [`ContentBuffer`]; opening with `TRUNC` empties that
/// buffer for every handle at once.
///
/// [`dir`]: Filesystem::dir
/// [`base`]: Filesystem::base
/// [`ContentBuffer`]: super::ContentBuffer
/// [Windows prefix]: std::path::Component::Prefix
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    /// Always absolute and normalized.
    base:       NormalizedPathBuf,
    tree:       Rc<RefCell<DirectoryNode>>,
    /// The sequence number of the most recent temporary file name candidate. Each view counts
    /// separately.
    temp_count: Cell<u64>,
}

impl MemoryFS {
    /// Create an empty `MemoryFS` containing only the root directory, with a base of `/`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `self` and `other` are views onto the same directory tree.
    #[inline]
    #[must_use]
    pub fn shares_tree_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree)
    }

    /// Access the bytes of the file at the indicated path, without opening a handle.
    ///
    /// # Panics
    /// If the provided callback writes to the same file through a [`MemoryFile`], a panic
    /// occurs. Other filesystem operations, including opening and reading files, are fine.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` or `IsADirectory` error if a file does not exist at the given path.
    pub fn access_file<T, F>(&self, path: &Path, callback: F) -> Result<T, Error>
    where
        F: FnOnce(&[u8]) -> T,
    {
        let full_path = self.full_path(path);

        let buffer = match self.tree.borrow().resolve(&full_path)? {
            Resolved::File(buffer)   => buffer.clone(),
            Resolved::Directory(_) => return Err(Error::IsADirectory(full_path.into_inner())),
        };

        Ok(buffer.with_bytes(callback))
    }

    /// Join `path` onto the base of this view, and normalize the result.
    fn full_path(&self, path: &Path) -> NormalizedPathBuf {
        self.base.join_normalized(path)
    }

    /// Create a temporary file in `dir`, trying the names produced by `candidate_name` for
    /// successive sequence numbers until one is unused.
    fn temp_file_named_by<F>(
        &self,
        dir:            &Path,
        prefix:         &str,
        candidate_name: F,
    ) -> Result<MemoryFile, Error>
    where
        F: Fn(&str, u64) -> String,
    {
        for _ in 0..MAX_TEMP_FILE_ATTEMPTS {
            let sequence = self.temp_count.get().wrapping_add(1);
            self.temp_count.set(sequence);

            let name = candidate_name(prefix, sequence);
            let path = join_paths(&[dir, Path::new(&name)]);
            let full_path = self.full_path(&path);

            let taken = self.tree.borrow().find(&full_path)?.is_some();
            if !taken {
                return self.create(&path);
            }

            tracing::event!(
                LogLevel::DEBUG,
                "temporary file candidate {full_path:?} already exists in a MemoryFS",
            );
        }

        tracing::event!(
            LogLevel::DEBUG,
            "gave up creating a temporary file in {dir:?} after {MAX_TEMP_FILE_ATTEMPTS} attempts",
        );
        Err(Error::TempFilesExhausted { attempts: MAX_TEMP_FILE_ATTEMPTS })
    }
}

/// The name of the entry at `path`, as reported in its metadata.
fn entry_name(path: &NormalizedPathBuf) -> OsString {
    path.file_name()
        .map_or_else(|| OsString::from("/"), OsStr::to_os_string)
}

impl Filesystem for MemoryFS {
    type File  = MemoryFile;
    type Error = Error;

    /// Open a file with the given [`OpenFlags`].
    ///
    /// If `TRUNC` is set, the file is emptied for every handle which shares it; if `APPEND` is
    /// also set, truncation happens first. `mode` is ignored.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file or a parent directory is missing and `CREATE` is not set.
    /// - `IsADirectory` if the path is a directory.
    /// - `NotADirectory` if a parent of the path is a file.
    fn open_file(
        &self,
        path:  &Path,
        flags: OpenFlags,
        _mode: u32,
    ) -> Result<Self::File, Self::Error> {
        let full_path = self.full_path(path);
        let content = self.tree.borrow_mut().open_file(&full_path, flags.is_create())?;

        if flags.is_truncate() {
            content.truncate();
        }

        let name = full_path.relative_to(&self.base);
        Ok(MemoryFile::open(name, content, flags))
    }

    /// Returns the metadata of the file or directory at the provided path. The size of a
    /// directory is its number of entries.
    fn stat(&self, path: &Path) -> Result<Metadata, Self::Error> {
        let full_path = self.full_path(path);
        let tree = self.tree.borrow();

        Ok(tree.resolve(&full_path)?.metadata(entry_name(&full_path)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<Metadata>, Self::Error> {
        let full_path = self.full_path(path);
        let tree = self.tree.borrow();

        match tree.resolve(&full_path)? {
            Resolved::Directory(dir) => {
                Ok(dir
                    .entries()
                    .map(|(name, entry)| entry.metadata(name.to_os_string()))
                    .collect())
            }
            Resolved::File(_) => Err(Error::NotADirectory(full_path.to_path_buf())),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Self::Error> {
        self.tree.borrow_mut().create_dir_all(&self.full_path(path))
    }

    /// Move the file or directory at `from` to `to`. Open handles to a moved file stay attached
    /// to it.
    ///
    /// A file may replace a file, and a directory may replace an empty directory. Missing parent
    /// directories of `to` are created. Renaming an entry to its own path does nothing.
    fn rename(&self, from: &Path, to: &Path) -> Result<(), Self::Error> {
        self.tree
            .borrow_mut()
            .rename(&self.full_path(from), &self.full_path(to))
    }

    /// Remove the file or empty directory at the provided path. Open handles to a removed file
    /// can still be used, but the file can no longer be opened by path.
    fn remove(&self, path: &Path) -> Result<(), Self::Error> {
        self.tree.borrow_mut().remove(&self.full_path(path))
    }

    /// Create a new file named `<prefix>_<sequence number>_<timestamp>` in `dir` (and create
    /// `dir` if necessary), and open it for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns a `TempFilesExhausted` error if [`MAX_TEMP_FILE_ATTEMPTS`] candidate names
    /// are all taken.
    fn temp_file(&self, dir: &Path, prefix: &str) -> Result<Self::File, Self::Error> {
        self.temp_file_named_by(dir, prefix, temp_file_name)
    }

    /// Return a view of the same directory tree, whose base is `path` joined onto the current
    /// base. The directory at `path` need not exist yet.
    fn dir(&self, path: &Path) -> Self {
        Self {
            base:       self.full_path(path),
            tree:       Rc::clone(&self.tree),
            temp_count: Cell::new(0),
        }
    }

    #[inline]
    fn base(&self) -> &Path {
        &self.base
    }

    /// Every view of one directory tree has the same id, which differs from the id of any other
    /// live tree.
    #[inline]
    fn storage_id(&self) -> Option<StorageId> {
        Some(StorageId::Memory(Rc::as_ptr(&self.tree).addr()))
    }
}
