use std::{cell::Cell, ffi::OsString};
use std::{
    fs::{self, File, Metadata as StdMetadata, OpenOptions},
    io::{Error as IoError, ErrorKind, Read, Result as IoResult, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use tracing::Level as LogLevel;

use crate::{MAX_TEMP_FILE_ATTEMPTS, error::FileClosed, metadata::Metadata};
use crate::{fs_traits::{Filesystem, StorageId}, open_flags::OpenFlags};
use crate::{path::{join_paths, temp_file_name}, util_traits::{RandomAccess, VfsFile}};
use super::platform;


/// A [`Filesystem`] backed by the host's filesystem, through `std::fs`.
///
/// Every path is joined onto the [`base`] with [`join_paths`], so an absolute path is still
/// treated as relative to the base. Note that `..` components can leave the base.
///
/// [`base`]: Filesystem::base
#[derive(Debug, Clone)]
pub struct StandardFS {
    base:       PathBuf,
    /// The sequence number of the most recent temporary file name candidate.
    temp_count: Cell<u64>,
}

impl StandardFS {
    /// Create a `StandardFS` whose paths are relative to `base`. The base directory need not
    /// exist yet.
    #[inline]
    #[must_use]
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base:       base.into(),
            temp_count: Cell::new(0),
        }
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        join_paths(&[&self.base, path])
    }

    /// The path of `full_path` relative to the base, or the whole path if it has left the base.
    fn relative_name(&self, full_path: &Path) -> PathBuf {
        full_path
            .strip_prefix(&self.base)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| full_path.to_path_buf())
    }
}

/// Create the parent directory of `path`, if it has one.
fn create_parent_dir(path: &Path) -> IoResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn convert_metadata(name: OsString, metadata: &StdMetadata) -> Metadata {
    let converted = if metadata.is_dir() {
        Metadata::new_dir(name, metadata.len())
    } else {
        Metadata::new_file(name, metadata.len())
    };

    converted.with_mode_and_modified(platform::mode_of(metadata), metadata.modified().ok())
}

impl Filesystem for StandardFS {
    type File  = StandardFile;
    type Error = IoError;

    /// Open a file with the given [`OpenFlags`], through [`OpenOptions`].
    ///
    /// With `CREATE`, missing parent directories are created first, and on Unix, `mode` is the
    /// permission mode of a newly-created file. `APPEND` only moves the initial file cursor to
    /// the end of the file, as with [`MemoryFS`]; writes are not forced to the end.
    ///
    /// # Errors
    ///
    /// Any error from the host filesystem is returned. Note that `std` rejects `CREATE` or
    /// `TRUNC` on a handle which is not writable.
    ///
    /// [`MemoryFS`]: crate::memory_fs::MemoryFS
    fn open_file(
        &self,
        path:  &Path,
        flags: OpenFlags,
        mode:  u32,
    ) -> Result<Self::File, Self::Error> {
        let full_path = self.full_path(path);

        if flags.is_create() {
            create_parent_dir(&full_path)?;
        }

        let mut options = OpenOptions::new();
        options
            .read(flags.is_readable())
            .write(flags.is_writable())
            .create(flags.is_create())
            .truncate(flags.is_truncate());
        platform::set_creation_mode(&mut options, mode);

        let mut file = options.open(&full_path)?;
        if flags.is_append() {
            file.seek(SeekFrom::End(0))?;
        }

        Ok(StandardFile::new(file, self.relative_name(&full_path)))
    }

    /// Returns the metadata of the file or directory at the provided path, with the real mode
    /// and modification time.
    fn stat(&self, path: &Path) -> Result<Metadata, Self::Error> {
        let full_path = self.full_path(path);
        let metadata = fs::metadata(&full_path)?;

        let name = full_path
            .file_name()
            .map_or_else(|| OsString::from("/"), ToOwned::to_owned);

        Ok(convert_metadata(name, &metadata))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<Metadata>, Self::Error> {
        fs::read_dir(self.full_path(path))?
            .map(|entry| {
                let entry = entry?;
                Ok(convert_metadata(entry.file_name(), &entry.metadata()?))
            })
            .collect()
    }

    #[inline]
    fn create_dir_all(&self, path: &Path) -> Result<(), Self::Error> {
        fs::create_dir_all(self.full_path(path))
    }

    /// Move the file or directory at `from` to `to`, with [`fs::rename`]. Missing parent
    /// directories of `to` are created.
    fn rename(&self, from: &Path, to: &Path) -> Result<(), Self::Error> {
        let from = self.full_path(from);
        let to = self.full_path(to);

        // Don't create the destination's parents if there's nothing to move.
        fs::symlink_metadata(&from)?;
        create_parent_dir(&to)?;

        fs::rename(from, to)
    }

    /// Remove the file or empty directory at the provided path.
    fn remove(&self, path: &Path) -> Result<(), Self::Error> {
        let full_path = self.full_path(path);

        if fs::symlink_metadata(&full_path)?.is_dir() {
            fs::remove_dir(full_path)
        } else {
            fs::remove_file(full_path)
        }
    }

    /// Create a new file named `<prefix>_<sequence number>_<timestamp>` in `dir` (and create
    /// `dir` if necessary), and open it for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns an error of kind [`ErrorKind::AlreadyExists`] if [`MAX_TEMP_FILE_ATTEMPTS`]
    /// candidate names are all taken.
    fn temp_file(&self, dir: &Path, prefix: &str) -> Result<Self::File, Self::Error> {
        fs::create_dir_all(self.full_path(dir))?;

        for _ in 0..MAX_TEMP_FILE_ATTEMPTS {
            let sequence = self.temp_count.get().wrapping_add(1);
            self.temp_count.set(sequence);

            let name = temp_file_name(prefix, sequence);
            let full_path = self.full_path(&join_paths(&[dir, Path::new(&name)]));

            let opened = OpenOptions::new()
                .read(true)
                .write(true)
                .create_new(true)
                .open(&full_path);

            match opened {
                Ok(file) => return Ok(StandardFile::new(file, self.relative_name(&full_path))),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    tracing::event!(
                        LogLevel::DEBUG,
                        "temporary file candidate {full_path:?} already exists",
                    );
                }
                Err(err) => return Err(err),
            }
        }

        tracing::event!(
            LogLevel::DEBUG,
            "gave up creating a temporary file in {dir:?} after {MAX_TEMP_FILE_ATTEMPTS} attempts",
        );
        Err(IoError::new(
            ErrorKind::AlreadyExists,
            format!("could not find an unused temporary file name after {MAX_TEMP_FILE_ATTEMPTS} attempts"),
        ))
    }

    /// Return a `StandardFS` whose base is `path` joined onto the current base.
    fn dir(&self, path: &Path) -> Self {
        Self::new(self.full_path(path))
    }

    #[inline]
    fn base(&self) -> &Path {
        &self.base
    }

    #[inline]
    fn storage_id(&self) -> Option<StorageId> {
        Some(StorageId::Host)
    }
}

/// An open file of a [`StandardFS`].
///
/// Closing the handle closes the underlying [`File`]; after that, every I/O method fails with
/// a [`FileClosed`] error.
#[derive(Debug)]
pub struct StandardFile {
    file: Option<File>,
    name: PathBuf,
}

impl StandardFile {
    #[inline]
    #[must_use]
    const fn new(file: File, name: PathBuf) -> Self {
        Self {
            file: Some(file),
            name,
        }
    }

    /// The underlying file, unless the handle has been closed.
    #[inline]
    #[must_use]
    pub const fn get_ref(&self) -> Option<&File> {
        self.file.as_ref()
    }

    #[inline]
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    fn inner_file(&self) -> Result<&File, FileClosed> {
        self.file
            .as_ref()
            .ok_or_else(|| FileClosed(self.name.clone()))
    }
}

impl Read for StandardFile {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        let mut file = self.inner_file()?;
        file.read(buf)
    }
}

impl RandomAccess for StandardFile {
    /// Read from `offset`, leaving the file cursor where it was.
    #[inline]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
        platform::read_at_keeping_cursor(self.inner_file()?, offset, buf)
    }
}

impl Write for StandardFile {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        let mut file = self.inner_file()?;
        file.write(buf)
    }

    #[inline]
    fn flush(&mut self) -> IoResult<()> {
        let mut file = self.inner_file()?;
        file.flush()
    }
}

impl Seek for StandardFile {
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> IoResult<u64> {
        let mut file = self.inner_file()?;
        file.seek(pos)
    }
}

impl VfsFile for StandardFile {
    #[inline]
    fn name(&self) -> &Path {
        &self.name
    }

    /// Close the underlying [`File`].
    ///
    /// # Errors
    ///
    /// Returns a [`FileClosed`] error if the handle was already closed.
    fn close(&mut self) -> IoResult<()> {
        let file = self.file.take().ok_or_else(|| FileClosed(self.name.clone()))?;
        drop(file);
        Ok(())
    }
}
