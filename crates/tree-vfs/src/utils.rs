use std::{fmt::Display, path::{Path, PathBuf}};
use std::io::{self, Error as IoError};

use thiserror::Error;
use tracing::Level as LogLevel;

use crate::{fs_traits::Filesystem, util_traits::{FSError, VfsFile}};


/// The error of copying between two filesystems, which may have different error types.
#[derive(Error, Debug)]
pub enum CopyError<SrcErr, DstErr> {
    #[error("error from the source filesystem: {0}")]
    Source(SrcErr),
    #[error("error from the destination filesystem: {0}")]
    Destination(DstErr),
    /// An error while reading, writing, or closing a file.
    #[error("error while copying file contents: {0}")]
    Io(#[from] IoError),
    /// A directory cannot be copied to a path inside itself.
    #[error("cannot copy the directory at {from:?} into itself, at {to:?}")]
    IntoSelf {
        from: PathBuf,
        to:   PathBuf,
    },
}

impl<SrcErr: FSError, DstErr: FSError> FSError for CopyError<SrcErr, DstErr> {
    fn is_not_found(&self) -> bool {
        match self {
            Self::Source(err)      => err.is_not_found(),
            Self::Destination(err) => err.is_not_found(),
            Self::Io(err)          => err.is_not_found(),
            Self::IntoSelf { .. }  => false,
        }
    }

    fn is_interrupted(&self) -> bool {
        match self {
            Self::Source(err)      => err.is_interrupted(),
            Self::Destination(err) => err.is_interrupted(),
            Self::Io(err)          => err.is_interrupted(),
            Self::IntoSelf { .. }  => false,
        }
    }

    fn is_not_a_directory(&self) -> bool {
        match self {
            Self::Source(err)      => err.is_not_a_directory(),
            Self::Destination(err) => err.is_not_a_directory(),
            Self::Io(err)          => err.is_not_a_directory(),
            Self::IntoSelf { .. }  => false,
        }
    }

    fn is_a_directory(&self) -> bool {
        match self {
            Self::Source(err)      => err.is_a_directory(),
            Self::Destination(err) => err.is_a_directory(),
            Self::Io(err)          => err.is_a_directory(),
            Self::IntoSelf { .. }  => false,
        }
    }

    fn is_directory_not_empty(&self) -> bool {
        match self {
            Self::Source(err)      => err.is_directory_not_empty(),
            Self::Destination(err) => err.is_directory_not_empty(),
            Self::Io(err)          => err.is_directory_not_empty(),
            Self::IntoSelf { .. }  => false,
        }
    }
}

/// Check whether anything exists at `path`.
///
/// # Errors
///
/// Any error from [`Filesystem::stat`] other than a not-found error is returned.
pub fn exists<FS: Filesystem>(fs: &FS, path: &Path) -> Result<bool, FS::Error> {
    match fs.stat(path) {
        Ok(_)                         => Ok(true),
        Err(err) if err.is_not_found() => Ok(false),
        Err(err)                      => Err(err),
    }
}

/// Copy the file at `src_path` in `src` to `dst_path` in `dst`, replacing any file already at
/// `dst_path` (and creating its missing parent directories).
///
/// The two filesystems may be the same, and may have different backends. If both paths refer to
/// the same file of the same [storage], nothing is copied and `Ok(())` is returned.
///
/// # Errors
///
/// If opening, copying, or closing either file fails, then both files are closed, the
/// destination file is removed, and the first error is returned. Errors during that cleanup
/// are only logged.
///
/// [storage]: Filesystem::storage_id
pub fn copy_file<Src, Dst>(
    src:      &Src,
    dst:      &Dst,
    src_path: &Path,
    dst_path: &Path,
) -> Result<(), CopyError<Src::Error, Dst::Error>>
where
    Src: Filesystem,
    Dst: Filesystem,
{
    let mut src_file = src.open(src_path).map_err(CopyError::Source)?;

    // Creating the destination would truncate the source.
    if let Some((src_full, dst_full)) = shared_full_paths(src, dst, src_path, dst_path) {
        if src_full == dst_full {
            tracing::event!(LogLevel::DEBUG, "not copying {src_full:?} onto itself");
            log_cleanup_error("closing the source file", src_file.close());
            return Ok(());
        }
    }

    let mut dst_file = match dst.create(dst_path) {
        Ok(dst_file) => dst_file,
        Err(err) => {
            log_cleanup_error("closing the source file", src_file.close());
            // The file might or might not have been created. Never remove a directory here.
            if dst.stat(dst_path).is_ok_and(|metadata| !metadata.is_dir()) {
                log_cleanup_error("removing the destination file", dst.remove(dst_path));
            }
            return Err(CopyError::Destination(err));
        }
    };

    if let Err(err) = io::copy(&mut src_file, &mut dst_file) {
        log_cleanup_error("closing the destination file", dst_file.close());
        log_cleanup_error("removing the destination file", dst.remove(dst_path));
        log_cleanup_error("closing the source file", src_file.close());
        return Err(CopyError::Io(err));
    }

    if let Err(err) = src_file.close() {
        log_cleanup_error("closing the destination file", dst_file.close());
        log_cleanup_error("removing the destination file", dst.remove(dst_path));
        return Err(CopyError::Io(err));
    }

    if let Err(err) = dst_file.close() {
        log_cleanup_error("removing the destination file", dst.remove(dst_path));
        return Err(CopyError::Io(err));
    }

    Ok(())
}

/// Copy the file or directory at `src_path` in `src` to `dst_path` in `dst`.
///
/// Files are copied with [`copy_file`]. For a directory, its entries are listed, the
/// destination directory is created, and then every listed entry is copied recursively.
///
/// # Errors
///
/// Returns an `IntoSelf` error, before copying anything, if both filesystems are views of the
/// same [storage] and the destination is the source directory or is inside it.
///
/// The first error is returned, and copying stops. Entries copied before the error are left
/// in place.
///
/// [storage]: Filesystem::storage_id
pub fn copy_recursive<Src, Dst>(
    src:      &Src,
    dst:      &Dst,
    src_path: &Path,
    dst_path: &Path,
) -> Result<(), CopyError<Src::Error, Dst::Error>>
where
    Src: Filesystem,
    Dst: Filesystem,
{
    if !src.stat(src_path).map_err(CopyError::Source)?.is_dir() {
        return copy_file(src, dst, src_path, dst_path);
    }

    if let Some((src_full, dst_full)) = shared_full_paths(src, dst, src_path, dst_path) {
        if dst_full.starts_with(&src_full) {
            return Err(CopyError::IntoSelf {
                from: src_full,
                to:   dst_full,
            });
        }
    }

    // List the entries before the destination is created, since it might be among them.
    let entries = src.read_dir(src_path).map_err(CopyError::Source)?;
    dst.create_dir_all(dst_path).map_err(CopyError::Destination)?;

    for entry in entries {
        let name = Path::new(entry.name());

        copy_recursive(
            src,
            dst,
            &src.join(&[src_path, name]),
            &dst.join(&[dst_path, name]),
        )?;
    }

    Ok(())
}

/// The full paths of `src_path` and `dst_path`, if `src` and `dst` are views of the same
/// storage.
fn shared_full_paths<Src, Dst>(
    src:      &Src,
    dst:      &Dst,
    src_path: &Path,
    dst_path: &Path,
) -> Option<(PathBuf, PathBuf)>
where
    Src: Filesystem,
    Dst: Filesystem,
{
    let storage = src.storage_id()?;
    if dst.storage_id() != Some(storage) {
        return None;
    }

    Some((src.join(&[src.base(), src_path]), dst.join(&[dst.base(), dst_path])))
}

fn log_cleanup_error<E: Display>(step: &str, result: Result<(), E>) {
    if let Err(err) = result {
        tracing::event!(LogLevel::DEBUG, "error while {step} after a failed copy: {err}");
    }
}
