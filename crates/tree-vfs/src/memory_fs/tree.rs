use std::ffi::{OsStr, OsString};

use hashbrown::HashMap;
use tracing::Level as LogLevel;

use crate::metadata::Metadata;
use super::{content::ContentBuffer, error::Error, path::NormalizedPathBuf};


/// An entry of a [`DirectoryNode`].
#[derive(Debug)]
pub(crate) enum Node {
    Directory(DirectoryNode),
    File(ContentBuffer),
}

impl Node {
    #[inline]
    #[must_use]
    pub(crate) const fn as_resolved(&self) -> Resolved<'_> {
        match self {
            Self::Directory(dir) => Resolved::Directory(dir),
            Self::File(buffer)   => Resolved::File(buffer),
        }
    }
}

/// The result of resolving a path in the directory tree.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Resolved<'a> {
    Directory(&'a DirectoryNode),
    File(&'a ContentBuffer),
}

impl Resolved<'_> {
    /// The metadata of the resolved entry, which is named `name` in its parent directory.
    ///
    /// The size of a directory is its number of entries, and the size of a file is its length.
    #[must_use]
    pub(crate) fn metadata(self, name: OsString) -> Metadata {
        match self {
            Self::Directory(dir) => Metadata::new_dir(name, usize_to_u64(dir.len())),
            Self::File(buffer)   => Metadata::new_file(name, usize_to_u64(buffer.len())),
        }
    }
}

/// A directory in a [`MemoryFS`].
///
/// Files and child directories share one map, so a name can never refer to both a file and a
/// directory in the same parent.
///
/// [`MemoryFS`]: super::fs::MemoryFS
#[derive(Debug, Default)]
pub(crate) struct DirectoryNode {
    entries: HashMap<OsString, Node>,
}

impl DirectoryNode {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The number of files and directories directly inside this directory.
    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries directly inside this directory, in an unspecified order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&OsStr, Resolved<'_>)> {
        self.entries
            .iter()
            .map(|(name, node)| (name.as_os_str(), node.as_resolved()))
    }

    /// Find the entry at `path`.
    ///
    /// Returns `Ok(None)` if nothing exists at `path` or at one of its parents.
    ///
    /// # Errors
    ///
    /// Returns a `NotADirectory` error if a parent of `path` is a file.
    pub(crate) fn find(&self, path: &NormalizedPathBuf) -> Result<Option<Resolved<'_>>, Error> {
        let segments = path.segments();
        let Some((last, parents)) = segments.split_last() else {
            return Ok(Some(Resolved::Directory(self)));
        };

        let mut dir = self;
        for segment in parents {
            dir = match dir.entries.get(*segment) {
                Some(Node::Directory(child)) => child,
                Some(Node::File(_))          => {
                    return Err(Error::NotADirectory(path.to_path_buf()));
                }
                None                         => return Ok(None),
            };
        }

        Ok(dir.entries.get(*last).map(Node::as_resolved))
    }

    /// Find the entry at `path`, which must exist.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error if nothing exists at `path`, or a `NotADirectory` error if a
    /// parent of `path` is a file.
    pub(crate) fn resolve(&self, path: &NormalizedPathBuf) -> Result<Resolved<'_>, Error> {
        self.find(path)?
            .ok_or_else(|| Error::NotFound(path.to_path_buf()))
    }

    /// Walk down through `segments`, which are the leading segments of `path`, and return the
    /// directory they name. If `create` is set, missing directories are created along the way.
    ///
    /// # Errors
    ///
    /// Returns a `NotADirectory` error if one of the segments names a file, or a `NotFound`
    /// error if one is missing and `create` is not set.
    fn walk_mut(
        &mut self,
        segments: &[&OsStr],
        create:   bool,
        path:     &NormalizedPathBuf,
    ) -> Result<&mut Self, Error> {
        let mut dir = self;

        for &segment in segments {
            if create && !dir.entries.contains_key(segment) {
                tracing::event!(
                    LogLevel::TRACE,
                    "creating missing directory {segment:?} on the way to {path:?} in a MemoryFS",
                );
                dir.entries.insert(segment.to_owned(), Node::Directory(Self::new()));
            }

            dir = match dir.entries.get_mut(segment) {
                Some(Node::Directory(child)) => child,
                Some(Node::File(_))          => {
                    return Err(Error::NotADirectory(path.to_path_buf()));
                }
                None                         => return Err(Error::NotFound(path.to_path_buf())),
            };
        }

        Ok(dir)
    }

    /// Get the buffer of the file at `path`. If `create` is set, the file and any missing
    /// parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an `IsADirectory` error if `path` is a directory, a `NotADirectory` error if a
    /// parent of `path` is a file, or a `NotFound` error if the file (or a parent) is missing
    /// and `create` is not set.
    pub(crate) fn open_file(
        &mut self,
        path:   &NormalizedPathBuf,
        create: bool,
    ) -> Result<ContentBuffer, Error> {
        let segments = path.segments();
        let Some((&last, parents)) = segments.split_last() else {
            return Err(Error::IsADirectory(path.to_path_buf()));
        };

        let parent = self.walk_mut(parents, create, path)?;

        match parent.entries.get(last) {
            Some(Node::File(buffer))  => Ok(buffer.clone()),
            Some(Node::Directory(_))  => Err(Error::IsADirectory(path.to_path_buf())),
            None if create            => {
                tracing::event!(LogLevel::TRACE, "creating file {path:?} in a MemoryFS");

                let buffer = ContentBuffer::new();
                parent.entries.insert(last.to_owned(), Node::File(buffer.clone()));
                Ok(buffer)
            }
            None                      => Err(Error::NotFound(path.to_path_buf())),
        }
    }

    /// Create the directory at `path` and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns a `NotADirectory` error if `path` or one of its parents is a file.
    pub(crate) fn create_dir_all(&mut self, path: &NormalizedPathBuf) -> Result<(), Error> {
        self.walk_mut(&path.segments(), true, path).map(|_| ())
    }

    /// Remove the file or empty directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error if nothing exists at `path`, a `DirectoryNotEmpty` error if
    /// `path` is a directory with entries, a `RootDirectory` error if `path` is the root, or a
    /// `NotADirectory` error if a parent of `path` is a file.
    pub(crate) fn remove(&mut self, path: &NormalizedPathBuf) -> Result<(), Error> {
        let segments = path.segments();
        let Some((&last, parents)) = segments.split_last() else {
            return Err(Error::RootDirectory);
        };

        let parent = self.walk_mut(parents, false, path)?;

        match parent.entries.get(last) {
            None => Err(Error::NotFound(path.to_path_buf())),
            Some(Node::Directory(dir)) if !dir.is_empty() => {
                Err(Error::DirectoryNotEmpty(path.to_path_buf()))
            }
            Some(_) => {
                parent.entries.remove(last);
                Ok(())
            }
        }
    }

    /// Move the entry at `from` to `to`, without copying any file contents.
    ///
    /// A file may replace a file, and a directory may replace an empty directory. Missing parent
    /// directories of `to` are created.
    ///
    /// # Errors
    ///
    /// - `NotFound` if nothing exists at `from`.
    /// - `RootDirectory` if either path is the root directory.
    /// - `MoveIntoSelf` if `from` is a directory and `to` is inside it.
    /// - `IsADirectory` if `from` is a file and `to` is a directory.
    /// - `NotADirectory` if `from` is a directory and `to` is a file, or if a parent of either
    ///   path is a file.
    /// - `DirectoryNotEmpty` if `from` is a directory and `to` is a nonempty directory.
    pub(crate) fn rename(
        &mut self,
        from: &NormalizedPathBuf,
        to:   &NormalizedPathBuf,
    ) -> Result<(), Error> {
        let from_is_dir = match self.resolve(from)? {
            Resolved::Directory(_) => true,
            Resolved::File(_)      => false,
        };

        if from.is_root() || to.is_root() {
            return Err(Error::RootDirectory);
        }
        if from == to {
            return Ok(());
        }
        if from_is_dir && to.starts_with(from) {
            return Err(Error::MoveIntoSelf(from.to_path_buf()));
        }

        match (from_is_dir, self.find(to)?) {
            (_, None) | (false, Some(Resolved::File(_))) => {}
            (false, Some(Resolved::Directory(_))) => {
                return Err(Error::IsADirectory(to.to_path_buf()));
            }
            (true, Some(Resolved::File(_))) => {
                return Err(Error::NotADirectory(to.to_path_buf()));
            }
            (true, Some(Resolved::Directory(dir))) => {
                // Only the destination's direct entries are checked.
                if !dir.is_empty() {
                    return Err(Error::DirectoryNotEmpty(to.to_path_buf()));
                }
            }
        }

        let from_segments = from.segments();
        let to_segments = to.segments();
        let (Some((&from_name, from_parents)), Some((&to_name, to_parents))) =
            (from_segments.split_last(), to_segments.split_last())
        else {
            return Err(Error::RootDirectory);
        };

        // Creating the destination's parents first can't disturb the source, since `to` is not
        // inside `from`.
        self.walk_mut(to_parents, true, to)?;

        let node = self
            .walk_mut(from_parents, false, from)?
            .entries
            .remove(from_name)
            .ok_or_else(|| Error::NotFound(from.to_path_buf()))?;

        self.walk_mut(to_parents, false, to)?
            .entries
            .insert(to_name.to_owned(), node);

        Ok(())
    }
}

/// Convert a buffer length or entry count into a `u64`, saturating on targets where `usize`
/// is wider.
#[inline]
#[must_use]
pub(crate) fn usize_to_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
