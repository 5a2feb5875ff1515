use std::{ffi::{OsStr, OsString}, time::SystemTime};


/// Information about a file or directory, as returned by [`stat`] and [`read_dir`].
///
/// For a file, the size is its length in bytes. For a directory, the size is whatever the
/// backend reports; a [`MemoryFS`] reports the number of entries in the directory.
///
/// [`stat`]: crate::traits::Filesystem::stat
/// [`read_dir`]: crate::traits::Filesystem::read_dir
/// [`MemoryFS`]: crate::memory_fs::MemoryFS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    name:     OsString,
    size:     u64,
    is_dir:   bool,
    mode:     u32,
    modified: Option<SystemTime>,
}

impl Metadata {
    #[inline]
    #[must_use]
    pub fn new_file(name: OsString, size: u64) -> Self {
        Self {
            name,
            size,
            is_dir:   false,
            mode:     0,
            modified: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn new_dir(name: OsString, size: u64) -> Self {
        Self {
            name,
            size,
            is_dir:   true,
            mode:     0,
            modified: None,
        }
    }

    /// Set the permission mode and modification time, for backends which track them.
    #[inline]
    #[must_use]
    pub fn with_mode_and_modified(mut self, mode: u32, modified: Option<SystemTime>) -> Self {
        self.mode = mode;
        self.modified = modified;
        self
    }

    /// The final component of the entry's path.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// The permission bits of the entry. Nominal; `0` for backends without permissions.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }

    /// The last modification time, if the backend tracks it.
    #[inline]
    #[must_use]
    pub const fn modified(&self) -> Option<SystemTime> {
        self.modified
    }
}
