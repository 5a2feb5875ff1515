#![allow(
    clippy::missing_const_for_fn,
    reason = "`Path` and `PathBuf` cannot be constructed with `const` functions yet, anyway",
)]

use std::{ffi::OsStr, ops::Deref};
use std::path::{Component, Path, PathBuf};


/// A normalized [`PathBuf`] which is an absolute path containing no `..`, `.`, or [Windows prefix]
/// components.
///
/// Every path used to look up entries in the directory tree of a [`MemoryFS`] is normalized,
/// so that two spellings of the same path always resolve to the same entry.
///
/// [Windows prefix]: Component::Prefix
/// [`MemoryFS`]: super::fs::MemoryFS
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct NormalizedPathBuf(PathBuf);

impl NormalizedPathBuf {
    /// Create a new (normalized) path to the root directory.
    #[inline]
    #[must_use]
    pub(crate) fn root() -> Self {
        Self(PathBuf::from(Component::RootDir.as_os_str()))
    }

    /// Normalize a [`Path`] by evaluating `..` and `.` components, and converting any path into
    /// an absolute path, starting with `/`. Any [Windows prefix] is ignored, and relative paths
    /// are treated as relative paths starting at the root directory (i.e., as equivalent to
    /// absolute paths).
    ///
    /// Note that in the root directory, using `..` is not an error, and refers to the root
    /// directory.
    ///
    /// [Windows prefix]: Component::Prefix
    #[must_use]
    pub(crate) fn new(path: &Path) -> Self {
        let mut normalized = Self::root().0;

        for component in path.components() {
            // We ignore any Windows prefix like `C:`, ignore the root directory since it can
            // only possibly appear at the start of the path and we always add one above,
            // and ignore the `.` component since it does nothing.
            match component {
                Component::Prefix(_) | Component::RootDir | Component::CurDir => {},
                Component::ParentDir => {
                    // Note that `pop` does nothing if `normalized.parent()` is `None`,
                    // and that's the case for the root directory. Therefore, the "/" that we add
                    // when we first construct `normalized` can never be popped away.
                    normalized.pop();
                }
                Component::Normal(component) => {
                    normalized.push(component);
                }
            }
        }

        Self(normalized)
    }

    /// Normalize `path` as a path relative to `self`; an absolute `path` is still treated as
    /// relative to `self`.
    #[must_use]
    pub(crate) fn join_normalized(&self, path: &Path) -> Self {
        Self::new(&self.0.join(strip_root(path)))
    }

    /// The names of the directories and file along the path, starting below the root.
    /// The root directory itself has no segments.
    #[must_use]
    pub(crate) fn segments(&self) -> Vec<&OsStr> {
        self.0
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name),
                _                       => None,
            })
            .collect()
    }

    /// Whether this is the root directory.
    #[inline]
    #[must_use]
    pub(crate) fn is_root(&self) -> bool {
        self.0.parent().is_none()
    }

    /// The path of `self` relative to `base`, or the whole path if `self` is not inside `base`.
    #[must_use]
    pub(crate) fn relative_to(&self, base: &Self) -> PathBuf {
        self.0
            .strip_prefix(&base.0)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| self.0.clone())
    }

    /// Consume the normalized path and return its inner [`PathBuf`].
    #[inline]
    #[must_use]
    pub(crate) fn into_inner(self) -> PathBuf {
        self.0
    }
}

/// Remove any root directory or prefix from the start of `path`, leaving a relative path.
fn strip_root(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::Prefix(_) | Component::RootDir))
        .collect()
}

impl Default for NormalizedPathBuf {
    #[inline]
    fn default() -> Self {
        Self::root()
    }
}

impl Deref for NormalizedPathBuf {
    type Target = Path;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for NormalizedPathBuf {
    #[inline]
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
