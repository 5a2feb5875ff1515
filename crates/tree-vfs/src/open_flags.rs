use std::ops::{BitOr, BitOrAssign};


/// The flags of an [`open_file`] call, with the same meaning as the flags of POSIX `open()`.
///
/// `RDONLY` is the empty set of flags, as with `O_RDONLY`; a file opened without `WRONLY` or
/// `RDWR` is read-only.
///
/// [`open_file`]: crate::traits::Filesystem::open_file
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenFlags(u32);

impl OpenFlags {
    /// Open for reading only.
    pub const RDONLY: Self = Self(0);
    /// Open for writing only.
    pub const WRONLY: Self = Self(0o1);
    /// Open for reading and writing.
    pub const RDWR:   Self = Self(0o2);
    /// Create the file, and any missing parent directories, if it does not exist.
    pub const CREATE: Self = Self(0o100);
    /// Truncate the file to zero length when it is opened.
    pub const TRUNC:  Self = Self(0o1000);
    /// Start the file cursor at the end of the file.
    pub const APPEND: Self = Self(0o2000);

    /// The raw bits of the flags.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every flag set in `other` is also set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    #[must_use]
    pub const fn is_create(self) -> bool {
        self.contains(Self::CREATE)
    }

    #[inline]
    #[must_use]
    pub const fn is_truncate(self) -> bool {
        self.contains(Self::TRUNC)
    }

    #[inline]
    #[must_use]
    pub const fn is_append(self) -> bool {
        self.contains(Self::APPEND)
    }

    /// Whether a handle opened with these flags may be read from.
    #[inline]
    #[must_use]
    pub const fn is_readable(self) -> bool {
        self.contains(Self::RDWR) || !self.contains(Self::WRONLY)
    }

    /// Whether a handle opened with these flags may be written to.
    #[inline]
    #[must_use]
    pub const fn is_writable(self) -> bool {
        self.contains(Self::RDWR) || self.contains(Self::WRONLY)
    }
}

impl BitOr for OpenFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for OpenFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}
