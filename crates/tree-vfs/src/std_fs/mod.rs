use cfg_if::cfg_if;


/// Implements `Filesystem` and `VfsFile` on top of `std::fs`.
mod std_fs_core;

pub use self::std_fs_core::{StandardFile, StandardFS};

// Positional reads, creation modes, and permission bits are platform-specific.
cfg_if! {
    if #[cfg(unix)] {
        /// Implements `RandomAccess` for `File`, and provides permission helpers.
        mod std_fs_unix;
        use self::std_fs_unix as platform;

    } else {
        /// Implements `RandomAccess` for `File`, and provides permission helpers.
        mod std_fs_windows;
        use self::std_fs_windows as platform;
    }
}
