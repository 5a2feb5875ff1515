// Main filesystem trait
mod fs_traits;
// Traits relied on by the filesystem trait
mod util_traits;
// `FSError` for `std::io::Error`, and the error of a closed on-disk file.
mod error;

mod metadata;
mod open_flags;
mod path;


// ================================
//  Filesystem implementations
// ================================

// Currently, only unix and windows are supported.
#[cfg(all(feature = "std-fs", any(unix, windows)))]
pub mod std_fs;

pub mod memory_fs;


// ================================
//  Utilities
// ================================

pub mod utils;


// ================================
//  Re-exports
// ================================

/// Module containing all the traits defined in this crate. May be used as a prelude.
pub mod traits {
    pub use crate::{
        fs_traits::Filesystem,
        util_traits::{FSError, RandomAccess, VfsFile},
    };
}

pub use self::{
    error::FileClosed,
    fs_traits::StorageId,
    metadata::Metadata,
    open_flags::OpenFlags,
    path::join_paths,
};

// Currently, only unix and windows are supported.
#[cfg(all(feature = "std-fs", any(unix, windows)))]
pub use self::std_fs::{StandardFS, StandardFile};

pub use self::memory_fs::{MemoryFS, MemoryFile};

/// The maximum number of candidate names which [`Filesystem::temp_file`] implementations in this
/// crate try before giving up.
///
/// [`Filesystem::temp_file`]: crate::traits::Filesystem::temp_file
pub const MAX_TEMP_FILE_ATTEMPTS: u32 = 4096;
