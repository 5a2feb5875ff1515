#![allow(unused_crate_dependencies, reason = "These are tests, not the main crate.")]

use std::io::{Error as IoError, Read, Result as IoResult, Seek, SeekFrom, Write};
use std::path::Path;

use tree_vfs::{Metadata, MemoryFS, MemoryFile, OpenFlags, StorageId, traits::*};
use tree_vfs::utils::{CopyError, copy_file, copy_recursive, exists};


// ================================
//  Fault injection
// ================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    None,
    /// Opening with `CREATE` fails without creating anything.
    CreateFails,
    /// Opening with `CREATE` creates the file, and then fails.
    CreateFailsAfterCreating,
    StatFails,
    /// Every read from an opened file fails.
    ReadFails,
    /// Closing an opened file fails, after closing it.
    CloseFails,
}

fn injected_error() -> IoError {
    IoError::other("injected test error")
}

/// A `MemoryFS` wrapper whose operations can be made to fail.
#[derive(Debug, Clone)]
struct FaultyFS {
    inner: MemoryFS,
    fault: Fault,
}

impl FaultyFS {
    fn new(inner: &MemoryFS, fault: Fault) -> Self {
        Self {
            inner: inner.clone(),
            fault,
        }
    }

    fn wrap(&self, inner: MemoryFile) -> FaultyFile {
        FaultyFile {
            inner,
            fault: self.fault,
        }
    }
}

impl Filesystem for FaultyFS {
    type File  = FaultyFile;
    type Error = IoError;

    fn open_file(&self, path: &Path, flags: OpenFlags, mode: u32) -> Result<Self::File, Self::Error> {
        if flags.is_create() {
            match self.fault {
                Fault::CreateFails => return Err(injected_error()),
                Fault::CreateFailsAfterCreating => {
                    drop(self.inner.open_file(path, flags, mode)?);
                    return Err(injected_error());
                }
                _ => {}
            }
        }

        Ok(self.wrap(self.inner.open_file(path, flags, mode)?))
    }

    fn stat(&self, path: &Path) -> Result<Metadata, Self::Error> {
        if self.fault == Fault::StatFails {
            return Err(injected_error());
        }
        Ok(self.inner.stat(path)?)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<Metadata>, Self::Error> {
        Ok(self.inner.read_dir(path)?)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Self::Error> {
        Ok(self.inner.create_dir_all(path)?)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), Self::Error> {
        Ok(self.inner.rename(from, to)?)
    }

    fn remove(&self, path: &Path) -> Result<(), Self::Error> {
        Ok(self.inner.remove(path)?)
    }

    fn temp_file(&self, dir: &Path, prefix: &str) -> Result<Self::File, Self::Error> {
        Ok(self.wrap(self.inner.temp_file(dir, prefix)?))
    }

    fn dir(&self, path: &Path) -> Self {
        Self {
            inner: self.inner.dir(path),
            fault: self.fault,
        }
    }

    fn base(&self) -> &Path {
        self.inner.base()
    }
}

#[derive(Debug)]
struct FaultyFile {
    inner: MemoryFile,
    fault: Fault,
}

impl Read for FaultyFile {
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        if self.fault == Fault::ReadFails {
            return Err(injected_error());
        }
        self.inner.read(buf)
    }
}

impl RandomAccess for FaultyFile {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult<usize> {
        if self.fault == Fault::ReadFails {
            return Err(injected_error());
        }
        self.inner.read_at(offset, buf)
    }
}

impl Write for FaultyFile {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> IoResult<()> {
        self.inner.flush()
    }
}

impl Seek for FaultyFile {
    fn seek(&mut self, pos: SeekFrom) -> IoResult<u64> {
        self.inner.seek(pos)
    }
}

impl VfsFile for FaultyFile {
    fn name(&self) -> &Path {
        self.inner.name()
    }

    fn close(&mut self) -> IoResult<()> {
        self.inner.close()?;
        if self.fault == Fault::CloseFails {
            return Err(injected_error());
        }
        Ok(())
    }
}

// ================================
//  Helpers
// ================================

fn write_file<FS: Filesystem>(fs: &FS, path: &str, contents: &[u8]) {
    let mut file = fs.create(Path::new(path)).unwrap();
    file.write_all(contents).unwrap();
    file.close().unwrap();
}

fn read_file<FS: Filesystem>(fs: &FS, path: &str) -> Vec<u8> {
    let mut file = fs.open(Path::new(path)).unwrap();
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).unwrap();
    contents
}

/// Copy files from `src` to `dst`, which may share storage, and check the results.
fn check_copy<Src: Filesystem, Dst: Filesystem>(src: &Src, dst: &Dst) {
    write_file(src, "src/file", b"copied contents");

    // The destination's parent directories are created.
    copy_file(src, dst, Path::new("src/file"), Path::new("new/dir/file")).unwrap();
    assert_eq!(read_file(dst, "new/dir/file"), b"copied contents");
    assert_eq!(read_file(src, "src/file"), b"copied contents");

    // An existing file is replaced, not merged with.
    write_file(dst, "existing", b"much longer previous contents");
    copy_file(src, dst, Path::new("src/file"), Path::new("existing")).unwrap();
    assert_eq!(read_file(dst, "existing"), b"copied contents");

    let err = copy_file(src, dst, Path::new("missing"), Path::new("never")).unwrap_err();
    assert!(matches!(err, CopyError::Source(_)));
    assert!(err.is_not_found());
    assert!(!exists(dst, Path::new("never")).unwrap());

    // Empty files are copied too.
    write_file(src, "empty", b"");
    copy_file(src, dst, Path::new("empty"), Path::new("empty copy")).unwrap();
    assert!(read_file(dst, "empty copy").is_empty());
}

// ================================
//  Copying between backends
// ================================

#[test]
fn copy_within_one_memory_fs() {
    let fs = MemoryFS::new();
    check_copy(&fs, &fs);
}

#[test]
fn copy_between_memory_fs_trees() {
    check_copy(&MemoryFS::new(), &MemoryFS::new());
}

#[test]
fn copy_between_views() {
    let fs = MemoryFS::new();
    check_copy(&fs.dir(Path::new("a")), &fs.dir(Path::new("b")));
    assert_eq!(read_file(&fs, "b/existing"), b"copied contents");
}

#[cfg(all(feature = "std-fs", any(unix, windows)))]
mod std_backends {
    use tree_vfs::StandardFS;

    use super::*;


    #[test]
    fn copy_from_memory_to_std() {
        let temp_dir = tempfile::tempdir().unwrap();
        check_copy(&MemoryFS::new(), &StandardFS::new(temp_dir.path()));
    }

    #[test]
    fn copy_from_std_to_memory() {
        let temp_dir = tempfile::tempdir().unwrap();
        check_copy(&StandardFS::new(temp_dir.path()), &MemoryFS::new());
    }

    #[test]
    fn copy_within_std() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fs = StandardFS::new(temp_dir.path());
        check_copy(&fs, &fs);
    }

    #[test]
    fn copy_std_file_onto_itself() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fs = StandardFS::new(temp_dir.path());
        write_file(&fs, "dir/file", b"precious");

        let view = fs.dir(Path::new("dir"));
        copy_file(&fs, &view, Path::new("dir/file"), Path::new("./file")).unwrap();
        assert_eq!(read_file(&fs, "dir/file"), b"precious");
        assert_eq!(fs.storage_id(), Some(StorageId::Host));
    }

    #[test]
    fn copy_std_tree_into_itself() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fs = StandardFS::new(temp_dir.path());
        write_file(&fs, "a/file", b"a");

        let err = copy_recursive(&fs, &fs, Path::new("a"), Path::new("a/b")).unwrap_err();
        assert!(matches!(err, CopyError::IntoSelf { .. }));
        assert!(!exists(&fs, Path::new("a/b")).unwrap());
    }

    #[test]
    fn copy_tree_to_std() {
        let src = MemoryFS::new();
        write_file(&src, "tree/a", b"a");
        write_file(&src, "tree/sub/b", b"b");

        let temp_dir = tempfile::tempdir().unwrap();
        let dst = StandardFS::new(temp_dir.path());
        copy_recursive(&src, &dst, Path::new("tree"), Path::new("copy")).unwrap();

        assert_eq!(std::fs::read(temp_dir.path().join("copy").join("a")).unwrap(), b"a");
        assert_eq!(std::fs::read(temp_dir.path().join("copy").join("sub").join("b")).unwrap(), b"b");
    }
}

// ================================
//  Copying onto the source
// ================================

#[test]
fn storage_ids_identify_trees() {
    let fs = MemoryFS::new();

    assert!(fs.storage_id().is_some());
    assert_eq!(fs.storage_id(), fs.dir(Path::new("a/b")).storage_id());
    assert_eq!(fs.storage_id(), fs.clone().storage_id());
    assert_ne!(fs.storage_id(), MemoryFS::new().storage_id());
    assert_eq!(FaultyFS::new(&fs, Fault::None).storage_id(), None);
}

#[test]
fn copy_file_onto_itself_keeps_the_contents() {
    let fs = MemoryFS::new();
    write_file(&fs, "dir/file", b"precious");

    copy_file(&fs, &fs, Path::new("dir/file"), Path::new("./dir/../dir/file")).unwrap();
    assert_eq!(read_file(&fs, "dir/file"), b"precious");

    // The same file, reached through two views.
    copy_file(&fs.dir(Path::new("dir")), &fs, Path::new("/file"), Path::new("dir/file")).unwrap();
    assert_eq!(read_file(&fs, "dir/file"), b"precious");

    // A missing source is still an error.
    let err = copy_file(&fs, &fs, Path::new("missing"), Path::new("missing")).unwrap_err();
    assert!(matches!(err, CopyError::Source(_)));
}

#[test]
fn copy_tree_into_itself_is_rejected() {
    let fs = MemoryFS::new();
    write_file(&fs, "a/file", b"a");
    write_file(&fs, "a/sub/file", b"sub");

    let err = copy_recursive(&fs, &fs, Path::new("a"), Path::new("a/b")).unwrap_err();
    assert!(matches!(
        &err,
        CopyError::IntoSelf { from, to } if from == Path::new("/a") && to == Path::new("/a/b"),
    ));
    assert!(!err.is_not_found());
    assert!(!exists(&fs, Path::new("a/b")).unwrap());

    assert!(matches!(
        copy_recursive(&fs, &fs, Path::new("a"), Path::new("./a")),
        Err(CopyError::IntoSelf { .. }),
    ));
    assert!(matches!(
        copy_recursive(&fs.dir(Path::new("a")), &fs, Path::new(""), Path::new("a/sub/deeper")),
        Err(CopyError::IntoSelf { .. }),
    ));

    // A sibling whose name starts the same way is not inside the source.
    copy_recursive(&fs, &fs, Path::new("a"), Path::new("ab")).unwrap();
    assert_eq!(read_file(&fs, "ab/sub/file"), b"sub");
}

#[test]
fn copy_tree_into_the_same_path_of_another_tree() {
    let src = MemoryFS::new();
    write_file(&src, "a/file", b"a");
    write_file(&src, "a/b/inner", b"inner");

    let dst = MemoryFS::new();
    write_file(&dst, "a/existing", b"");
    copy_recursive(&src, &dst, Path::new("a"), Path::new("a/b")).unwrap();

    assert_eq!(read_file(&dst, "a/b/file"), b"a");
    assert_eq!(read_file(&dst, "a/b/b/inner"), b"inner");
    assert!(!exists(&dst, Path::new("a/b/b/b")).unwrap());
}

// ================================
//  Failed copies
// ================================

#[test]
fn destination_create_fails() {
    let fs = MemoryFS::new();
    write_file(&fs, "src", b"data");

    let dst = FaultyFS::new(&fs, Fault::CreateFails);
    let err = copy_file(&fs, &dst, Path::new("src"), Path::new("dst")).unwrap_err();
    assert!(matches!(err, CopyError::Destination(_)));
    assert!(!exists(&fs, Path::new("dst")).unwrap());
}

#[test]
fn partially_created_destination_is_removed() {
    let fs = MemoryFS::new();
    write_file(&fs, "src", b"data");

    let dst = FaultyFS::new(&fs, Fault::CreateFailsAfterCreating);
    let err = copy_file(&fs, &dst, Path::new("src"), Path::new("dst")).unwrap_err();
    assert!(matches!(err, CopyError::Destination(_)));
    assert!(!exists(&fs, Path::new("dst")).unwrap());
    assert_eq!(read_file(&fs, "src"), b"data");
}

#[test]
fn destination_directories_are_never_removed() {
    let fs = MemoryFS::new();
    write_file(&fs, "src", b"data");
    write_file(&fs, "dst/inner", b"keep me");

    let err = copy_file(&fs, &fs, Path::new("src"), Path::new("dst")).unwrap_err();
    assert!(err.is_a_directory());
    assert_eq!(read_file(&fs, "dst/inner"), b"keep me");
}

#[test]
fn read_failure_removes_the_destination() {
    let fs = MemoryFS::new();
    write_file(&fs, "src", b"data");
    write_file(&fs, "dst", b"old");

    let src = FaultyFS::new(&fs, Fault::ReadFails);
    let err = copy_file(&src, &fs, Path::new("src"), Path::new("dst")).unwrap_err();
    assert!(matches!(err, CopyError::Io(_)));
    assert!(!exists(&fs, Path::new("dst")).unwrap());
    assert_eq!(read_file(&fs, "src"), b"data");
}

#[test]
fn source_close_failure_removes_the_destination() {
    let fs = MemoryFS::new();
    write_file(&fs, "src", b"data");

    let src = FaultyFS::new(&fs, Fault::CloseFails);
    let err = copy_file(&src, &fs, Path::new("src"), Path::new("dst")).unwrap_err();
    assert!(matches!(err, CopyError::Io(_)));
    assert!(err.to_string().contains("injected test error"));
    assert!(!exists(&fs, Path::new("dst")).unwrap());
}

#[test]
fn destination_close_failure_removes_the_destination() {
    let fs = MemoryFS::new();
    write_file(&fs, "src", b"data");

    let dst = FaultyFS::new(&fs, Fault::CloseFails);
    let err = copy_file(&fs, &dst, Path::new("src"), Path::new("dst")).unwrap_err();
    assert!(matches!(err, CopyError::Io(_)));
    assert!(!exists(&fs, Path::new("dst")).unwrap());
}

#[test]
fn faultless_wrapper_copies() {
    let fs = MemoryFS::new();
    let faultless = FaultyFS::new(&fs, Fault::None);
    check_copy(&faultless, &fs);
    assert_eq!(faultless.base(), fs.base());
}

// ================================
//  Other utilities
// ================================

#[test]
fn exists_reports_errors() {
    let fs = MemoryFS::new();
    write_file(&fs, "dir/file", b"");

    assert!(exists(&fs, Path::new("dir")).unwrap());
    assert!(exists(&fs, Path::new("dir/file")).unwrap());
    assert!(!exists(&fs, Path::new("dir/missing")).unwrap());
    assert!(!exists(&fs, Path::new("missing/child")).unwrap());
    assert!(exists(&fs, Path::new("dir/file/child")).unwrap_err().is_not_a_directory());

    let faulty = FaultyFS::new(&fs, Fault::StatFails);
    assert!(exists(&faulty, Path::new("dir")).is_err());
}

#[test]
fn copy_recursive_copies_trees() {
    let src = MemoryFS::new();
    write_file(&src, "tree/a.txt", b"a");
    write_file(&src, "tree/sub/b.txt", b"b");
    src.create_dir_all(Path::new("tree/empty")).unwrap();

    let dst = MemoryFS::new();
    copy_recursive(&src, &dst, Path::new("tree"), Path::new("copy")).unwrap();

    assert_eq!(read_file(&dst, "copy/a.txt"), b"a");
    assert_eq!(read_file(&dst, "copy/sub/b.txt"), b"b");
    assert!(dst.stat(Path::new("copy/empty")).unwrap().is_dir());
    assert_eq!(dst.read_dir(Path::new("copy")).unwrap().len(), 3);

    // A single file is copied like `copy_file`.
    copy_recursive(&src, &dst, Path::new("tree/a.txt"), Path::new("single")).unwrap();
    assert_eq!(read_file(&dst, "single"), b"a");

    let err = copy_recursive(&src, &dst, Path::new("missing"), Path::new("x")).unwrap_err();
    assert!(matches!(err, CopyError::Source(_)));
}

#[test]
fn copy_errors_delegate_classification() {
    let err: CopyError<tree_vfs::memory_fs::Error, IoError> =
        CopyError::Destination(IoError::from(std::io::ErrorKind::DirectoryNotEmpty));
    assert!(err.is_directory_not_empty());
    assert!(!err.is_not_found());
    assert!(!err.is_interrupted());

    let err: CopyError<IoError, IoError> = CopyError::Io(std::io::ErrorKind::Interrupted.into());
    assert!(err.is_interrupted());
}
