use std::{ffi::OsStr, path::{Component, Path, PathBuf}};
use std::time::{SystemTime, UNIX_EPOCH};


/// Join path segments together, and lexically clean the result.
///
/// - Empty segments are skipped. If every segment is empty, the result is empty.
/// - Only the first nonempty segment may make the result absolute (or give it a Windows
///   prefix); a leading `/` in any later segment is ignored, so joining `"/base"` with `"/file"`
///   yields `"/base/file"`.
/// - `.` components are removed, and `..` removes the preceding normal component. A `..` at the
///   start of an absolute path refers to the root directory, and is removed; at the start of a
///   relative path, it is kept.
/// - If cleaning removes every component of a relative path, the result is `"."`.
///
/// No filesystem access occurs; symbolic links are not considered.
#[must_use]
pub fn join_paths(segments: &[&Path]) -> PathBuf {
    let mut prefix: Option<&OsStr> = None;
    let mut rooted = false;
    let mut parts: Vec<&OsStr> = Vec::new();
    let mut first_segment = true;
    let parent_dir = OsStr::new("..");

    for segment in segments.iter().filter(|segment| !segment.as_os_str().is_empty()) {
        for component in segment.components() {
            match component {
                Component::Prefix(windows_prefix) => {
                    if first_segment {
                        prefix = Some(windows_prefix.as_os_str());
                    }
                }
                Component::RootDir => {
                    if first_segment {
                        rooted = true;
                    }
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    match parts.last() {
                        Some(&last) if last != parent_dir => {
                            parts.pop();
                        }
                        // `..` in the root directory is the root directory.
                        _ if rooted => {}
                        _ => parts.push(parent_dir),
                    }
                }
                Component::Normal(name) => parts.push(name),
            }
        }
        first_segment = false;
    }

    if first_segment {
        // Every segment was empty.
        return PathBuf::new();
    }

    let mut joined = PathBuf::new();
    if let Some(prefix) = prefix {
        joined.push(prefix);
    }
    if rooted {
        joined.push(Component::RootDir.as_os_str());
    }
    joined.extend(parts);

    if joined.as_os_str().is_empty() {
        joined.push(Component::CurDir.as_os_str());
    }

    joined
}


/// The name of the `sequence`-th temporary file candidate with the given prefix:
/// `<prefix>_<sequence>_<nanoseconds since the Unix epoch>`.
#[must_use]
pub(crate) fn temp_file_name(prefix: &str, sequence: u64) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since_epoch| since_epoch.as_nanos())
        .unwrap_or(0);

    format!("{prefix}_{sequence}_{nanos}")
}
