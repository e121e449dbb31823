//! Filesystem and path utilities.
//!
//! Configuration paths are stored the way users type them, with `/` as the
//! separator. The helpers here work on those strings as well as on `Path`s.

use std::path::{Component, Path, PathBuf};

/// Whether the host filesystem treats paths case-sensitively.
pub fn is_file_system_case_sensitive() -> bool {
    !cfg!(any(windows, target_os = "macos"))
}

/// Normalize a path lexically: drop `.` components and fold `..` where possible.
///
/// Does not touch the filesystem, so it works for outputs that do not exist yet.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Check whether `ancestor` is `path` itself or one of its parents.
///
/// With `strict`, equal paths are not considered ancestors.
pub fn is_ancestor(ancestor: &Path, path: &Path, strict: bool) -> bool {
    let ancestor = normalize_lexically(ancestor);
    let path = normalize_lexically(path);
    if strict && ancestor == path {
        return false;
    }
    path.starts_with(&ancestor)
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Relative path from `root` to `path` with `/` separators, if `path` is inside `root`.
pub fn relative_path_inside(root: &Path, path: &Path) -> Option<String> {
    let root = normalize_lexically(root);
    let path = normalize_lexically(path);
    let rel = path.strip_prefix(&root).ok()?;
    Some(to_slash(rel))
}

/// Render a path with `/` separators.
pub fn to_slash(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let joined = parts.join("/");
    if path.has_root() && !cfg!(windows) {
        format!("/{}", joined.trim_start_matches('/'))
    } else {
        joined
    }
}

/// Parent part of a `/`-separated path string; empty when there is none.
pub fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Last component of a `/`-separated path string.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// File name of `path` without its extension.
pub fn name_without_extension(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Case-insensitive extension check on a file name (`ext` without the dot).
pub fn has_extension(name: &str, ext: &str) -> bool {
    name.to_lowercase().ends_with(&format!(".{}", ext.to_lowercase()))
}

/// Key used to compare output paths, lower-cased on case-insensitive filesystems.
pub fn case_aware_key(path: &Path, case_sensitive: bool) -> String {
    let key = to_slash(&normalize_lexically(path));
    if case_sensitive {
        key
    } else {
        key.to_lowercase()
    }
}

/// Whether a path field was left unset.
pub fn is_unset(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

/// Resolve `path` against `base` unless it is empty or already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if is_unset(path) || path.is_absolute() {
        path.to_path_buf()
    } else {
        normalize_lexically(&base.join(path))
    }
}
