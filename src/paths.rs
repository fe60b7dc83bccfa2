use std::fs;
use std::path::{Component, Path, PathBuf};

/// Lexically resolve `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
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

/// Make `path` absolute against `base` (if needed) and normalize it.
pub fn absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Path that, joined onto the directory `from`, leads to `to`.
/// Both paths are expected to be absolute.
pub fn relative_to(to: &Path, from: &Path) -> PathBuf {
    let to = normalize(to);
    let from = normalize(from);

    let to_parts: Vec<Component> = to.components().collect();
    let from_parts: Vec<Component> = from.components().collect();

    let common = to_parts
        .iter()
        .zip(from_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from_parts.len() {
        relative.push("..");
    }
    for part in &to_parts[common..] {
        relative.push(part.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }

    relative
}

/// Directory holding `link` as the kernel walks it. Symlinks in an existing
/// parent are resolved, since `..` in link text climbs the real directory.
pub fn link_dir(link: &Path) -> PathBuf {
    let parent = link.parent().unwrap_or(Path::new("/"));
    fs::canonicalize(parent).unwrap_or_else(|_| normalize(parent))
}

/// Where a symlink at `link` with text `text` points, without following the link itself.
pub fn resolve_link_text(link: &Path, text: &Path) -> PathBuf {
    if text.is_absolute() {
        normalize(text)
    } else {
        normalize(&link_dir(link).join(text))
    }
}
