use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path.
///
/// Drops `.` components and folds `name/..` pairs. A `..` directly under the
/// root stays at the root; leading `..` of a relative path are kept. The
/// filesystem is never consulted, so symlinks are not resolved.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        PathBuf::from(".")
    } else {
        out.iter().collect()
    }
}
