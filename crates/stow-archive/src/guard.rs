use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve an archive entry name to a path under `root`.
///
/// The entry is joined onto the cleaned root, cleaned, made relative to the
/// root and re-joined; anything that does not survive that round trip
/// unchanged is an escape. Entry names carrying a `..` segment or a root or
/// drive prefix are rejected outright, even when they would land back
/// inside the root. Nothing touches the filesystem.
pub fn resolve(root: impl AsRef<Path>, entry: impl AsRef<Path>) -> Result<PathBuf> {
    let entry = entry.as_ref();
    let root = stow_fs::clean(root.as_ref());
    let joined = stow_fs::clean(&root.join(entry));

    let hostile = entry.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    let inside = joined
        .strip_prefix(&root)
        .is_ok_and(|rel| root.join(rel) == joined);

    if hostile || !inside {
        return Err(Error::Escape {
            entry:    entry.to_path_buf(),
            resolved: joined,
        });
    }

    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn root() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/data/stage")
        } else {
            Path::new("/data/stage")
        }
    }

    #[test]
    fn nested_entry_resolves_under_root() {
        let resolved = resolve(root(), "voices/alan/model.onnx").unwrap();
        assert_eq!(resolved, root().join("voices/alan/model.onnx"));
    }

    #[test]
    fn current_dir_prefix_is_ignored() {
        let resolved = resolve(root(), "./bin/piper").unwrap();
        assert_eq!(resolved, root().join("bin/piper"));
    }

    #[test]
    fn parent_escape_rejected() {
        let result = resolve(root(), "../../etc/passwd");
        assert!(matches!(result, Err(Error::Escape { .. })));
    }

    #[test]
    fn inner_parent_segment_rejected() {
        let result = resolve(root(), "bin/../lib/libpiper.so");
        assert!(matches!(result, Err(Error::Escape { .. })));
    }

    #[test]
    fn absolute_entry_rejected() {
        let entry = if cfg!(windows) { "C:\\etc\\passwd" } else { "/etc/passwd" };
        let result = resolve(root(), entry);
        assert!(matches!(result, Err(Error::Escape { .. })));
    }

    #[test]
    fn escape_error_names_entry() {
        match resolve(root(), "../x") {
            Err(Error::Escape { entry, .. }) => assert_eq!(entry, Path::new("../x")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,8}".prop_filter("not a dot segment", |s| s != "." && s != "..")
    }

    proptest! {
        #[test]
        fn plain_segments_stay_inside(segments in proptest::collection::vec(segment(), 1..6)) {
            let entry = segments.join("/");
            let resolved = resolve(root(), &entry).unwrap();
            prop_assert!(resolved.starts_with(root()));
        }

        #[test]
        fn any_parent_segment_is_rejected(
            before in proptest::collection::vec(segment(), 0..4),
            after in proptest::collection::vec(segment(), 0..4),
        ) {
            let mut parts = before;
            parts.push("..".to_string());
            parts.extend(after);
            let entry = parts.join("/");
            prop_assert!(resolve(root(), &entry).is_err());
        }

        #[test]
        fn absolute_names_are_rejected(segments in proptest::collection::vec(segment(), 0..4)) {
            let entry = format!("/{}", segments.join("/"));
            prop_assert!(resolve(root(), &entry).is_err());
        }
    }
}
