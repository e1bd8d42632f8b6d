// src/presence.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Key -> local path mapping and the "not yet downloaded" filter.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};
use crate::object_store::RemoteObject;

/// Map `key` under `output_root`, one path component per `/` segment.
///
/// Empty and `.` segments are dropped (so a leading `/` cannot escape the
/// root); a `..` segment or a key with no usable segment is rejected.
pub fn local_path(output_root: &Path, key: &str) -> Result<PathBuf> {
    let mut path = output_root.to_path_buf();
    let mut pushed = false;
    for part in key.split('/') {
        match part {
            "" | "." => continue,
            ".." => return Err(Error::InvalidKey(key.to_string())),
            p => {
                path.push(p);
                pushed = true;
            }
        }
    }
    if !pushed {
        return Err(Error::InvalidKey(key.to_string()));
    }
    Ok(path)
}

/// Zero-byte keys ending in `/` that consoles create to stand for folders.
pub fn is_directory_marker(key: &str) -> bool {
    key.ends_with('/')
}

/// Does anything exist at `path`? `NotFound` and `NotADirectory` mean no;
/// any other stat failure is returned so the run stops instead of guessing.
fn exists(path: &Path) -> Result<bool> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(source) => Err(Error::Probe {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Keep the objects whose mapped local path does not exist, in inventory order.
///
/// Directory markers and keys that do not map under `output_root` are never
/// candidates; the latter are logged. Only existence is checked, not content
/// or size.
pub fn filter_missing(inventory: &[RemoteObject], output_root: &Path) -> Result<Vec<RemoteObject>> {
    let mut missing = Vec::new();
    for obj in inventory {
        if is_directory_marker(&obj.key) {
            continue;
        }
        let path = match local_path(output_root, &obj.key) {
            Ok(path) => path,
            Err(e) => {
                warn!(key = %obj.key, error = %e, "Skipping object that cannot be stored locally");
                continue;
            }
        };
        if !exists(&path)? {
            missing.push(obj.clone());
        }
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn obj(key: &str) -> RemoteObject {
        RemoteObject::new(key, 4, Utc::now())
    }

    #[test]
    fn maps_keys_under_root() {
        let root = Path::new("/tmp/out");
        assert_eq!(local_path(root, "a/b/c/file.txt").unwrap(), PathBuf::from("/tmp/out/a/b/c/file.txt"));
        assert_eq!(local_path(root, "/lead.txt").unwrap(), PathBuf::from("/tmp/out/lead.txt"));
        assert_eq!(local_path(root, "x//./y").unwrap(), PathBuf::from("/tmp/out/x/y"));
    }

    #[test]
    fn rejects_escaping_and_empty_keys() {
        let root = Path::new("/tmp/out");
        assert!(matches!(local_path(root, "../etc/passwd"), Err(Error::InvalidKey(_))));
        assert!(matches!(local_path(root, "a/../../b"), Err(Error::InvalidKey(_))));
        assert!(matches!(local_path(root, ""), Err(Error::InvalidKey(_))));
        assert!(matches!(local_path(root, "/"), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn empty_inventory_yields_no_candidates() {
        let dir = tempfile::tempdir().unwrap();
        assert!(filter_missing(&[], dir.path()).unwrap().is_empty());
    }

    #[test]
    fn keeps_only_missing_objects_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("existing.txt"), b"test").unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/present.txt"), b"test").unwrap();

        let inventory = vec![
            obj("z-missing.txt"),
            obj("existing.txt"),
            obj("data/nested/file.txt"),
            obj("data/present.txt"),
            obj("a-missing.txt"),
        ];
        let missing = filter_missing(&inventory, dir.path()).unwrap();
        let keys: Vec<_> = missing.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["z-missing.txt", "data/nested/file.txt", "a-missing.txt"]);
    }

    #[test]
    fn file_in_place_of_directory_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), b"not a dir").unwrap();
        let missing = filter_missing(&[obj("a/b.txt")], dir.path()).unwrap();
        assert_eq!(missing.len(), 1);
    }

    #[test]
    fn escaping_keys_are_not_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = vec![obj("../outside.txt"), obj("ok.txt"), obj("a/../../b.txt")];
        let missing = filter_missing(&inventory, dir.path()).unwrap();
        let keys: Vec<_> = missing.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["ok.txt"]);
    }

    #[test]
    fn stat_failure_other_than_not_found_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // a 300-byte component fails with ENAMETOOLONG rather than NotFound
        let long = "x".repeat(300);
        let err = filter_missing(&[obj("ok.txt"), obj(&long)], dir.path()).unwrap_err();
        assert!(matches!(err, Error::Probe { ref path, .. } if path.ends_with(&long)));
    }

    #[test]
    fn skips_directory_markers() {
        let dir = tempfile::tempdir().unwrap();
        let missing = filter_missing(&[obj("photos/"), obj("photos/1.jpg")], dir.path()).unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].key, "photos/1.jpg");
    }
}
