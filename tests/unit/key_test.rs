//! Unit tests for key classification against a real filesystem

use std::collections::HashSet;

use iconcache::{CacheKey, EntryKind, KeyPolicy};
use tempfile::TempDir;

use crate::helpers::touch;

#[test]
fn entry_kind_reads_metadata() {
    let dir = TempDir::new().unwrap();
    let file = touch(dir.path(), "notes.txt");

    assert_eq!(EntryKind::of(dir.path()), EntryKind::Directory);
    assert_eq!(EntryKind::of(&file), EntryKind::File);
    // Missing entries are treated as files
    assert_eq!(EntryKind::of(&dir.path().join("gone")), EntryKind::File);
}

#[test]
fn directory_named_like_a_file_is_still_a_directory() {
    let dir = TempDir::new().unwrap();
    let odd = dir.path().join("bundle.exe");
    std::fs::create_dir(&odd).unwrap();

    assert_eq!(
        KeyPolicy::default().classify_path(&odd),
        CacheKey::Directory
    );
}

#[test]
fn many_files_collapse_onto_few_keys() {
    let dir = TempDir::new().unwrap();
    let policy = KeyPolicy::default();
    let names = [
        "a.txt", "b.TXT", "c.txt", "d.rs", "e.rs", "Makefile", "README", "tool.exe", "app.exe",
    ];

    let keys: HashSet<CacheKey> = names
        .iter()
        .map(|name| policy.classify_path(&touch(dir.path(), name)))
        .collect();

    // txt, rs, generic file, and one key per executable
    assert_eq!(keys.len(), 5);
    assert!(keys.contains(&CacheKey::extension("txt")));
    assert!(keys.contains(&CacheKey::GenericFile));
    assert!(keys.contains(&CacheKey::Path(dir.path().join("tool.exe"))));
}

#[cfg(unix)]
#[test]
fn symlink_to_directory_classifies_as_directory() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("target");
    std::fs::create_dir(&target).unwrap();
    let link = dir.path().join("link.lnk");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    assert_eq!(KeyPolicy::default().classify_path(&link), CacheKey::Directory);
}
