//! Cache keys and the policy that derives them from filesystem entries
//!
//! Most files share a generic icon determined by their extension, so they
//! collapse onto one key per extension. A few types (executables, shortcuts,
//! icon files, desktop entries) carry their own icon and are keyed by path.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions whose icon is specific to the individual file.
pub const DEFAULT_FILE_SPECIFIC_EXTENSIONS: &[&str] = &[
    "exe", "ico", "ani", "cur", "msc", "scr", "lnk", "url", "desktop", "appimage",
];

/// Identifies one icon in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A file whose icon depends on the file itself
    Path(PathBuf),
    /// Lowercase extension shared by every file of that type
    Extension(String),
    /// Any directory
    Directory,
    /// A file with no usable extension
    GenericFile,
}

impl CacheKey {
    /// Extension key, normalized to lowercase.
    pub fn extension(ext: &str) -> Self {
        CacheKey::Extension(ext.to_lowercase())
    }

    /// Lowercase extension of the entry this key stands for, if any.
    pub fn file_extension(&self) -> Option<String> {
        match self {
            CacheKey::Path(path) => lowercase_extension(path),
            CacheKey::Extension(ext) => Some(ext.clone()),
            CacheKey::Directory | CacheKey::GenericFile => None,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Path(path) => write!(f, "{}", path.display()),
            CacheKey::Extension(ext) => write!(f, "*.{}", ext),
            CacheKey::Directory => f.write_str("<directory>"),
            CacheKey::GenericFile => f.write_str("<file>"),
        }
    }
}

/// Kind of filesystem entry being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Read the kind from filesystem metadata, following symlinks.
    ///
    /// Entries whose metadata cannot be read are treated as files.
    pub fn of(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            _ => EntryKind::File,
        }
    }
}

/// Decides which key an entry's icon is cached under.
#[derive(Debug, Clone)]
pub struct KeyPolicy {
    file_specific: Vec<String>,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_SPECIFIC_EXTENSIONS.iter().copied())
    }
}

impl KeyPolicy {
    /// Create a policy treating the given extensions as file-specific.
    pub fn new<S: AsRef<str>>(file_specific: impl IntoIterator<Item = S>) -> Self {
        let mut file_specific: Vec<String> = file_specific
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        file_specific.sort();
        file_specific.dedup();
        Self { file_specific }
    }

    /// Whether files with this (lowercase) extension get a per-path key.
    pub fn is_file_specific(&self, ext: &str) -> bool {
        self.file_specific.binary_search_by(|e| e.as_str().cmp(ext)).is_ok()
    }

    /// Classify an entry into its cache key.
    pub fn classify(&self, path: &Path, kind: EntryKind) -> CacheKey {
        if kind == EntryKind::Directory {
            return CacheKey::Directory;
        }

        match lowercase_extension(path) {
            Some(ext) if self.is_file_specific(&ext) => CacheKey::Path(path.to_path_buf()),
            Some(ext) => CacheKey::Extension(ext),
            None => CacheKey::GenericFile,
        }
    }

    /// Classify a path, reading its kind from the filesystem.
    pub fn classify_path(&self, path: &Path) -> CacheKey {
        self.classify(path, EntryKind::of(path))
    }
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
}
