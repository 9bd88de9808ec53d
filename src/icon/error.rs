//! Icon resolution errors.

use std::path::PathBuf;

/// Largest icon file the theme resolver will load (1 MiB).
pub const MAX_ICON_FILE_SIZE: u64 = 1024 * 1024;

/// Errors a resolver can report for a single key.
///
/// "Nothing found" is not an error; resolvers return an empty handle for it.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Failed to read icon {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Icon file too large ({size} bytes): {path}")]
    TooLarge { path: PathBuf, size: u64 },

    #[error("Desktop entry has no usable Icon= line: {path}")]
    InvalidDesktopEntry { path: PathBuf },

    #[error("Unsupported icon lookup: {0}")]
    Unsupported(String),
}
