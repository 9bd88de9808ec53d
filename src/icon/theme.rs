//! Icon lookup in freedesktop icon themes
//!
//! Maps a cache key to a list of freedesktop icon names (via the entry's
//! MIME type) and asks the `icon` crate for the best match: the configured
//! theme, the themes it inherits from, `hicolor`, then standalone icons in
//! the search directories. The file's bytes become the icon resource.
//!
//! Search directories and `index.theme` files are read once, when the
//! resolver is built.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ::icon::{IconSearch, Icons};
use freedesktop_entry_parser::Entry;
use tracing::{debug, trace};

use super::error::{ResolveError, MAX_ICON_FILE_SIZE};
use super::handle::{IconHandle, IconResource};
use super::key::CacheKey;
use super::resolver::IconResolver;

/// Icons are looked up for 1x displays.
const ICON_SCALE: u32 = 1;

/// Icon file contents loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    /// Where the icon was loaded from
    pub source: PathBuf,
    /// Raw file bytes (PNG, SVG, XPM or ICO)
    pub data: Vec<u8>,
}

impl IconResource for IconImage {
    fn duplicate(&self) -> Option<Self> {
        Some(self.clone())
    }

    fn byte_size(&self) -> usize {
        self.data.len()
    }
}

/// Resolves keys to icon files of one freedesktop icon theme.
pub struct ThemeResolver {
    icons: Icons,
    theme: String,
    size: u32,
    search_dirs: Vec<PathBuf>,
}

impl fmt::Debug for ThemeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeResolver")
            .field("theme", &self.theme)
            .field("size", &self.size)
            .field("search_dirs", &self.search_dirs)
            .field("themes_found", &self.icons.themes.len())
            .finish()
    }
}

impl ThemeResolver {
    /// Create a resolver for `theme` at `size` pixels.
    ///
    /// An empty `search_dirs` uses [`ThemeResolver::default_search_dirs`].
    pub fn new(theme: &str, size: u32, search_dirs: Vec<PathBuf>) -> Self {
        let search = if search_dirs.is_empty() {
            IconSearch::new()
        } else {
            IconSearch::new_from(search_dirs)
        };
        let search_dirs = search.dirs.clone();
        let icons = search.search().icons();

        debug!(
            theme,
            themes = icons.themes.len(),
            standalone = icons.standalone_icons.len(),
            "icon themes loaded"
        );

        Self {
            icons,
            theme: theme.to_string(),
            size: size.max(1),
            search_dirs,
        }
    }

    /// Standard icon base directories: `~/.icons`, `$XDG_DATA_HOME/icons`,
    /// `$XDG_DATA_DIRS/icons` and `/usr/share/pixmaps`.
    pub fn default_search_dirs() -> Vec<PathBuf> {
        IconSearch::new().dirs
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Freedesktop icon names to try for a key, most specific first.
    pub fn icon_names(key: &CacheKey) -> Vec<String> {
        match key {
            CacheKey::Directory => vec!["folder".to_string(), "inode-directory".to_string()],
            CacheKey::GenericFile => vec!["text-x-generic".to_string(), "unknown".to_string()],
            CacheKey::Extension(ext) => names_for_extension(ext),
            CacheKey::Path(_) => match key.file_extension() {
                Some(ext) => names_for_extension(&ext),
                None => vec!["text-x-generic".to_string()],
            },
        }
    }

    /// Locate the icon file that best matches `name` at the configured size.
    pub fn find_icon(&self, name: &str) -> Option<PathBuf> {
        self.icons
            .find_icon(name, self.size, ICON_SCALE, &self.theme)
            // Standalone icons are still usable when no theme is installed
            .or_else(|| self.icons.find_standalone_icon(name))
            .map(|file| file.path)
    }

    fn resolve_names(&self, names: &[String]) -> Result<IconHandle<IconImage>, ResolveError> {
        for name in names {
            if let Some(path) = self.find_icon(name) {
                trace!(name = %name, path = %path.display(), "icon found");
                return load_icon_file(&path);
            }
        }
        Ok(IconHandle::empty())
    }

    fn resolve_desktop_entry(&self, path: &Path) -> Result<IconHandle<IconImage>, ResolveError> {
        let invalid = || ResolveError::InvalidDesktopEntry {
            path: path.to_path_buf(),
        };

        let entry = Entry::parse(read_file(path)?).map_err(|_| invalid())?;
        let icon = entry
            .section("Desktop Entry")
            .attr("Icon")
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
            .ok_or_else(invalid)?;

        let icon_path = Path::new(icon);
        if icon_path.is_absolute() {
            if icon_path.is_file() {
                return load_icon_file(icon_path);
            }
            return Ok(IconHandle::empty());
        }
        self.resolve_names(&[icon.to_string()])
    }

    /// Icon named by an internet shortcut's `IconFile=`, if it exists locally.
    fn resolve_shortcut(&self, path: &Path) -> Result<Option<IconHandle<IconImage>>, ResolveError> {
        let Ok(entry) = Entry::parse(read_file(path)?) else {
            return Ok(None);
        };
        let icon = entry
            .section("InternetShortcut")
            .attr("IconFile")
            .map(|value| PathBuf::from(value.trim()));

        match icon {
            Some(icon) if icon.is_absolute() && icon.is_file() => load_icon_file(&icon).map(Some),
            _ => Ok(None),
        }
    }
}

impl IconResolver<IconImage> for ThemeResolver {
    fn resolve(&self, key: &CacheKey) -> Result<IconHandle<IconImage>, ResolveError> {
        if let CacheKey::Path(path) = key {
            match key.file_extension().as_deref() {
                Some("desktop") => return self.resolve_desktop_entry(path),
                Some("ico") => {
                    if path.is_file() {
                        return load_icon_file(path);
                    }
                    return Ok(IconHandle::empty());
                }
                Some("url") => {
                    if let Some(handle) = self.resolve_shortcut(path)? {
                        return Ok(handle);
                    }
                }
                // Icons embedded in executables, shell links and AppImages
                // are not readable here; those paths get their type's icon.
                // They keep per-path keys so a resolver that can read them
                // still gets one slot per file.
                _ => {}
            }
        }
        self.resolve_names(&Self::icon_names(key))
    }
}

fn names_for_extension(ext: &str) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(mime) = mime_guess2::from_ext(ext).first() {
        names.push(format!("{}-{}", mime.type_().as_str(), mime.subtype().as_str()));
        names.push(format!("{}-x-generic", mime.type_().as_str()));
    }
    let generic = "text-x-generic".to_string();
    if !names.contains(&generic) {
        names.push(generic);
    }
    names
}

fn read_file(path: &Path) -> Result<Vec<u8>, ResolveError> {
    fs::read(path).map_err(|source| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_icon_file(path: &Path) -> Result<IconHandle<IconImage>, ResolveError> {
    let size = fs::metadata(path)
        .map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if size > MAX_ICON_FILE_SIZE {
        return Err(ResolveError::TooLarge {
            path: path.to_path_buf(),
            size,
        });
    }

    Ok(IconHandle::new(IconImage {
        source: path.to_path_buf(),
        data: read_file(path)?,
    }))
}
