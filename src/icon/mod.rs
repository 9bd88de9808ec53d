//! Icon resources, cache keys and resolvers
//!
//! Everything the cache stores or hands out lives here: the owned
//! `IconHandle`, the `CacheKey` produced by the `KeyPolicy`, and the
//! `IconResolver` capability with its freedesktop implementation.

pub mod error;
pub mod handle;
pub mod key;
pub mod resolver;
pub mod theme;

pub use error::ResolveError;
pub use handle::{IconHandle, IconResource};
pub use key::{CacheKey, EntryKind, KeyPolicy};
pub use resolver::IconResolver;
pub use theme::{IconImage, ThemeResolver};
