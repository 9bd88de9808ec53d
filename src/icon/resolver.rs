//! The icon lookup capability the cache depends on

use super::error::ResolveError;
use super::handle::{IconHandle, IconResource};
use super::key::CacheKey;

/// Synchronously resolves a key into an icon.
///
/// Implementations are called from the cache's worker thread, must not
/// block indefinitely, and return an empty handle when nothing is found.
pub trait IconResolver<I: IconResource>: Send + Sync {
    fn resolve(&self, key: &CacheKey) -> Result<IconHandle<I>, ResolveError>;
}

impl<I, F> IconResolver<I> for F
where
    I: IconResource,
    F: Fn(&CacheKey) -> Result<IconHandle<I>, ResolveError> + Send + Sync,
{
    fn resolve(&self, key: &CacheKey) -> Result<IconHandle<I>, ResolveError> {
        self(key)
    }
}
