//! Owned icon resource handles
//!
//! An `IconHandle` owns at most one platform icon resource. Cloning a
//! handle duplicates the resource so that every handle value has its own
//! independent ownership; dropping a handle releases its resource once.

use std::fmt;

/// A platform icon resource that can be duplicated into a new, independently
/// owned copy.
///
/// Releasing the resource is the job of the implementor's `Drop`.
pub trait IconResource: Send + Sync + 'static {
    /// Produce an independent copy of this resource.
    ///
    /// Returns `None` when the platform refuses to copy it; the caller then
    /// ends up with an empty handle.
    fn duplicate(&self) -> Option<Self>
    where
        Self: Sized;

    /// Approximate resident size in bytes, used for statistics only.
    fn byte_size(&self) -> usize {
        0
    }
}

/// Owned wrapper around one icon resource, or none.
///
/// An empty handle is a valid value: the cache stores it to record that
/// resolution was attempted and produced nothing.
pub struct IconHandle<I: IconResource> {
    resource: Option<I>,
}

impl<I: IconResource> IconHandle<I> {
    /// Take ownership of a resource.
    pub fn new(resource: I) -> Self {
        Self {
            resource: Some(resource),
        }
    }

    /// The miss-cached sentinel.
    pub fn empty() -> Self {
        Self { resource: None }
    }

    pub fn is_empty(&self) -> bool {
        self.resource.is_none()
    }

    /// Borrow the underlying resource, if any.
    pub fn resource(&self) -> Option<&I> {
        self.resource.as_ref()
    }

    /// Give up the handle and return the owned resource.
    pub fn into_resource(self) -> Option<I> {
        self.resource
    }

    pub fn byte_size(&self) -> usize {
        self.resource.as_ref().map_or(0, IconResource::byte_size)
    }
}

impl<I: IconResource> Clone for IconHandle<I> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.as_ref().and_then(IconResource::duplicate),
        }
    }
}

impl<I: IconResource> Default for IconHandle<I> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<I: IconResource> From<Option<I>> for IconHandle<I> {
    fn from(resource: Option<I>) -> Self {
        Self { resource }
    }
}

impl<I: IconResource> fmt::Debug for IconHandle<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource {
            Some(_) => write!(f, "IconHandle({} bytes)", self.byte_size()),
            None => f.write_str("IconHandle(empty)"),
        }
    }
}
