//! Identity for parsed values.
//!
//! Every candidate and variant produced by the parse caches is wrapped in an
//! [`Interned`] carrying a synthetic [`InternId`]. Caches that are keyed by a
//! parsed structure (rather than by its source string) use that id, so two
//! structurally equal values parsed from different strings stay distinct.

use std::ops::Deref;

/// Synthetic identity assigned when a parsed value is first cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternId(pub(crate) u32);

impl InternId {
    /// Returns the raw id.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// A parsed value together with its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interned<T> {
    id: InternId,
    value: T,
}

impl<T> Interned<T> {
    pub(crate) fn new(id: InternId, value: T) -> Self {
        Self { id, value }
    }

    /// Returns the identity of this value.
    pub fn id(&self) -> InternId {
        self.id
    }

    /// Returns the wrapped value.
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T> Deref for Interned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
