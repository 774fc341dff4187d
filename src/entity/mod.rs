//! Entity constructor rewriting.

mod deferred;
mod rewriter;

use std::collections::HashSet;

pub use self::deferred::{is_collection, DeferState, DeferredInit, COLLECTION_TYPES, INIT, NOARG_VOID};
pub use self::rewriter::ConstructorRewriter;

/// Per-class decision on which fields lose their default collection
/// initializer, typically the OneToMany and ManyToMany properties.
pub trait FieldSuppression {
    fn suppress_init(&self, field_name: &str) -> bool;
}

impl<F> FieldSuppression for F
where
    F: Fn(&str) -> bool,
{
    fn suppress_init(&self, field_name: &str) -> bool {
        self(field_name)
    }
}

/// A fixed set of field names to suppress.
#[derive(Clone, Debug, Default)]
pub struct SuppressedFields {
    names: HashSet<String>,
}

impl SuppressedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field_name: impl Into<String>) {
        self.names.insert(field_name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SuppressedFields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SuppressedFields {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl FieldSuppression for SuppressedFields {
    fn suppress_init(&self, field_name: &str) -> bool {
        self.names.contains(field_name)
    }
}
