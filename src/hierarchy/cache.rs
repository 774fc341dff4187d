use std::collections::{HashMap, HashSet};

use crate::error::EnhanceResult;
use crate::types::ClassHeader;

pub const OBJECT_TYPE: &str = "java/lang/Object";

/// The parts of a class header the hierarchy needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMeta {
    pub super_name: Option<String>,
    pub interfaces: Vec<String>,
    pub is_interface: bool,
}

impl TypeMeta {
    pub fn root() -> Self {
        TypeMeta {
            super_name: None,
            interfaces: Vec::new(),
            is_interface: false,
        }
    }

    /// Stand-in for a type whose bytes could not be read: a plain class
    /// directly below `java/lang/Object`.
    pub fn fallback() -> Self {
        TypeMeta {
            super_name: Some(OBJECT_TYPE.to_string()),
            interfaces: Vec::new(),
            is_interface: false,
        }
    }

    pub fn from_header(header: &ClassHeader) -> EnhanceResult<Self> {
        Ok(TypeMeta {
            super_name: header.super_name()?,
            interfaces: header.interface_names()?,
            is_interface: header.is_interface(),
        })
    }

    pub fn parse(bytes: &[u8]) -> EnhanceResult<Self> {
        Self::from_header(&ClassHeader::parse(bytes)?)
    }

    /// Superclass for the ancestor walk. Only `java/lang/Object` itself has
    /// none; anything else without one is treated as a direct child of it.
    pub(crate) fn super_or_object(&self, name: &str) -> Option<&str> {
        match &self.super_name {
            Some(super_name) => Some(super_name.as_str()),
            None if name == OBJECT_TYPE => None,
            None => Some(OBJECT_TYPE),
        }
    }
}

/// Type metadata keyed by internal name, kept for one enhancement session.
/// Types are assumed not to change while the session lasts.
#[derive(Debug, Default)]
pub struct TypeCache {
    pub(crate) metas: HashMap<String, TypeMeta>,
    pub(crate) instance_ofs: HashMap<String, HashSet<String>>,
}

impl TypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&TypeMeta> {
        self.metas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.metas.contains_key(name)
    }

    /// Pre-populate a type, e.g. one the caller has already parsed.
    pub fn insert(&mut self, name: impl Into<String>, meta: TypeMeta) {
        let name = name.into();
        // memoized instance-of sets may include the old hierarchy
        self.instance_ofs.clear();
        self.metas.insert(name, meta);
    }

    pub fn len(&self) -> usize {
        self.metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
    }

    pub fn clear(&mut self) {
        self.metas.clear();
        self.instance_ofs.clear();
    }
}
