use std::collections::HashSet;
use std::fmt;

use log::{debug, warn};

use crate::error::EnhanceError;

use super::cache::{TypeCache, TypeMeta, OBJECT_TYPE};
use super::provider::ClassBytesProvider;

/// A common superclass computation that fell back to `java/lang/Object`
/// because one of the types involved could not be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommonSuperUnresolved {
    pub type1: String,
    pub type2: String,
    /// The type whose bytes were missing or unreadable.
    pub missing: String,
    pub defaulted_to: String,
    pub reason: String,
}

impl CommonSuperUnresolved {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CommonSuperUnresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "defaulted common supertype for type1:{} type2:{} as {} due to unresolved {} ({})",
            self.type1, self.type2, self.defaulted_to, self.missing, self.reason
        )
    }
}

/// Computes common superclasses from class bytes alone, never through a
/// class loader.
///
/// The cache and the diagnostics list belong to the caller; the resolver only
/// borrows them, so several resolvers over one session see the same state.
pub struct CommonSuperResolver<'a, P: ?Sized> {
    provider: &'a P,
    cache: &'a mut TypeCache,
    unresolved: &'a mut Vec<CommonSuperUnresolved>,
}

impl<'a, P: ClassBytesProvider + ?Sized> CommonSuperResolver<'a, P> {
    pub fn new(
        provider: &'a P,
        cache: &'a mut TypeCache,
        unresolved: &'a mut Vec<CommonSuperUnresolved>,
    ) -> Self {
        CommonSuperResolver {
            provider,
            cache,
            unresolved,
        }
    }

    /// The most specific class that both `type1` and `type2` extend.
    ///
    /// Only superclass chains are walked; interfaces are not considered.
    /// Unreadable types count as direct children of `java/lang/Object` and
    /// leave a [`CommonSuperUnresolved`] record behind.
    pub fn common_super_class(&mut self, type1: &str, type2: &str) -> String {
        let mut supers1 = HashSet::new();
        let mut current = type1.to_string();
        while supers1.insert(current.clone()) {
            match self.super_of(&current, type1, type2) {
                Some(next) => current = next,
                None => break,
            }
        }
        // a corrupt, cyclic chain may stop short of the root
        supers1.insert(OBJECT_TYPE.to_string());

        let mut seen = HashSet::new();
        let mut current = type2.to_string();
        loop {
            if supers1.contains(&current) {
                return current;
            }
            if !seen.insert(current.clone()) {
                return OBJECT_TYPE.to_string();
            }
            current = match self.super_of(&current, type1, type2) {
                Some(next) => next,
                None => return OBJECT_TYPE.to_string(),
            };
        }
    }

    /// Metadata for `name`, reading and caching it on first use.
    pub fn type_meta(&mut self, name: &str) -> &TypeMeta {
        self.meta(name, name, name)
    }

    pub fn is_interface(&mut self, name: &str) -> bool {
        self.type_meta(name).is_interface
    }

    /// `name` itself plus every superclass and interface it inherits from,
    /// transitively.
    pub fn instance_ofs(&mut self, name: &str) -> &HashSet<String> {
        if !self.cache.instance_ofs.contains_key(name) {
            let mut all = HashSet::new();
            let mut pending = vec![name.to_string()];
            while let Some(next) = pending.pop() {
                if !all.insert(next.clone()) {
                    continue;
                }
                let meta = self.meta(&next, name, &next);
                if let Some(super_name) = meta.super_or_object(&next) {
                    pending.push(super_name.to_string());
                }
                pending.extend(meta.interfaces.iter().cloned());
            }
            self.cache.instance_ofs.insert(name.to_string(), all);
        }
        &self.cache.instance_ofs[name]
    }

    pub fn is_instance_of(&mut self, name: &str, candidate: &str) -> bool {
        self.instance_ofs(name).contains(candidate)
    }

    fn super_of(&mut self, name: &str, type1: &str, type2: &str) -> Option<String> {
        self.meta(name, type1, type2)
            .super_or_object(name)
            .map(str::to_string)
    }

    fn meta(&mut self, name: &str, type1: &str, type2: &str) -> &TypeMeta {
        let CommonSuperResolver {
            provider,
            cache,
            unresolved,
        } = self;
        cache
            .metas
            .entry(name.to_string())
            .or_insert_with(|| load_meta(*provider, unresolved, name, type1, type2))
    }
}

fn load_meta<P: ClassBytesProvider + ?Sized>(
    provider: &P,
    unresolved: &mut Vec<CommonSuperUnresolved>,
    name: &str,
    type1: &str,
    type2: &str,
) -> TypeMeta {
    if name == OBJECT_TYPE {
        return TypeMeta::root();
    }
    let loaded = provider
        .class_bytes(name)
        .ok_or_else(|| EnhanceError::ClassNotFound(name.to_string()))
        .and_then(|bytes| TypeMeta::parse(&bytes));

    match loaded {
        Ok(meta) => {
            debug!("read type hierarchy for {name}: super {:?}", meta.super_name);
            meta
        }
        Err(e) => {
            let record = CommonSuperUnresolved {
                type1: type1.to_string(),
                type2: type2.to_string(),
                missing: name.to_string(),
                defaulted_to: OBJECT_TYPE.to_string(),
                reason: e.to_string(),
            };
            warn!("{record}");
            unresolved.push(record);
            TypeMeta::fallback()
        }
    }
}
