use log::warn;

use crate::code::{InsnEvent, InsnSink};
use crate::entity::{ConstructorRewriter, FieldSuppression};
use crate::hierarchy::{ClassBytesProvider, CommonSuperResolver, CommonSuperUnresolved, TypeCache};

#[derive(Clone, Debug)]
pub struct EnhanceOptions {
    /// Keep unresolved common superclass records for the caller instead of
    /// logging and discarding them at the end of each class.
    pub keep_unresolved: bool,
    /// Strip default collection initialization of suppressed fields from
    /// constructors. When off, constructors pass through unchanged.
    pub strip_collection_init: bool,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        EnhanceOptions {
            keep_unresolved: false,
            strip_collection_init: true,
        }
    }
}

/// State shared by the classes enhanced in one run: the type metadata read so
/// far and the unresolved records of the class in progress.
///
/// A session is used by one worker at a time; parallel workers each need
/// their own.
pub struct EnhanceSession<P> {
    provider: P,
    options: EnhanceOptions,
    cache: TypeCache,
    unresolved: Vec<CommonSuperUnresolved>,
}

impl<P: ClassBytesProvider> EnhanceSession<P> {
    pub fn new(provider: P, options: EnhanceOptions) -> Self {
        EnhanceSession {
            provider,
            options,
            cache: TypeCache::new(),
            unresolved: Vec::new(),
        }
    }

    pub fn options(&self) -> &EnhanceOptions {
        &self.options
    }

    pub fn cache(&self) -> &TypeCache {
        &self.cache
    }

    pub fn resolver(&mut self) -> CommonSuperResolver<'_, P> {
        CommonSuperResolver::new(&self.provider, &mut self.cache, &mut self.unresolved)
    }

    /// Common superclass for a stack map frame merge.
    pub fn common_super_class(&mut self, type1: &str, type2: &str) -> String {
        self.resolver().common_super_class(type1, type2)
    }

    /// Run one constructor body into `sink`, returning the number of stripped
    /// collection initializations.
    pub fn rewrite_constructor<'e, O, I, S>(&self, oracle: &O, body: I, sink: S) -> usize
    where
        O: FieldSuppression + ?Sized,
        I: IntoIterator<Item = &'e InsnEvent>,
        S: InsnSink,
    {
        if !self.options.strip_collection_init {
            let mut sink = sink;
            for event in body {
                sink.visit_event(event);
            }
            return 0;
        }
        let mut rewriter = ConstructorRewriter::new(oracle, sink);
        for event in body {
            rewriter.visit_event(event);
        }
        let (stripped, _) = rewriter.finish();
        stripped
    }

    /// End of one class. Unless unresolved records are kept, they are logged
    /// against `class_name` and cleared.
    pub fn finish_class(&mut self, class_name: &str) {
        if self.options.keep_unresolved {
            return;
        }
        for record in self.unresolved.drain(..) {
            warn!("{class_name}: {}", record.message());
        }
    }

    pub fn unresolved(&self) -> &[CommonSuperUnresolved] {
        &self.unresolved
    }

    pub fn take_unresolved(&mut self) -> Vec<CommonSuperUnresolved> {
        std::mem::take(&mut self.unresolved)
    }

    pub fn clear_unresolved(&mut self) {
        self.unresolved.clear();
    }
}
