mod common;

use entity_enhance::code::{InsnEvent, Opcode};
use entity_enhance::entity::SuppressedFields;
use entity_enhance::hierarchy::OBJECT_TYPE;
use entity_enhance::{EnhanceOptions, EnhanceSession};

use common::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn session_without(missing: &str, options: EnhanceOptions) -> EnhanceSession<CountingProvider> {
    let mut classes = sample_hierarchy();
    classes.remove(missing);
    EnhanceSession::new(CountingProvider::new(classes), options)
}

#[test]
fn unresolved_records_are_logged_and_cleared_per_class() {
    init_logging();
    let mut session = session_without("test/D", EnhanceOptions::default());

    assert_eq!(session.common_super_class("test/C", "test/D"), OBJECT_TYPE);
    assert_eq!(session.unresolved().len(), 1);

    session.finish_class("test/model/Customer");
    assert!(session.unresolved().is_empty());
}

#[test]
fn unresolved_records_are_kept_when_asked() {
    init_logging();
    let options = EnhanceOptions {
        keep_unresolved: true,
        ..EnhanceOptions::default()
    };
    let mut session = session_without("test/D", options);

    session.common_super_class("test/C", "test/D");
    session.finish_class("test/model/Customer");
    assert_eq!(session.unresolved().len(), 1);

    let taken = session.take_unresolved();
    assert_eq!(taken[0].type1, "test/C");
    assert_eq!(taken[0].type2, "test/D");
    assert!(session.unresolved().is_empty());

    // cached fallback: later classes see the coarse answer without a record
    assert_eq!(session.common_super_class("test/D", "test/B"), OBJECT_TYPE);
    assert!(session.unresolved().is_empty());
}

#[test]
fn options_are_copied_into_each_session() {
    let options = EnhanceOptions {
        keep_unresolved: true,
        ..EnhanceOptions::default()
    };
    let first = EnhanceSession::new(CountingProvider::new(sample_hierarchy()), options.clone());
    let second = EnhanceSession::new(CountingProvider::new(sample_hierarchy()), options);

    assert!(first.options().keep_unresolved);
    assert!(second.options().strip_collection_init);
    assert!(format!("{:?}", second.options()).contains("keep_unresolved: true"));
}

#[test]
fn cache_outlives_classes() {
    let mut session = EnhanceSession::new(
        CountingProvider::new(sample_hierarchy()),
        EnhanceOptions::default(),
    );
    assert_eq!(session.common_super_class("test/C", "test/D"), "test/A");
    session.finish_class("test/model/Customer");
    assert!(session.cache().contains("test/D"));

    let mut resolver = session.resolver();
    assert_eq!(resolver.common_super_class("test/B", "test/D"), "test/A");
    assert!(resolver.is_instance_of("test/C", "test/Named"));
    drop(resolver);

    session.clear_unresolved();
    assert!(session.unresolved().is_empty());
}

fn customer_constructor() -> Vec<InsnEvent> {
    let mut events = super_call();
    events.extend(init_field("java/util/ArrayList", "contacts"));
    events.extend(init_field("java/util/HashSet", "roles"));
    events.push(InsnEvent::insn(Opcode::RETURN));
    events
}

#[test]
fn rewrite_constructor_strips_flagged_collections() {
    init_logging();
    let session = EnhanceSession::new(
        CountingProvider::new(sample_hierarchy()),
        EnhanceOptions::default(),
    );
    let oracle: SuppressedFields = ["contacts", "roles"].into_iter().collect();

    let mut out: Vec<InsnEvent> = Vec::new();
    let stripped = session.rewrite_constructor(&oracle, &customer_constructor(), &mut out);

    assert_eq!(stripped, 2);
    let mut expected = super_call();
    expected.push(InsnEvent::insn(Opcode::RETURN));
    assert_eq!(out, expected);
}

#[test]
fn rewrite_constructor_disabled_passes_everything() {
    let options = EnhanceOptions {
        strip_collection_init: false,
        ..EnhanceOptions::default()
    };
    let session = EnhanceSession::new(CountingProvider::new(sample_hierarchy()), options);
    let oracle: SuppressedFields = ["contacts", "roles"].into_iter().collect();

    let mut out: Vec<InsnEvent> = Vec::new();
    let events = customer_constructor();
    let stripped = session.rewrite_constructor(&oracle, &events, &mut out);

    assert_eq!(stripped, 0);
    assert_eq!(out, events);
}
