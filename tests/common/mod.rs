#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use entity_enhance::code::{InsnEvent, Opcode};
use entity_enhance::constant_info::{ClassConstant, ConstantInfo, LongConstant, Utf8Constant};
use entity_enhance::hierarchy::ClassBytesProvider;
use entity_enhance::{ClassAccessFlags, ClassHeader};

// ---------------------------------------------------------------------------
// Class stubs
// ---------------------------------------------------------------------------

fn push_class(pool: &mut Vec<ConstantInfo>, name: &str) -> u16 {
    pool.push(ConstantInfo::Utf8(Utf8Constant::new(name)));
    let name_index = pool.len() as u16;
    pool.push(ConstantInfo::Class(ClassConstant { name_index }));
    pool.len() as u16
}

pub fn stub_header(
    name: &str,
    super_name: Option<&str>,
    interfaces: &[&str],
    access_flags: ClassAccessFlags,
) -> ClassHeader {
    let mut pool = Vec::new();
    // a wide constant up front so indices after it depend on the Unusable slot
    pool.push(ConstantInfo::Long(LongConstant { value: 42 }));
    pool.push(ConstantInfo::Unusable);
    let this_class = push_class(&mut pool, name);
    let super_class = super_name.map_or(0, |s| push_class(&mut pool, s));
    let interfaces: Vec<u16> = interfaces
        .iter()
        .map(|i| push_class(&mut pool, i))
        .collect();

    ClassHeader {
        minor_version: 0,
        major_version: 52,
        const_pool_size: pool.len() as u16 + 1,
        const_pool: pool,
        access_flags,
        this_class,
        super_class,
        interfaces_count: interfaces.len() as u16,
        interfaces,
    }
}

/// A complete class file with no fields, methods or attributes.
pub fn header_to_class_bytes(header: &ClassHeader) -> Vec<u8> {
    let mut bytes = header.to_bytes().unwrap();
    // fields_count, methods_count, attributes_count
    bytes.extend_from_slice(&[0; 6]);
    bytes
}

pub fn class_bytes(name: &str, super_name: &str, interfaces: &[&str]) -> Vec<u8> {
    let header = stub_header(
        name,
        Some(super_name),
        interfaces,
        ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
    );
    header_to_class_bytes(&header)
}

pub fn interface_bytes(name: &str) -> Vec<u8> {
    let header = stub_header(
        name,
        Some("java/lang/Object"),
        &[],
        ClassAccessFlags::PUBLIC | ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT,
    );
    header_to_class_bytes(&header)
}

/// `test/A <- test/B <- test/C` and `test/A <- test/D`, with `test/C`
/// implementing `test/Named`.
pub fn sample_hierarchy() -> HashMap<String, Vec<u8>> {
    let mut classes = HashMap::new();
    classes.insert("test/A".to_string(), class_bytes("test/A", "java/lang/Object", &[]));
    classes.insert("test/B".to_string(), class_bytes("test/B", "test/A", &[]));
    classes.insert("test/C".to_string(), class_bytes("test/C", "test/B", &["test/Named"]));
    classes.insert("test/D".to_string(), class_bytes("test/D", "test/A", &[]));
    classes.insert("test/Named".to_string(), interface_bytes("test/Named"));
    classes
}

/// Serves a fixed set of classes and records every lookup.
pub struct CountingProvider {
    pub classes: HashMap<String, Vec<u8>>,
    pub calls: RefCell<Vec<String>>,
}

impl CountingProvider {
    pub fn new(classes: HashMap<String, Vec<u8>>) -> Self {
        CountingProvider {
            classes,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ClassBytesProvider for CountingProvider {
    fn class_bytes(&self, internal_name: &str) -> Option<Vec<u8>> {
        self.calls.borrow_mut().push(internal_name.to_string());
        self.classes.get(internal_name).cloned()
    }
}

// ---------------------------------------------------------------------------
// Instruction sequences
// ---------------------------------------------------------------------------

pub const OWNER: &str = "test/model/Customer";

pub fn aload_0() -> InsnEvent {
    InsnEvent::var(Opcode::ALOAD, 0)
}

pub fn new_collection(type_name: &str) -> Vec<InsnEvent> {
    vec![
        InsnEvent::type_insn(Opcode::NEW, type_name),
        InsnEvent::insn(Opcode::DUP),
        InsnEvent::method(Opcode::INVOKESPECIAL, type_name, "<init>", "()V", false),
    ]
}

pub fn put_field(name: &str, descriptor: &str) -> InsnEvent {
    InsnEvent::field(Opcode::PUTFIELD, OWNER, name, descriptor)
}

/// `this.<field> = new <type_name>();` as javac emits it.
pub fn init_field(type_name: &str, field: &str) -> Vec<InsnEvent> {
    let mut events = vec![aload_0()];
    events.extend(new_collection(type_name));
    events.push(put_field(field, "Ljava/util/List;"));
    events
}

pub fn super_call() -> Vec<InsnEvent> {
    vec![
        aload_0(),
        InsnEvent::method(Opcode::INVOKESPECIAL, "java/lang/Object", "<init>", "()V", false),
    ]
}
