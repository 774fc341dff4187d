//! Bytecode enhancement support for JVM entity classes.
//!
//! Two pieces are provided to a class rewriting pass:
//!
//! - [`entity::ConstructorRewriter`] strips the default initialization of
//!   persistent collection fields from constructors, working on the
//!   instruction event stream of one constructor at a time.
//! - [`hierarchy::CommonSuperResolver`] answers common superclass queries for
//!   stack map frames from raw class bytes, without loading any class.

use std::io::Read;

pub mod code;
pub mod constant_info;
pub mod entity;
pub mod error;
pub mod hierarchy;
#[cfg(feature = "jar-utils")]
pub mod jar_utils;
pub mod session;
pub mod types;

pub use error::{EnhanceError, EnhanceResult};
pub use session::{EnhanceOptions, EnhanceSession};
pub use types::*;

/// Read a class header from anything implementing `std::io::Read`.
///
/// ```rust
/// let mut reader = "this_will_be_parsed_as_classfile".as_bytes();
/// let result = entity_enhance::read_class_header(&mut reader);
/// assert!(result.is_err());
/// ```
pub fn read_class_header<T: Read>(reader: &mut T) -> EnhanceResult<ClassHeader> {
    let mut class_bytes = Vec::new();
    reader.read_to_end(&mut class_bytes)?;
    ClassHeader::parse(&class_bytes)
}
