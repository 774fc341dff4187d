//! Type hierarchy queries answered from class bytes alone.

mod cache;
mod provider;
mod resolver;

pub use self::cache::{TypeCache, TypeMeta, OBJECT_TYPE};
pub use self::provider::ClassBytesProvider;
pub use self::resolver::{CommonSuperResolver, CommonSuperUnresolved};
