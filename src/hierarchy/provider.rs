/// Source of raw class file bytes, looked up by internal name
/// (`com/example/Customer`).
///
/// Implementations must not define or link the class; they only hand out
/// bytes. `None` means the class is not available.
pub trait ClassBytesProvider {
    fn class_bytes(&self, internal_name: &str) -> Option<Vec<u8>>;
}

impl<F> ClassBytesProvider for F
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    fn class_bytes(&self, internal_name: &str) -> Option<Vec<u8>> {
        self(internal_name)
    }
}
