use std::sync::OnceLock;

use docmap_value::Document;

use crate::registry::TypeRegistry;
use crate::{ConvertError, Mapped, SchemaError};

/// Returns the process-wide registry, holding every type submitted through
/// [`auto_register!`](crate::auto_register).
///
/// Built on first use and read-only afterwards. A schema error found while
/// building it is returned on every call.
pub fn global() -> Result<&'static TypeRegistry, SchemaError> {
    static GLOBAL: OnceLock<Result<TypeRegistry, SchemaError>> = OnceLock::new();

    GLOBAL
        .get_or_init(|| {
            let mut registry = TypeRegistry::new();
            registry.auto_register().map(|_| registry)
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// Builds a `T` from `doc` through the [`global`] registry.
pub fn from_document<T: Mapped>(doc: &Document) -> Result<T, ConvertError> {
    global()?.from_document(doc)
}

/// Builds the document of `value` through the [`global`] registry.
pub fn to_document<T: Mapped>(value: &T) -> Result<Document, ConvertError> {
    global()?.to_document(value)
}
