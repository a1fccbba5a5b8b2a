#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use docmap_reflect as reflect;
pub use docmap_utils as utils;
pub use docmap_value as value;

pub use docmap_reflect::{
    ConvertError, ConvertOptions, Converter, Mapped, MappedUnion, SchemaError, TypeRegistry,
};
pub use docmap_value::{Document, Value, ValueKind, document};

#[cfg(feature = "auto_register")]
pub use docmap_reflect::auto_register;

/// The types needed to describe and convert a struct.
pub mod prelude {
    pub use docmap_reflect::info::{Alternative, FieldDescriptor, TypeDescriptor};
    pub use docmap_reflect::{ConvertError, Converter, Mapped, MappedUnion, TypeRegistry};
    pub use docmap_value::{Document, Value, document};
}
