//! Type-directed conversion between [`Document`]s and Rust structs.
//!
//! A struct opts in by implementing [`Mapped`], which returns a
//! [`TypeDescriptor`](info::TypeDescriptor) listing its fields in order.
//! Descriptors are stored once in a [`TypeRegistry`]; after that the
//! registry is read-only and a [`Converter`] walks descriptors to build an
//! instance from a document, or a document from an instance.
//!
//! ## Menu
//!
//! - [`info`]: field and type descriptors, the [`Mapped`] and [`MappedUnion`] traits.
//! - [`registry`]: the [`TypeRegistry`], schema validation and automatic registration.
//! - [`convert`]: the conversion engine and its overlays.
//!
//! # Examples
//!
//! ```
//! use docmap_reflect::info::{FieldDescriptor, TypeDescriptor};
//! use docmap_reflect::{Mapped, TypeRegistry};
//! use docmap_value::document;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Note {
//!     message: String,
//! }
//!
//! impl Mapped for Note {
//!     fn type_descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>("Note")
//!             .field(
//!                 FieldDescriptor::scalar(
//!                     "message",
//!                     |n: &Note| &n.message,
//!                     |n: &mut Note| &mut n.message,
//!                 )
//!                 .default_with(|| String::from("DEFAULT")),
//!             )
//!             .build()
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Note>().unwrap();
//!
//! let note: Note = registry.from_document(&document! {}).unwrap();
//! assert_eq!(note.message, "DEFAULT");
//!
//! let doc = registry.to_document(&note).unwrap();
//! assert_eq!(doc, document! { "message" => "DEFAULT" });
//! ```
//!
//! [`Document`]: docmap_value::Document
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod convert;
pub mod info;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}

pub use convert::{ConvertOptions, Converter};
pub use error::{ConvertError, SchemaError};
pub use info::{Mapped, MappedUnion};
pub use registry::TypeRegistry;
