//! The conversion engine.
//!
//! ## Menu
//!
//! - [`Converter`]: converts documents to instances and back, driven by the
//!   descriptors of a [`TypeRegistry`](crate::TypeRegistry).
//! - [`ConvertOptions`]: runtime limits.
//!
//! ## Overlays
//!
//! Keys of an input document that no field claims are handled per type:
//!
//! - by default they are discarded;
//! - a [strict](crate::info::TypeDescriptorBuilder::strict) type fails with
//!   [`ConvertError::UnknownField`](crate::ConvertError::UnknownField) on the first one;
//! - a type with an [unmapped bucket](crate::info::TypeDescriptorBuilder::unmapped)
//!   keeps them, and writes them back after its fields.

// -----------------------------------------------------------------------------
// Modules

mod converter;
mod from_document;
mod options;
mod overlay;
mod to_document;

// -----------------------------------------------------------------------------
// Exports

pub use converter::Converter;
pub use options::ConvertOptions;
