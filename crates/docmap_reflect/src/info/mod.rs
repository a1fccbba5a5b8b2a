//! Conversion metadata of mapped types.
//!
//! ## Menu
//!
//! - [`Mapped`]: implemented by structs that convert to and from documents.
//! - [`MappedUnion`]: implemented by enums used as union fields.
//! - [`TypeDescriptor`]: the ordered fields and overlay settings of one struct.
//! - [`FieldDescriptor`]: key, [`FieldFlags`], [`FieldKind`] and accessor of one field.
//! - [`FieldAccess`] / [`UnmappedAccess`]: type-erased field accessors.

// -----------------------------------------------------------------------------
// Modules

mod access;
mod field;
mod kind;
mod mapped;
mod type_descriptor;

// -----------------------------------------------------------------------------
// Exports

pub use access::{AccessError, FieldAccess, FieldInput, FieldRef, UnmappedAccess};
pub use field::{FieldBuilder, FieldDescriptor, FieldFlags};
pub use kind::{Alternative, FieldKind, StructRef, UnionInfo};
pub use mapped::{Mapped, MappedUnion};
pub use type_descriptor::{TypeDescriptor, TypeDescriptorBuilder};
