//! Storage and validation of type descriptors.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: stores [`TypeDescriptor`](crate::info::TypeDescriptor)s,
//!   validating each registration as a whole.
//! - [`TypeRegistryArc`]: a shared handle to a finished registry.
//! - [`global`]: a process-wide registry built from [`auto_register!`](crate::auto_register)
//!   (`std` and `auto_register` features).
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`] .
//!
//! We use [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

#[cfg(feature = "auto_register")]
mod auto_register;
#[cfg(all(feature = "std", feature = "auto_register"))]
mod global;
mod type_registry;
mod validate;

// -----------------------------------------------------------------------------
// Exports

#[cfg(feature = "auto_register")]
pub use auto_register::AutoRegistration;
#[cfg(all(feature = "std", feature = "auto_register"))]
pub use global::{from_document, global, to_document};
pub use type_registry::{TypeRegistry, TypeRegistryArc};
