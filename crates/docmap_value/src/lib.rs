//! The untyped document model shared by the `docmap` crates.
//!
//! ## Menu
//!
//! - [`Value`]: a dynamically typed value, scalar, sequence or nested document.
//! - [`ValueKind`]: the shape of a [`Value`], used in error messages.
//! - [`Document`]: an insertion ordered mapping from string keys to values.
//! - [`FromValue`] / [`ToValue`]: conversions between Rust scalars and values.
//! - [`document!`]: build a [`Document`] literally.
//!
//! With the `serde` feature, [`Value`] and [`Document`] implement
//! `Serialize` and `Deserialize`, so any serde format crate can produce or
//! consume them.
//!
//! # Examples
//!
//! ```
//! use docmap_value::{document, Value};
//!
//! let doc = document! {
//!     "address" => "Crystal Road 1234",
//!     "location" => document! { "lat" => 12.3, "lon" => 34.5 },
//! };
//!
//! assert_eq!(doc.get("address").and_then(Value::as_str), Some("Crystal Road 1234"));
//! assert_eq!(doc.keys().collect::<Vec<_>>(), ["address", "location"]);
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod document;
mod scalar;
mod value;

#[cfg(feature = "serde")]
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use document::{Document, Iter};
pub use scalar::{FromValue, ShapeMismatch, ToValue};
pub use value::{Value, ValueKind};
