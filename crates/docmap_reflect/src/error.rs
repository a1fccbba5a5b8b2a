use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;

use docmap_value::ValueKind;
use thiserror::Error;

// -----------------------------------------------------------------------------
// SchemaError

/// A descriptor was rejected while registering it, or a required one is missing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("Duplicate document key `{key}` on type `{type_name}`")]
    DuplicateKey {
        type_name: &'static str,
        key: String,
    },

    #[error("Type `{type_path}` is not registered")]
    UnregisteredType {
        type_id: TypeId,
        type_path: &'static str,
    },

    #[error("Required fields form a cycle: {}", .cycle.join(" -> "))]
    SchemaCycle {
        /// Type names along the cycle, the first one repeated at the end.
        cycle: Vec<&'static str>,
    },

    #[error("Union field `{field}` on `{type_name}` has several alternatives but no discriminator")]
    AmbiguousUnion {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("Union field `{field}` on type `{type_name}` is invalid: {reason}")]
    InvalidUnion {
        type_name: &'static str,
        field: &'static str,
        reason: &'static str,
    },

    #[error("Descriptor mismatch: expected `{expected}`, found `{found}`")]
    MismatchedDescriptor {
        expected: &'static str,
        found: &'static str,
    },
}

// -----------------------------------------------------------------------------
// ConvertError

/// Failure while converting between a `Document` and an instance.
///
/// Conversion is all-or-nothing: when this is returned no partially built
/// instance or document escapes.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConvertError {
    #[error("Missing field `{key}` on type `{type_name}`")]
    MissingField {
        type_name: &'static str,
        key: String,
    },

    #[error("Type mismatch at `{key}` on type `{type_name}`: expected {expected}, found {actual}")]
    TypeMismatch {
        type_name: &'static str,
        key: String,
        expected: &'static str,
        actual: ValueKind,
    },

    #[error("Unknown field `{key}` on type `{type_name}`")]
    UnknownField {
        type_name: &'static str,
        key: String,
    },

    #[error("Unknown variant `{tag}` at `{key}` on type `{type_name}`")]
    UnknownVariant {
        type_name: &'static str,
        key: String,
        tag: String,
    },

    #[error("Nesting exceeds {limit} levels at type `{type_name}`")]
    DepthLimit {
        type_name: &'static str,
        limit: usize,
    },

    #[error("Instance does not match the descriptor of type `{type_name}`")]
    InstanceMismatch { type_name: &'static str },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ConvertError {
    /// The name of the type being converted when the error occurred.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { type_name, .. }
            | Self::TypeMismatch { type_name, .. }
            | Self::UnknownField { type_name, .. }
            | Self::UnknownVariant { type_name, .. }
            | Self::DepthLimit { type_name, .. }
            | Self::InstanceMismatch { type_name } => Some(*type_name),
            Self::Schema(_) => None,
        }
    }

    /// The document key the error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingField { key, .. }
            | Self::TypeMismatch { key, .. }
            | Self::UnknownField { key, .. }
            | Self::UnknownVariant { key, .. } => Some(key.as_str()),
            _ => None,
        }
    }
}
