use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use crate::info::{Mapped, TypeDescriptor};

// -----------------------------------------------------------------------------
// StructRef

/// A reference to a [`Mapped`] type, used by fields that hold one.
///
/// The referenced descriptor is only built when the registry needs it.
#[derive(Clone, Copy)]
pub struct StructRef {
    type_id: TypeId,
    type_path: &'static str,
    descriptor: fn() -> TypeDescriptor,
}

impl StructRef {
    /// Creates a reference to `T`.
    #[inline]
    pub fn of<T: Mapped>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: core::any::type_name::<T>(),
            descriptor: T::type_descriptor,
        }
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full path of the referenced type.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Builds the descriptor of the referenced type.
    #[inline]
    pub fn descriptor(&self) -> TypeDescriptor {
        (self.descriptor)()
    }
}

impl PartialEq for StructRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for StructRef {}

impl fmt::Debug for StructRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StructRef").field(&self.type_path).finish()
    }
}

// -----------------------------------------------------------------------------
// Union

/// One structured alternative of a union field, selected by `tag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alternative {
    tag: &'static str,
    target: StructRef,
}

impl Alternative {
    /// Creates an alternative holding a `T`, written and read as `tag`.
    #[inline]
    pub fn of<T: Mapped>(tag: &'static str) -> Self {
        Self {
            tag,
            target: StructRef::of::<T>(),
        }
    }

    #[inline]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    #[inline]
    pub const fn target(&self) -> &StructRef {
        &self.target
    }
}

/// The alternatives of a union field and how to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionInfo {
    alternatives: Box<[Alternative]>,
    nullable: bool,
    discriminator: Option<&'static str>,
}

impl UnionInfo {
    pub(crate) fn new(alternatives: Box<[Alternative]>, nullable: bool) -> Self {
        Self {
            alternatives,
            nullable,
            discriminator: None,
        }
    }

    pub(crate) fn set_discriminator(&mut self, key: &'static str) {
        self.discriminator = Some(key);
    }

    #[inline]
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Finds the alternative written as `tag`.
    pub fn alternative(&self, tag: &str) -> Option<&Alternative> {
        self.alternatives.iter().find(|alt| alt.tag == tag)
    }

    #[inline]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The key inside the nested document that names the active alternative.
    #[inline]
    pub const fn discriminator(&self) -> Option<&'static str> {
        self.discriminator
    }
}

// -----------------------------------------------------------------------------
// FieldKind

/// What a field holds, which decides how the engine converts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A value passed through [`FromValue`](docmap_value::FromValue) and
    /// [`ToValue`](docmap_value::ToValue).
    Scalar { nullable: bool },
    /// A required nested struct.
    Structured(StructRef),
    /// A nested struct that may be null.
    OptionalStructured(StructRef),
    /// One of several nested structs.
    Union(UnionInfo),
}

impl FieldKind {
    /// Whether `null` is accepted for this field.
    pub const fn is_nullable(&self) -> bool {
        match self {
            Self::Scalar { nullable } => *nullable,
            Self::Structured(_) => false,
            Self::OptionalStructured(_) => true,
            Self::Union(info) => info.nullable,
        }
    }

    /// A short description of the accepted shape, used in error messages.
    pub const fn expected(&self) -> &'static str {
        match self {
            Self::Scalar { .. } => "scalar",
            Self::Structured(_) | Self::OptionalStructured(_) | Self::Union(_) => "document",
        }
    }

    /// Calls `f` for every struct this field can hold.
    ///
    /// With `required_only`, nullable fields are skipped: they can always
    /// be left empty and so never force a nested instance to exist.
    pub fn for_each_target(&self, required_only: bool, mut f: impl FnMut(&StructRef)) {
        match self {
            Self::Scalar { .. } => {}
            Self::Structured(target) => f(target),
            Self::OptionalStructured(target) => {
                if !required_only {
                    f(target);
                }
            }
            Self::Union(info) => {
                if !required_only || !info.nullable {
                    info.alternatives.iter().for_each(|alt| f(&alt.target));
                }
            }
        }
    }
}
