use alloc::boxed::Box;
use core::any::Any;
use core::marker::PhantomData;

use docmap_value::{Document, FromValue, ShapeMismatch, ToValue, Value};

use crate::info::MappedUnion;

// -----------------------------------------------------------------------------
// FieldRef & FieldInput

/// The content of a field, read through a [`FieldAccess`].
pub enum FieldRef<'a> {
    /// An empty nullable field.
    Null,
    /// A scalar, already converted.
    Value(Value),
    /// A nested struct.
    Structured(&'a dyn Any),
    /// The active alternative of a union.
    Alternative { tag: &'static str, value: &'a dyn Any },
}

/// A value to store into a field through a [`FieldAccess`].
pub enum FieldInput<'v> {
    Null,
    Value(&'v Value),
    /// A nested struct built by the engine.
    Structured(Box<dyn Any>),
    /// An alternative built by the engine, selected by `tag`.
    Alternative { tag: &'static str, value: Box<dyn Any> },
}

/// Failure of a [`FieldAccess`] operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The owner is not the type the accessor was built for.
    Owner,
    /// The input is not of a form this field can hold.
    Input,
    /// A scalar conversion failed.
    Shape(ShapeMismatch),
}

// -----------------------------------------------------------------------------
// FieldAccess

/// Type-erased access to one field of an owner struct.
///
/// Built by the [`FieldDescriptor`](crate::info::FieldDescriptor)
/// constructors from a pair of plain accessor functions.
pub trait FieldAccess: Send + Sync {
    fn read<'a>(&self, owner: &'a dyn Any) -> Result<FieldRef<'a>, AccessError>;

    fn write(&self, owner: &mut dyn Any, input: FieldInput<'_>) -> Result<(), AccessError>;

    /// Stores the configured default, returning `false` if there is none.
    fn write_default(&self, owner: &mut dyn Any) -> Result<bool, AccessError>;

    /// Sets the presence flag of the field, if one is configured.
    fn mark_present(&self, owner: &mut dyn Any) -> Result<(), AccessError>;
}

/// Type-erased access to the unmapped bucket of an owner struct.
pub trait UnmappedAccess: Send + Sync {
    fn bucket<'a>(&self, owner: &'a dyn Any) -> Result<&'a Document, AccessError>;

    fn bucket_mut<'a>(&self, owner: &'a mut dyn Any) -> Result<&'a mut Document, AccessError>;
}

// -----------------------------------------------------------------------------
// Slot

pub(crate) struct Slot<O, F> {
    pub get: fn(&O) -> &F,
    pub get_mut: fn(&mut O) -> &mut F,
    pub default: Option<fn() -> F>,
    pub presence: Option<fn(&mut O) -> &mut bool>,
}

impl<O: 'static, F> Slot<O, F> {
    pub const fn new(get: fn(&O) -> &F, get_mut: fn(&mut O) -> &mut F) -> Self {
        Self {
            get,
            get_mut,
            default: None,
            presence: None,
        }
    }

    #[inline]
    fn field<'a>(&self, owner: &'a dyn Any) -> Result<&'a F, AccessError> {
        match owner.downcast_ref::<O>() {
            Some(owner) => Ok((self.get)(owner)),
            None => Err(AccessError::Owner),
        }
    }

    #[inline]
    fn field_mut<'a>(&self, owner: &'a mut dyn Any) -> Result<&'a mut F, AccessError> {
        match owner.downcast_mut::<O>() {
            Some(owner) => Ok((self.get_mut)(owner)),
            None => Err(AccessError::Owner),
        }
    }

    #[inline]
    fn store(&self, owner: &mut dyn Any, value: F) -> Result<(), AccessError> {
        *self.field_mut(owner)? = value;
        Ok(())
    }

    fn write_default(&self, owner: &mut dyn Any) -> Result<bool, AccessError> {
        let Some(default) = self.default else {
            return Ok(false);
        };
        self.store(owner, default())?;
        Ok(true)
    }

    fn mark_present(&self, owner: &mut dyn Any) -> Result<(), AccessError> {
        if let Some(flag) = self.presence {
            let owner = owner.downcast_mut::<O>().ok_or(AccessError::Owner)?;
            *flag(owner) = true;
        }
        Ok(())
    }
}

impl<O: 'static> UnmappedAccess for Slot<O, Document> {
    fn bucket<'a>(&self, owner: &'a dyn Any) -> Result<&'a Document, AccessError> {
        self.field(owner)
    }

    fn bucket_mut<'a>(&self, owner: &'a mut dyn Any) -> Result<&'a mut Document, AccessError> {
        self.field_mut(owner)
    }
}

// -----------------------------------------------------------------------------
// Scalar

pub(crate) struct ScalarAccess<O, T>(pub Slot<O, T>);

impl<O: 'static, T: FromValue + ToValue + 'static> FieldAccess for ScalarAccess<O, T> {
    fn read<'a>(&self, owner: &'a dyn Any) -> Result<FieldRef<'a>, AccessError> {
        Ok(FieldRef::Value(self.0.field(owner)?.to_value()))
    }

    fn write(&self, owner: &mut dyn Any, input: FieldInput<'_>) -> Result<(), AccessError> {
        let value = match input {
            FieldInput::Null => T::from_null().ok_or_else(|| {
                AccessError::Shape(ShapeMismatch::new("non-null value", &Value::Null))
            })?,
            FieldInput::Value(value) => T::from_value(value).map_err(AccessError::Shape)?,
            _ => return Err(AccessError::Input),
        };
        self.0.store(owner, value)
    }

    fn write_default(&self, owner: &mut dyn Any) -> Result<bool, AccessError> {
        self.0.write_default(owner)
    }

    fn mark_present(&self, owner: &mut dyn Any) -> Result<(), AccessError> {
        self.0.mark_present(owner)
    }
}

// -----------------------------------------------------------------------------
// Shapes

// How a nested struct or union is held by its field.
pub(crate) struct Required;
pub(crate) struct Boxed;
pub(crate) struct Optional;
pub(crate) struct OptionalBoxed;

pub(crate) trait NestedShape<T>: 'static {
    type Field: 'static;
    const OPTIONAL: bool;

    fn get(field: &Self::Field) -> Option<&T>;
    /// `None` when `value` is empty but the field cannot be.
    fn wrap(value: Option<Box<T>>) -> Option<Self::Field>;
}

impl<T: 'static> NestedShape<T> for Required {
    type Field = T;
    const OPTIONAL: bool = false;

    #[inline]
    fn get(field: &T) -> Option<&T> {
        Some(field)
    }

    #[inline]
    fn wrap(value: Option<Box<T>>) -> Option<T> {
        value.map(|v| *v)
    }
}

impl<T: 'static> NestedShape<T> for Boxed {
    type Field = Box<T>;
    const OPTIONAL: bool = false;

    #[inline]
    fn get(field: &Box<T>) -> Option<&T> {
        Some(&**field)
    }

    #[inline]
    fn wrap(value: Option<Box<T>>) -> Option<Box<T>> {
        value
    }
}

impl<T: 'static> NestedShape<T> for Optional {
    type Field = Option<T>;
    const OPTIONAL: bool = true;

    #[inline]
    fn get(field: &Option<T>) -> Option<&T> {
        field.as_ref()
    }

    #[inline]
    fn wrap(value: Option<Box<T>>) -> Option<Option<T>> {
        Some(value.map(|v| *v))
    }
}

impl<T: 'static> NestedShape<T> for OptionalBoxed {
    type Field = Option<Box<T>>;
    const OPTIONAL: bool = true;

    #[inline]
    fn get(field: &Option<Box<T>>) -> Option<&T> {
        field.as_deref()
    }

    #[inline]
    fn wrap(value: Option<Box<T>>) -> Option<Option<Box<T>>> {
        Some(value)
    }
}

pub(crate) trait UnionShape<U>: 'static {
    type Field: 'static;
    const OPTIONAL: bool;

    fn get(field: &Self::Field) -> Option<&U>;
    fn wrap(value: Option<U>) -> Option<Self::Field>;
}

impl<U: 'static> UnionShape<U> for Required {
    type Field = U;
    const OPTIONAL: bool = false;

    #[inline]
    fn get(field: &U) -> Option<&U> {
        Some(field)
    }

    #[inline]
    fn wrap(value: Option<U>) -> Option<U> {
        value
    }
}

impl<U: 'static> UnionShape<U> for Optional {
    type Field = Option<U>;
    const OPTIONAL: bool = true;

    #[inline]
    fn get(field: &Option<U>) -> Option<&U> {
        field.as_ref()
    }

    #[inline]
    fn wrap(value: Option<U>) -> Option<Option<U>> {
        Some(value)
    }
}

// -----------------------------------------------------------------------------
// Nested

pub(crate) struct NestedAccess<O, T, W: NestedShape<T>> {
    pub slot: Slot<O, W::Field>,
    pub _marker: PhantomData<fn() -> (T, W)>,
}

impl<O: 'static, T: 'static, W: NestedShape<T>> FieldAccess for NestedAccess<O, T, W> {
    fn read<'a>(&self, owner: &'a dyn Any) -> Result<FieldRef<'a>, AccessError> {
        Ok(match W::get(self.slot.field(owner)?) {
            Some(nested) => FieldRef::Structured(nested),
            None => FieldRef::Null,
        })
    }

    fn write(&self, owner: &mut dyn Any, input: FieldInput<'_>) -> Result<(), AccessError> {
        let nested = match input {
            FieldInput::Null => None,
            FieldInput::Structured(value) => {
                Some(value.downcast::<T>().map_err(|_| AccessError::Input)?)
            }
            _ => return Err(AccessError::Input),
        };
        let field = W::wrap(nested).ok_or(AccessError::Input)?;
        self.slot.store(owner, field)
    }

    fn write_default(&self, owner: &mut dyn Any) -> Result<bool, AccessError> {
        self.slot.write_default(owner)
    }

    fn mark_present(&self, owner: &mut dyn Any) -> Result<(), AccessError> {
        self.slot.mark_present(owner)
    }
}

// -----------------------------------------------------------------------------
// Union

pub(crate) struct UnionAccess<O, U, W: UnionShape<U>> {
    pub slot: Slot<O, W::Field>,
    pub _marker: PhantomData<fn() -> (U, W)>,
}

impl<O: 'static, U: MappedUnion, W: UnionShape<U>> FieldAccess for UnionAccess<O, U, W> {
    fn read<'a>(&self, owner: &'a dyn Any) -> Result<FieldRef<'a>, AccessError> {
        Ok(match W::get(self.slot.field(owner)?) {
            Some(union) => {
                let (tag, value) = union.active();
                FieldRef::Alternative { tag, value }
            }
            None => FieldRef::Null,
        })
    }

    fn write(&self, owner: &mut dyn Any, input: FieldInput<'_>) -> Result<(), AccessError> {
        let union = match input {
            FieldInput::Null => None,
            FieldInput::Alternative { tag, value } => {
                Some(U::from_alternative(tag, value).ok_or(AccessError::Input)?)
            }
            _ => return Err(AccessError::Input),
        };
        let field = W::wrap(union).ok_or(AccessError::Input)?;
        self.slot.store(owner, field)
    }

    fn write_default(&self, owner: &mut dyn Any) -> Result<bool, AccessError> {
        self.slot.write_default(owner)
    }

    fn mark_present(&self, owner: &mut dyn Any) -> Result<(), AccessError> {
        self.slot.mark_present(owner)
    }
}
