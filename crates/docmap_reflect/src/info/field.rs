use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::fmt;
use core::marker::PhantomData;

use bitflags::bitflags;
use docmap_value::{FromValue, ToValue};

use crate::info::access::{
    Boxed, NestedAccess, NestedShape, Optional, OptionalBoxed, Required, ScalarAccess, Slot,
    UnionAccess, UnionShape,
};
use crate::info::{FieldAccess, FieldKind, Mapped, MappedUnion, StructRef, UnionInfo};

// -----------------------------------------------------------------------------
// FieldFlags

bitflags! {
    /// Per-field conversion switches.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u8 {
        /// Never written to a document.
        const SKIP_SERIALIZING = 1 << 0;
        /// Never read from a document; the field behaves as if its key were absent.
        const SKIP_DESERIALIZING = 1 << 1;
        /// A presence flag is set whenever the key exists in the input.
        const TRACK_PRESENCE = 1 << 2;
        /// A default thunk fills the field when its key is absent.
        const HAS_DEFAULT = 1 << 3;

        const SKIP = Self::SKIP_SERIALIZING.bits() | Self::SKIP_DESERIALIZING.bits();
    }
}

// -----------------------------------------------------------------------------
// FieldDescriptor

/// Conversion metadata of one field.
///
/// Built through [`FieldBuilder`], see the constructors below.
pub struct FieldDescriptor {
    name: &'static str,
    key: Cow<'static, str>,
    flags: FieldFlags,
    kind: FieldKind,
    access: Box<dyn FieldAccess>,
}

impl FieldDescriptor {
    /// A field converted through [`FromValue`] and [`ToValue`].
    ///
    /// Nullability follows [`FromValue::NULLABLE`], so an `Option<T>`
    /// field accepts `null` and is written as `null` when `None`.
    pub fn scalar<O: 'static, T: FromValue + ToValue + 'static>(
        name: &'static str,
        get: fn(&O) -> &T,
        get_mut: fn(&mut O) -> &mut T,
    ) -> FieldBuilder<O, T> {
        FieldBuilder::new(
            name,
            FieldKind::Scalar {
                nullable: T::NULLABLE,
            },
            Slot::new(get, get_mut),
            |slot| Box::new(ScalarAccess(slot)),
        )
    }

    /// A required nested struct.
    pub fn nested<O: 'static, T: Mapped>(
        name: &'static str,
        get: fn(&O) -> &T,
        get_mut: fn(&mut O) -> &mut T,
    ) -> FieldBuilder<O, T> {
        Self::nested_with::<O, T, Required>(name, get, get_mut)
    }

    /// A required nested struct behind a `Box`.
    pub fn nested_boxed<O: 'static, T: Mapped>(
        name: &'static str,
        get: fn(&O) -> &Box<T>,
        get_mut: fn(&mut O) -> &mut Box<T>,
    ) -> FieldBuilder<O, Box<T>> {
        Self::nested_with::<O, T, Boxed>(name, get, get_mut)
    }

    /// A nested struct that may be `null`.
    pub fn optional<O: 'static, T: Mapped>(
        name: &'static str,
        get: fn(&O) -> &Option<T>,
        get_mut: fn(&mut O) -> &mut Option<T>,
    ) -> FieldBuilder<O, Option<T>> {
        Self::nested_with::<O, T, Optional>(name, get, get_mut)
    }

    /// A nested struct that may be `null`, behind a `Box`.
    ///
    /// This is the form self-referential types take.
    pub fn optional_boxed<O: 'static, T: Mapped>(
        name: &'static str,
        get: fn(&O) -> &Option<Box<T>>,
        get_mut: fn(&mut O) -> &mut Option<Box<T>>,
    ) -> FieldBuilder<O, Option<Box<T>>> {
        Self::nested_with::<O, T, OptionalBoxed>(name, get, get_mut)
    }

    fn nested_with<O: 'static, T: Mapped, W: NestedShape<T>>(
        name: &'static str,
        get: fn(&O) -> &W::Field,
        get_mut: fn(&mut O) -> &mut W::Field,
    ) -> FieldBuilder<O, W::Field> {
        let target = StructRef::of::<T>();
        let kind = if W::OPTIONAL {
            FieldKind::OptionalStructured(target)
        } else {
            FieldKind::Structured(target)
        };
        FieldBuilder::new(name, kind, Slot::new(get, get_mut), |slot| {
            Box::new(NestedAccess::<O, T, W> {
                slot,
                _marker: PhantomData,
            })
        })
    }

    /// A field holding one of the alternatives of `U`.
    ///
    /// Unions with more than one alternative need a
    /// [`discriminator`](FieldBuilder::discriminator).
    pub fn union<O: 'static, U: MappedUnion>(
        name: &'static str,
        get: fn(&O) -> &U,
        get_mut: fn(&mut O) -> &mut U,
    ) -> FieldBuilder<O, U> {
        Self::union_with::<O, U, Required>(name, get, get_mut)
    }

    /// A union field that may be `null`.
    pub fn optional_union<O: 'static, U: MappedUnion>(
        name: &'static str,
        get: fn(&O) -> &Option<U>,
        get_mut: fn(&mut O) -> &mut Option<U>,
    ) -> FieldBuilder<O, Option<U>> {
        Self::union_with::<O, U, Optional>(name, get, get_mut)
    }

    fn union_with<O: 'static, U: MappedUnion, W: UnionShape<U>>(
        name: &'static str,
        get: fn(&O) -> &W::Field,
        get_mut: fn(&mut O) -> &mut W::Field,
    ) -> FieldBuilder<O, W::Field> {
        let info = UnionInfo::new(U::alternatives().into_boxed_slice(), W::OPTIONAL);
        FieldBuilder::new(name, FieldKind::Union(info), Slot::new(get, get_mut), |slot| {
            Box::new(UnionAccess::<O, U, W> {
                slot,
                _marker: PhantomData,
            })
        })
    }

    /// Returns the Rust field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the document key, the field name unless renamed.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub const fn flags(&self) -> FieldFlags {
        self.flags
    }

    #[inline]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[inline]
    pub fn access(&self) -> &dyn FieldAccess {
        &*self.access
    }

    #[inline]
    pub const fn skip_serializing(&self) -> bool {
        self.flags.contains(FieldFlags::SKIP_SERIALIZING)
    }

    #[inline]
    pub const fn skip_deserializing(&self) -> bool {
        self.flags.contains(FieldFlags::SKIP_DESERIALIZING)
    }

    #[inline]
    pub const fn tracks_presence(&self) -> bool {
        self.flags.contains(FieldFlags::TRACK_PRESENCE)
    }

    #[inline]
    pub const fn has_default(&self) -> bool {
        self.flags.contains(FieldFlags::HAS_DEFAULT)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("flags", &self.flags)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// FieldBuilder

/// Typed builder of a [`FieldDescriptor`] for a field of type `F` on `O`.
///
/// # Examples
///
/// ```
/// use docmap_reflect::info::{FieldDescriptor, FieldFlags};
///
/// #[derive(Default)]
/// struct Note {
///     message: String,
///     has_message: bool,
/// }
///
/// let field: FieldDescriptor = FieldDescriptor::scalar(
///     "message",
///     |n: &Note| &n.message,
///     |n: &mut Note| &mut n.message,
/// )
/// .key("msg")
/// .default_with(|| String::from("DEFAULT"))
/// .presence(|n: &mut Note| &mut n.has_message)
/// .build();
///
/// assert_eq!(field.name(), "message");
/// assert_eq!(field.key(), "msg");
/// assert_eq!(field.flags(), FieldFlags::HAS_DEFAULT | FieldFlags::TRACK_PRESENCE);
/// ```
pub struct FieldBuilder<O, F> {
    name: &'static str,
    key: Option<Cow<'static, str>>,
    flags: FieldFlags,
    kind: FieldKind,
    slot: Slot<O, F>,
    make: fn(Slot<O, F>) -> Box<dyn FieldAccess>,
}

impl<O: 'static, F: 'static> FieldBuilder<O, F> {
    fn new(
        name: &'static str,
        kind: FieldKind,
        slot: Slot<O, F>,
        make: fn(Slot<O, F>) -> Box<dyn FieldAccess>,
    ) -> Self {
        Self {
            name,
            key: None,
            flags: FieldFlags::empty(),
            kind,
            slot,
            make,
        }
    }

    /// Reads and writes the field under `key` instead of its name.
    pub fn key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Excludes the field from both directions.
    pub fn skip(mut self) -> Self {
        self.flags |= FieldFlags::SKIP;
        self
    }

    pub fn skip_serializing(mut self) -> Self {
        self.flags |= FieldFlags::SKIP_SERIALIZING;
        self
    }

    pub fn skip_deserializing(mut self) -> Self {
        self.flags |= FieldFlags::SKIP_DESERIALIZING;
        self
    }

    /// Uses `default` when the key is absent.
    pub fn default_with(mut self, default: fn() -> F) -> Self {
        self.slot.default = Some(default);
        self.flags |= FieldFlags::HAS_DEFAULT;
        self
    }

    /// Sets `flag` to `true` whenever the key exists in the input, even
    /// when its value is `null`.
    pub fn presence(mut self, flag: fn(&mut O) -> &mut bool) -> Self {
        self.slot.presence = Some(flag);
        self.flags |= FieldFlags::TRACK_PRESENCE;
        self
    }

    /// Names the key that selects the alternative of a union field.
    ///
    /// Ignored, with a warning, on fields that are not unions.
    pub fn discriminator(mut self, key: &'static str) -> Self {
        match &mut self.kind {
            FieldKind::Union(info) => info.set_discriminator(key),
            _ => log::warn!(
                "Discriminator `{key}` ignored on non-union field `{}`",
                self.name
            ),
        }
        self
    }

    pub fn build(self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name,
            key: self.key.unwrap_or(Cow::Borrowed(self.name)),
            flags: self.flags,
            kind: self.kind,
            access: (self.make)(self.slot),
        }
    }
}

impl<O: 'static, F: 'static> From<FieldBuilder<O, F>> for FieldDescriptor {
    #[inline]
    fn from(builder: FieldBuilder<O, F>) -> Self {
        builder.build()
    }
}
