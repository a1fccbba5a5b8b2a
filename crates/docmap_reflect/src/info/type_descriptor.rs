use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use docmap_value::Document;

use crate::info::access::Slot;
use crate::info::{FieldBuilder, FieldDescriptor, UnmappedAccess};

// -----------------------------------------------------------------------------
// TypeDescriptor

/// Conversion metadata of one struct: its fields in declaration order and
/// the overlays it opts into.
///
/// Built with [`TypeDescriptor::builder`], usually from
/// [`Mapped::type_descriptor`](crate::Mapped::type_descriptor).
pub struct TypeDescriptor {
    type_id: TypeId,
    name: &'static str,
    type_path: &'static str,
    construct: fn() -> Box<dyn Any>,
    fields: Box<[FieldDescriptor]>,
    strict: bool,
    unmapped: Option<Box<dyn UnmappedAccess>>,
}

fn construct_default<O: Default + 'static>() -> Box<dyn Any> {
    Box::new(O::default())
}

impl TypeDescriptor {
    /// Starts a descriptor for `O`, reported as `name` in errors.
    #[inline]
    pub fn builder<O: Default + Send + Sync + 'static>(
        name: &'static str,
    ) -> TypeDescriptorBuilder<O> {
        TypeDescriptorBuilder {
            name,
            fields: Vec::new(),
            strict: false,
            unmapped: None,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the short name given to the builder.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the full path of the described type.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Creates a blank instance, holding the type's `Default`.
    #[inline]
    pub fn construct(&self) -> Box<dyn Any> {
        (self.construct)()
    }

    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the field stored under document key `key`.
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.key() == key)
    }

    /// Returns the declaration position of the field stored under `key`.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.key() == key)
    }

    /// Whether unknown keys are rejected when reading.
    #[inline]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    #[inline]
    pub const fn has_unmapped(&self) -> bool {
        self.unmapped.is_some()
    }

    /// The accessor of the bucket that captures unknown keys.
    #[inline]
    pub fn unmapped(&self) -> Option<&dyn UnmappedAccess> {
        self.unmapped.as_deref()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("type_path", &self.type_path)
            .field("fields", &self.fields)
            .field("strict", &self.strict)
            .field("unmapped", &self.has_unmapped())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptorBuilder

/// Builder returned by [`TypeDescriptor::builder`].
pub struct TypeDescriptorBuilder<O> {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
    strict: bool,
    unmapped: Option<Box<dyn UnmappedAccess>>,
    _marker: PhantomData<fn() -> O>,
}

impl<O: Default + Send + Sync + 'static> TypeDescriptorBuilder<O> {
    /// Appends a field. Fields are converted in the order they are added.
    pub fn field<F: 'static>(mut self, field: FieldBuilder<O, F>) -> Self {
        self.fields.push(field.build());
        self
    }

    /// Rejects documents holding keys that no field claims.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Captures unclaimed keys into a `Document` field of `O` when reading
    /// and writes them back after the mapped fields when writing.
    pub fn unmapped(
        mut self,
        get: fn(&O) -> &Document,
        get_mut: fn(&mut O) -> &mut Document,
    ) -> Self {
        let bucket: Box<dyn UnmappedAccess> = Box::new(Slot::new(get, get_mut));
        self.unmapped = Some(bucket);
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            type_id: TypeId::of::<O>(),
            name: self.name,
            type_path: core::any::type_name::<O>(),
            construct: construct_default::<O>,
            fields: self.fields.into_boxed_slice(),
            strict: self.strict,
            unmapped: self.unmapped,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use docmap_value::{Document, document};

    use super::TypeDescriptor;
    use crate::info::FieldDescriptor;

    #[derive(Default)]
    struct Loose {
        id: i64,
        rest: Document,
    }

    fn loose() -> TypeDescriptor {
        TypeDescriptor::builder::<Loose>("Loose")
            .field(
                FieldDescriptor::scalar("id", |l: &Loose| &l.id, |l: &mut Loose| &mut l.id)
                    .key("ID"),
            )
            .unmapped(|l: &Loose| &l.rest, |l: &mut Loose| &mut l.rest)
            .strict()
            .build()
    }

    #[test]
    fn lookup_by_key() {
        let info = loose();
        assert_eq!(info.name(), "Loose");
        assert!(info.type_path().ends_with("Loose"));
        assert_eq!(info.index_of("ID"), Some(0));
        assert_eq!(info.index_of("id"), None);
        assert_eq!(info.field("ID").map(|f| f.name()), Some("id"));
        assert!(info.is_strict());
        assert!(info.has_unmapped());
    }

    #[test]
    fn construct_and_bucket() {
        let info = loose();
        let mut instance = info.construct();
        assert!(instance.is::<Loose>());

        let bucket = info.unmapped().unwrap();
        bucket
            .bucket_mut(&mut *instance)
            .unwrap()
            .insert("extra", String::from("x"));
        assert_eq!(bucket.bucket(&*instance).unwrap(), &document! { "extra" => "x" });
        assert!(bucket.bucket(&0_u8).is_err());
    }
}
