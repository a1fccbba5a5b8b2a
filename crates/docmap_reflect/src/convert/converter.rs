use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;

use docmap_value::Document;

use crate::convert::ConvertOptions;
use crate::info::{AccessError, FieldDescriptor, TypeDescriptor};
use crate::{ConvertError, Mapped, TypeRegistry};

// -----------------------------------------------------------------------------
// Converter

/// Converts between [`Document`]s and instances of registered types.
///
/// A converter only borrows the registry, so any number of them can run
/// at the same time.
///
/// # Examples
///
/// ```
/// use docmap_reflect::info::{FieldDescriptor, TypeDescriptor};
/// use docmap_reflect::{ConvertError, ConvertOptions, Converter, Mapped, TypeRegistry};
/// use docmap_value::document;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Mapped for Point {
///     fn type_descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>("Point")
///             .field(FieldDescriptor::scalar("x", |p: &Point| &p.x, |p: &mut Point| &mut p.x))
///             .field(FieldDescriptor::scalar("y", |p: &Point| &p.y, |p: &mut Point| &mut p.y))
///             .strict()
///             .build()
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>().unwrap();
/// let converter = Converter::with_options(&registry, ConvertOptions::new().with_max_depth(4));
///
/// let point: Point = converter.from_document(&document! { "x" => 1, "y" => 2 }).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// assert_eq!(converter.to_document(&point).unwrap(), document! { "y" => 2, "x" => 1 });
///
/// let err = converter
///     .from_document::<Point>(&document! { "x" => 1, "y" => 2, "z" => 3 })
///     .unwrap_err();
/// assert!(matches!(err, ConvertError::UnknownField { .. }));
/// ```
#[derive(Clone, Copy)]
pub struct Converter<'r> {
    pub(super) registry: &'r TypeRegistry,
    pub(super) options: ConvertOptions,
}

impl<'r> Converter<'r> {
    /// Creates a converter with default [`ConvertOptions`].
    #[inline]
    pub const fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_options(registry, ConvertOptions::new())
    }

    #[inline]
    pub const fn with_options(registry: &'r TypeRegistry, options: ConvertOptions) -> Self {
        Self { registry, options }
    }

    #[inline]
    pub const fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    #[inline]
    pub const fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Builds a `T` from `doc`.
    ///
    /// Fields are read in declaration order, then keys no field claimed are
    /// handled by the type's overlay. The first error aborts the whole
    /// conversion.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::MissingField`]: a required key without default is absent.
    /// - [`ConvertError::TypeMismatch`]: a value has the wrong shape, including `null`
    ///   for a field that does not accept it.
    /// - [`ConvertError::UnknownField`]: a strict type received an unclaimed key.
    /// - [`ConvertError::UnknownVariant`]: a union discriminator names no alternative.
    /// - [`ConvertError::DepthLimit`]: nesting exceeds [`ConvertOptions::max_depth`].
    /// - [`ConvertError::Schema`]: `T` or a nested type is not registered.
    pub fn from_document<T: Mapped>(&self, doc: &Document) -> Result<T, ConvertError> {
        let info = self.registry.lookup_type::<T>()?;
        let instance = self.read_struct(info, doc, None, 0)?;
        match instance.downcast::<T>() {
            Ok(instance) => Ok(*instance),
            Err(_) => Err(ConvertError::InstanceMismatch {
                type_name: info.name(),
            }),
        }
    }

    /// Builds an instance of the type `info` describes, boxed.
    pub fn from_document_dyn(
        &self,
        info: &TypeDescriptor,
        doc: &Document,
    ) -> Result<Box<dyn Any>, ConvertError> {
        self.read_struct(info, doc, None, 0)
    }

    /// Builds the document of `value`.
    ///
    /// Fields are written in declaration order, followed by the entries of
    /// the unmapped bucket whose keys no field produced.
    ///
    /// # Errors
    ///
    /// Fails with [`ConvertError::Schema`] when `T` or a nested type is not
    /// registered, and with [`ConvertError::DepthLimit`] on excessive nesting.
    pub fn to_document<T: Mapped>(&self, value: &T) -> Result<Document, ConvertError> {
        let info = self.registry.lookup_type::<T>()?;
        self.write_struct(info, value, 0)
    }

    /// Builds the document of `value`, an instance of the type `info` describes.
    pub fn to_document_dyn(
        &self,
        info: &TypeDescriptor,
        value: &dyn Any,
    ) -> Result<Document, ConvertError> {
        self.write_struct(info, value, 0)
    }

    #[inline]
    pub(super) fn check_depth(
        &self,
        info: &TypeDescriptor,
        depth: usize,
    ) -> Result<(), ConvertError> {
        if depth > self.options.max_depth {
            return Err(ConvertError::DepthLimit {
                type_name: info.name(),
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }
}

/// Maps an accessor failure to the error reported for `field`.
pub(super) fn access_error(
    info: &TypeDescriptor,
    field: &FieldDescriptor,
    err: AccessError,
) -> ConvertError {
    match err {
        AccessError::Shape(shape) => ConvertError::TypeMismatch {
            type_name: info.name(),
            key: String::from(field.key()),
            expected: shape.expected,
            actual: shape.actual,
        },
        AccessError::Owner | AccessError::Input => ConvertError::InstanceMismatch {
            type_name: info.name(),
        },
    }
}
