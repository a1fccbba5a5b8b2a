use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use crate::info::{Alternative, TypeDescriptor};

/// A struct that converts to and from a [`Document`](docmap_value::Document).
///
/// The descriptor is built once per registration and then stored in a
/// [`TypeRegistry`](crate::TypeRegistry). Instances are created through
/// [`Default`] and then filled field by field.
///
/// # Examples
///
/// ```
/// use docmap_reflect::Mapped;
/// use docmap_reflect::info::{FieldDescriptor, TypeDescriptor};
///
/// #[derive(Default)]
/// struct Location {
///     address: String,
///     lat: f64,
/// }
///
/// impl Mapped for Location {
///     fn type_descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>("Location")
///             .field(FieldDescriptor::scalar(
///                 "address",
///                 |l: &Location| &l.address,
///                 |l: &mut Location| &mut l.address,
///             ))
///             .field(FieldDescriptor::scalar(
///                 "lat",
///                 |l: &Location| &l.lat,
///                 |l: &mut Location| &mut l.lat,
///             ))
///             .build()
///     }
/// }
///
/// let info = Location::type_descriptor();
/// assert_eq!(info.name(), "Location");
/// assert_eq!(info.index_of("lat"), Some(1));
/// ```
pub trait Mapped: Default + Send + Sync + 'static {
    fn type_descriptor() -> TypeDescriptor;
}

/// An enum whose variants each wrap one [`Mapped`] struct.
///
/// Used as the type of a union field. The tag of the active variant is
/// written under the field's discriminator key.
///
/// # Examples
///
/// ```
/// use core::any::Any;
///
/// use docmap_reflect::info::{Alternative, TypeDescriptor};
/// use docmap_reflect::{Mapped, MappedUnion};
///
/// #[derive(Default)]
/// struct Circle;
/// #[derive(Default)]
/// struct Square;
///
/// impl Mapped for Circle {
///     fn type_descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>("Circle").build()
///     }
/// }
///
/// impl Mapped for Square {
///     fn type_descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>("Square").build()
///     }
/// }
///
/// enum Shape {
///     Circle(Circle),
///     Square(Square),
/// }
///
/// impl MappedUnion for Shape {
///     fn alternatives() -> Vec<Alternative> {
///         vec![Alternative::of::<Circle>("circle"), Alternative::of::<Square>("square")]
///     }
///
///     fn active(&self) -> (&'static str, &dyn Any) {
///         match self {
///             Shape::Circle(c) => ("circle", c as &dyn Any),
///             Shape::Square(s) => ("square", s as &dyn Any),
///         }
///     }
///
///     fn from_alternative(tag: &str, value: Box<dyn Any>) -> Option<Self> {
///         match tag {
///             "circle" => value.downcast().ok().map(|c| Shape::Circle(*c)),
///             "square" => value.downcast().ok().map(|s| Shape::Square(*s)),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(Shape::alternatives().len(), 2);
/// assert_eq!(Shape::Square(Square).active().0, "square");
/// ```
pub trait MappedUnion: Send + Sync + Sized + 'static {
    /// Every alternative, in declaration order.
    fn alternatives() -> Vec<Alternative>;

    /// Returns the tag and the value of the active variant.
    fn active(&self) -> (&'static str, &dyn Any);

    /// Rebuilds the union from the value of alternative `tag`.
    ///
    /// `value` holds an instance of that alternative's struct.
    fn from_alternative(tag: &str, value: Box<dyn Any>) -> Option<Self>;
}
