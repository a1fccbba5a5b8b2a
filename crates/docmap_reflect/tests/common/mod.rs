//! Types shared by the integration tests.
#![allow(dead_code)]

use core::any::Any;

use docmap_reflect::info::{Alternative, FieldDescriptor, TypeDescriptor};
use docmap_reflect::{Mapped, MappedUnion, TypeRegistry};
use docmap_value::{Document, document};

// -----------------------------------------------------------------------------
// House

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub message: String,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            message: String::from("DEFAULT"),
        }
    }
}

impl Mapped for Note {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Note")
            .field(
                FieldDescriptor::scalar(
                    "message",
                    |n: &Note| &n.message,
                    |n: &mut Note| &mut n.message,
                )
                .default_with(|| String::from("DEFAULT")),
            )
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub note: Note,
}

impl Mapped for Location {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Location")
            .field(
                FieldDescriptor::scalar(
                    "latitude",
                    |l: &Location| &l.latitude,
                    |l: &mut Location| &mut l.latitude,
                )
                .key("lat"),
            )
            .field(
                FieldDescriptor::scalar(
                    "longitude",
                    |l: &Location| &l.longitude,
                    |l: &mut Location| &mut l.longitude,
                )
                .key("lon"),
            )
            .field(FieldDescriptor::nested(
                "note",
                |l: &Location| &l.note,
                |l: &mut Location| &mut l.note,
            ))
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct House {
    pub address: String,
    pub location: Option<Location>,
    pub note: Note,
}

impl Mapped for House {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("House")
            .field(FieldDescriptor::scalar(
                "address",
                |h: &House| &h.address,
                |h: &mut House| &mut h.address,
            ))
            .field(FieldDescriptor::optional(
                "location",
                |h: &House| &h.location,
                |h: &mut House| &mut h.location,
            ))
            .field(
                FieldDescriptor::nested("note", |h: &House| &h.note, |h: &mut House| &mut h.note)
                    .default_with(Note::default),
            )
            .build()
    }
}

pub fn house_document() -> Document {
    document! {
        "address" => "Crystal Road 1234",
        "location" => document! {
            "lat" => 12.3,
            "lon" => 34.5,
            "note" => document! { "message" => "hmmmm" },
        },
        "note" => document! { "message" => "Nice Address" },
    }
}

pub fn house() -> House {
    House {
        address: String::from("Crystal Road 1234"),
        location: Some(Location {
            latitude: 12.3,
            longitude: 34.5,
            note: Note {
                message: String::from("hmmmm"),
            },
        }),
        note: Note {
            message: String::from("Nice Address"),
        },
    }
}

pub fn house_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register::<House>().expect("House schema is valid");
    registry
}

// -----------------------------------------------------------------------------
// Overlays

#[derive(Debug, Default, PartialEq)]
pub struct StrictNote {
    pub message: String,
}

impl Mapped for StrictNote {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("StrictNote")
            .field(FieldDescriptor::scalar(
                "message",
                |n: &StrictNote| &n.message,
                |n: &mut StrictNote| &mut n.message,
            ))
            .strict()
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct OpenNote {
    pub message: String,
    pub extra: Document,
}

impl Mapped for OpenNote {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("OpenNote")
            .field(FieldDescriptor::scalar(
                "message",
                |n: &OpenNote| &n.message,
                |n: &mut OpenNote| &mut n.message,
            ))
            .unmapped(|n: &OpenNote| &n.extra, |n: &mut OpenNote| &mut n.extra)
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct GuardedNote {
    pub message: String,
    pub extra: Document,
}

impl Mapped for GuardedNote {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("GuardedNote")
            .field(FieldDescriptor::scalar(
                "message",
                |n: &GuardedNote| &n.message,
                |n: &mut GuardedNote| &mut n.message,
            ))
            .unmapped(|n: &GuardedNote| &n.extra, |n: &mut GuardedNote| &mut n.extra)
            .strict()
            .build()
    }
}

// -----------------------------------------------------------------------------
// Flags

#[derive(Debug, Default, PartialEq)]
pub struct Account {
    pub id: i64,
    pub password: String,
    pub session: Option<String>,
    pub visits: u32,
}

impl Mapped for Account {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Account")
            .field(FieldDescriptor::scalar("id", |a: &Account| &a.id, |a: &mut Account| &mut a.id))
            .field(
                FieldDescriptor::scalar(
                    "password",
                    |a: &Account| &a.password,
                    |a: &mut Account| &mut a.password,
                )
                .skip_serializing(),
            )
            .field(
                FieldDescriptor::scalar(
                    "session",
                    |a: &Account| &a.session,
                    |a: &mut Account| &mut a.session,
                )
                .skip_deserializing(),
            )
            .field(
                FieldDescriptor::scalar(
                    "visits",
                    |a: &Account| &a.visits,
                    |a: &mut Account| &mut a.visits,
                )
                .skip_deserializing()
                .default_with(|| 7),
            )
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Patch {
    pub name: Option<String>,
    pub name_present: bool,
}

impl Mapped for Patch {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Patch")
            .field(
                FieldDescriptor::scalar("name", |p: &Patch| &p.name, |p: &mut Patch| &mut p.name)
                    .presence(|p: &mut Patch| &mut p.name_present),
            )
            .build()
    }
}

// -----------------------------------------------------------------------------
// Unions

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

impl Mapped for Circle {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Circle")
            .field(FieldDescriptor::scalar(
                "radius",
                |c: &Circle| &c.radius,
                |c: &mut Circle| &mut c.radius,
            ))
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Square {
    pub side: f64,
}

impl Mapped for Square {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Square")
            .field(FieldDescriptor::scalar(
                "side",
                |s: &Square| &s.side,
                |s: &mut Square| &mut s.side,
            ))
            .build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Square(Square),
}

impl Default for Shape {
    fn default() -> Self {
        Self::Circle(Circle::default())
    }
}

impl MappedUnion for Shape {
    fn alternatives() -> Vec<Alternative> {
        vec![Alternative::of::<Circle>("circle"), Alternative::of::<Square>("square")]
    }

    fn active(&self) -> (&'static str, &dyn Any) {
        match self {
            Shape::Circle(c) => ("circle", c as &dyn Any),
            Shape::Square(s) => ("square", s as &dyn Any),
        }
    }

    fn from_alternative(tag: &str, value: Box<dyn Any>) -> Option<Self> {
        match tag {
            "circle" => value.downcast::<Circle>().ok().map(|c| Shape::Circle(*c)),
            "square" => value.downcast::<Square>().ok().map(|s| Shape::Square(*s)),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Drawing {
    pub shape: Shape,
    pub backup: Option<Shape>,
}

impl Mapped for Drawing {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Drawing")
            .field(
                FieldDescriptor::union(
                    "shape",
                    |d: &Drawing| &d.shape,
                    |d: &mut Drawing| &mut d.shape,
                )
                .discriminator("kind"),
            )
            .field(
                FieldDescriptor::optional_union(
                    "backup",
                    |d: &Drawing| &d.backup,
                    |d: &mut Drawing| &mut d.backup,
                )
                .discriminator("kind"),
            )
            .build()
    }
}

/// The same union as [`Drawing`] but without a discriminator.
#[derive(Debug, Default, PartialEq)]
pub struct Sketch {
    pub shape: Shape,
}

impl Mapped for Sketch {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Sketch")
            .field(FieldDescriptor::union(
                "shape",
                |s: &Sketch| &s.shape,
                |s: &mut Sketch| &mut s.shape,
            ))
            .build()
    }
}

#[derive(Debug, PartialEq)]
pub enum OnlyCircle {
    Circle(Circle),
}

impl Default for OnlyCircle {
    fn default() -> Self {
        Self::Circle(Circle::default())
    }
}

impl MappedUnion for OnlyCircle {
    fn alternatives() -> Vec<Alternative> {
        vec![Alternative::of::<Circle>("circle")]
    }

    fn active(&self) -> (&'static str, &dyn Any) {
        match self {
            OnlyCircle::Circle(c) => ("circle", c as &dyn Any),
        }
    }

    fn from_alternative(tag: &str, value: Box<dyn Any>) -> Option<Self> {
        match tag {
            "circle" => value.downcast::<Circle>().ok().map(|c| OnlyCircle::Circle(*c)),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Badge {
    pub shape: OnlyCircle,
}

impl Mapped for Badge {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Badge")
            .field(FieldDescriptor::union(
                "shape",
                |b: &Badge| &b.shape,
                |b: &mut Badge| &mut b.shape,
            ))
            .build()
    }
}

// -----------------------------------------------------------------------------
// Recursion

#[derive(Debug, Default, PartialEq)]
pub struct Node {
    pub value: i64,
    pub next: Option<Box<Node>>,
}

impl Mapped for Node {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Node")
            .field(FieldDescriptor::scalar(
                "value",
                |n: &Node| &n.value,
                |n: &mut Node| &mut n.value,
            ))
            .field(FieldDescriptor::optional_boxed(
                "next",
                |n: &Node| &n.next,
                |n: &mut Node| &mut n.next,
            ))
            .build()
    }
}

/// A list of `len` nodes valued `0..len`.
pub fn chain(len: i64) -> Node {
    let mut node = Node {
        value: len - 1,
        next: None,
    };
    for value in (0..len - 1).rev() {
        node = Node {
            value,
            next: Some(Box::new(node)),
        };
    }
    node
}
