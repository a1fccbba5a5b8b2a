mod common;

use core::any::{Any, TypeId};

use common::{House, Location, Note, Sketch};
use docmap_reflect::info::{Alternative, FieldDescriptor, TypeDescriptor};
use docmap_reflect::{Mapped, MappedUnion, SchemaError, TypeRegistry};

#[test]
fn register_collects_nested_types() {
    let mut registry = TypeRegistry::new();
    registry.register::<House>().unwrap();

    assert_eq!(registry.len(), 3);
    assert!(registry.contains(TypeId::of::<Location>()));
    assert!(registry.contains(TypeId::of::<Note>()));

    let house = registry.get_with_type_name("House").unwrap();
    assert_eq!(house.fields().len(), 3);
    assert_eq!(house.field("location").unwrap().name(), "location");
    assert_eq!(
        registry.get_with_type_name("Location").unwrap().index_of("lon"),
        Some(1)
    );

    registry.register::<House>().unwrap();
    registry.register::<Note>().unwrap();
    assert_eq!(registry.len(), 3);
}

#[test]
fn ambiguous_union_rejected() {
    let mut registry = TypeRegistry::new();
    assert_eq!(
        registry.register::<Sketch>(),
        Err(SchemaError::AmbiguousUnion {
            type_name: "Sketch",
            field: "shape",
        })
    );
    assert!(registry.is_empty());
}

// -----------------------------------------------------------------------------
// Cycles

#[derive(Default)]
struct Loop {
    next: Box<Loop>,
}

impl Mapped for Loop {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Loop")
            .field(FieldDescriptor::nested_boxed(
                "next",
                |l: &Loop| &l.next,
                |l: &mut Loop| &mut l.next,
            ))
            .build()
    }
}

#[derive(Default)]
struct Parent {
    child: Child,
}

#[derive(Default)]
struct Child {
    parent: Box<Parent>,
}

impl Mapped for Parent {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Parent")
            .field(FieldDescriptor::nested(
                "child",
                |p: &Parent| &p.child,
                |p: &mut Parent| &mut p.child,
            ))
            .build()
    }
}

impl Mapped for Child {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Child")
            .field(FieldDescriptor::nested_boxed(
                "parent",
                |c: &Child| &c.parent,
                |c: &mut Child| &mut c.parent,
            ))
            .build()
    }
}

#[test]
fn self_cycle() {
    let mut registry = TypeRegistry::new();
    let err = registry.register::<Loop>().unwrap_err();
    assert_eq!(
        err,
        SchemaError::SchemaCycle {
            cycle: vec!["Loop", "Loop"],
        }
    );
    assert_eq!(err.to_string(), "Required fields form a cycle: Loop -> Loop");
    assert!(registry.is_empty());
}

#[test]
fn two_type_cycle() {
    let mut registry = TypeRegistry::new();
    match registry.register::<Parent>() {
        Err(SchemaError::SchemaCycle { cycle }) => assert_eq!(cycle, ["Parent", "Child", "Parent"]),
        other => panic!("unexpected {other:?}"),
    }
    assert!(registry.is_empty());

    // Entering from the other side reports the same loop.
    match registry.register::<Child>() {
        Err(SchemaError::SchemaCycle { cycle }) => assert_eq!(cycle, ["Child", "Parent", "Child"]),
        other => panic!("unexpected {other:?}"),
    }
}

// -----------------------------------------------------------------------------
// Discriminator collisions

#[derive(Debug, Default, PartialEq)]
struct Labeled {
    kind: String,
}

impl Mapped for Labeled {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Labeled")
            .field(FieldDescriptor::scalar(
                "kind",
                |l: &Labeled| &l.kind,
                |l: &mut Labeled| &mut l.kind,
            ))
            .build()
    }
}

#[derive(Debug, Default, PartialEq)]
struct Other {
    size: i64,
}

impl Mapped for Other {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Other")
            .field(FieldDescriptor::scalar(
                "size",
                |o: &Other| &o.size,
                |o: &mut Other| &mut o.size,
            ))
            .build()
    }
}

#[derive(Debug, PartialEq)]
enum Entry {
    Labeled(Labeled),
    Other(Other),
}

impl Default for Entry {
    fn default() -> Self {
        Self::Other(Other::default())
    }
}

impl MappedUnion for Entry {
    fn alternatives() -> Vec<Alternative> {
        vec![Alternative::of::<Labeled>("labeled"), Alternative::of::<Other>("other")]
    }

    fn active(&self) -> (&'static str, &dyn Any) {
        match self {
            Entry::Labeled(l) => ("labeled", l as &dyn Any),
            Entry::Other(o) => ("other", o as &dyn Any),
        }
    }

    fn from_alternative(tag: &str, value: Box<dyn Any>) -> Option<Self> {
        match tag {
            "labeled" => value.downcast::<Labeled>().ok().map(|l| Entry::Labeled(*l)),
            "other" => value.downcast::<Other>().ok().map(|o| Entry::Other(*o)),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct Ledger {
    entry: Entry,
}

impl Mapped for Ledger {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Ledger")
            .field(
                FieldDescriptor::union(
                    "entry",
                    |l: &Ledger| &l.entry,
                    |l: &mut Ledger| &mut l.entry,
                )
                .discriminator("kind"),
            )
            .build()
    }
}

#[test]
fn discriminator_collides_with_field() {
    let mut registry = TypeRegistry::new();
    assert_eq!(
        registry.register::<Ledger>(),
        Err(SchemaError::DuplicateKey {
            type_name: "Labeled",
            key: String::from("kind"),
        })
    );
    assert!(registry.is_empty());

    // The alternatives alone are fine.
    registry.register::<Labeled>().unwrap();
    registry.register::<Other>().unwrap();
    assert_eq!(registry.len(), 2);

    // Already registered alternatives are still checked.
    assert!(matches!(
        registry.register::<Ledger>(),
        Err(SchemaError::DuplicateKey { .. })
    ));
    assert_eq!(registry.len(), 2);
}

#[test]
fn discriminator_collision_with_later_alternative() {
    let mut registry = TypeRegistry::new();
    registry.register_descriptor(Ledger::type_descriptor()).unwrap();
    assert_eq!(registry.len(), 1);

    assert_eq!(
        registry.register::<Labeled>(),
        Err(SchemaError::DuplicateKey {
            type_name: "Labeled",
            key: String::from("kind"),
        })
    );
    assert!(!registry.contains(TypeId::of::<Labeled>()));

    // Alternatives that do not collide still register.
    registry.register::<Other>().unwrap();
    assert_eq!(registry.len(), 2);
}

#[test]
fn hand_built_descriptor_with_missing_nested_type() {
    let mut registry = TypeRegistry::new();
    registry.register_descriptor(Location::type_descriptor()).unwrap();
    assert_eq!(registry.len(), 1);
    assert!(!registry.contains(TypeId::of::<Note>()));

    // The registry stays usable; the nested type can be added later.
    registry.register::<Note>().unwrap();
    assert_eq!(registry.len(), 2);
}
