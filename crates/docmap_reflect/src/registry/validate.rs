use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;

use docmap_utils::hash::HashSet;

use crate::SchemaError;
use crate::info::{FieldDescriptor, FieldKind, TypeDescriptor};

// -----------------------------------------------------------------------------
// Single descriptor

/// Checks a descriptor on its own: unique keys and well formed unions.
pub(super) fn check_descriptor(info: &TypeDescriptor) -> Result<(), SchemaError> {
    let mut keys: HashSet<&str> =
        HashSet::with_capacity_and_hasher(info.fields().len(), Default::default());

    for field in info.fields() {
        if !keys.insert(field.key()) {
            return Err(SchemaError::DuplicateKey {
                type_name: info.name(),
                key: String::from(field.key()),
            });
        }
        if let FieldKind::Union(union) = field.kind() {
            check_union(info, field, union.alternatives().len(), union.discriminator())?;
            let mut tags: HashSet<&str> = HashSet::default();
            if !union.alternatives().iter().all(|alt| tags.insert(alt.tag())) {
                return Err(SchemaError::InvalidUnion {
                    type_name: info.name(),
                    field: field.name(),
                    reason: "two alternatives share a tag",
                });
            }
        }
    }
    Ok(())
}

fn check_union(
    info: &TypeDescriptor,
    field: &FieldDescriptor,
    alternatives: usize,
    discriminator: Option<&str>,
) -> Result<(), SchemaError> {
    match (alternatives, discriminator) {
        (0, _) => Err(SchemaError::InvalidUnion {
            type_name: info.name(),
            field: field.name(),
            reason: "no alternatives",
        }),
        (1, _) | (_, Some(_)) => Ok(()),
        (_, None) => Err(SchemaError::AmbiguousUnion {
            type_name: info.name(),
            field: field.name(),
        }),
    }
}

// -----------------------------------------------------------------------------
// Across descriptors

/// Checks that no discriminator key collides with a field key of the
/// alternative it selects.
pub(super) fn check_discriminators<'a>(
    info: &TypeDescriptor,
    lookup: impl Fn(TypeId) -> Option<&'a TypeDescriptor>,
) -> Result<(), SchemaError> {
    for field in info.fields() {
        let FieldKind::Union(union) = field.kind() else {
            continue;
        };
        let Some(key) = union.discriminator() else {
            continue;
        };
        for alt in union.alternatives() {
            if let Some(target) = lookup(alt.target().type_id())
                && target.field(key).is_some()
            {
                return Err(SchemaError::DuplicateKey {
                    type_name: target.name(),
                    key: String::from(key),
                });
            }
        }
    }
    Ok(())
}

/// Whether a union field of `info` has an alternative `pred` accepts.
pub(super) fn holds_alternative(info: &TypeDescriptor, pred: impl Fn(TypeId) -> bool) -> bool {
    info.fields().iter().any(|field| match field.kind() {
        FieldKind::Union(union) => union
            .alternatives()
            .iter()
            .any(|alt| pred(alt.target().type_id())),
        _ => false,
    })
}

/// Searches the required field graph reachable from `roots` for a cycle.
///
/// Returns the type names along the first cycle found, the first name
/// repeated at the end. Edges to types `lookup` does not know are ignored.
pub(super) fn find_required_cycle<'a>(
    roots: &[TypeId],
    lookup: impl Fn(TypeId) -> Option<&'a TypeDescriptor>,
) -> Option<Vec<&'static str>> {
    let mut search = CycleSearch {
        lookup,
        done: HashSet::default(),
        path: Vec::new(),
    };
    roots.iter().find_map(|&root| search.visit(root))
}

struct CycleSearch<'a, L: Fn(TypeId) -> Option<&'a TypeDescriptor>> {
    lookup: L,
    done: HashSet<TypeId>,
    path: Vec<(TypeId, &'static str)>,
}

impl<'a, L: Fn(TypeId) -> Option<&'a TypeDescriptor>> CycleSearch<'a, L> {
    fn visit(&mut self, type_id: TypeId) -> Option<Vec<&'static str>> {
        if self.done.contains(&type_id) {
            return None;
        }
        if let Some(start) = self.path.iter().position(|(id, _)| *id == type_id) {
            let mut cycle: Vec<&'static str> =
                self.path[start..].iter().map(|(_, name)| *name).collect();
            cycle.push(self.path[start].1);
            return Some(cycle);
        }
        let info = (self.lookup)(type_id)?;

        let mut targets = Vec::new();
        for field in info.fields() {
            field.kind().for_each_target(true, |target| targets.push(target.type_id()));
        }

        self.path.push((type_id, info.name()));
        if let Some(cycle) = targets.into_iter().find_map(|target| self.visit(target)) {
            return Some(cycle);
        }
        self.path.pop();
        self.done.insert(type_id);
        None
    }
}
