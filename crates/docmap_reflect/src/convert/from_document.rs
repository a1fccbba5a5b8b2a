use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;

use docmap_value::{Document, Value};
use fixedbitset::FixedBitSet;

use crate::ConvertError;
use crate::convert::converter::access_error;
use crate::convert::{Converter, overlay};
use crate::info::{Alternative, FieldDescriptor, FieldInput, FieldKind, TypeDescriptor, UnionInfo};

impl Converter<'_> {
    /// Builds an instance of `info` from `doc`.
    ///
    /// `discriminator` is the key that selected this type as a union
    /// alternative; it counts as claimed.
    pub(super) fn read_struct(
        &self,
        info: &TypeDescriptor,
        doc: &Document,
        discriminator: Option<&str>,
        depth: usize,
    ) -> Result<Box<dyn Any>, ConvertError> {
        self.check_depth(info, depth)?;

        let mut instance = info.construct();
        let mut claimed = FixedBitSet::with_capacity(doc.len());
        if let Some(index) = discriminator.and_then(|key| doc.index_of(key)) {
            claimed.insert(index);
        }

        for field in info.fields() {
            #[cfg(all(debug_assertions, feature = "debug"))]
            log::trace!("Reading `{}.{}`", info.name(), field.key());

            let entry = if field.skip_deserializing() {
                None
            } else {
                doc.index_of(field.key())
                    .and_then(|index| Some((index, doc.get_index(index)?.1)))
            };

            match entry {
                None => self.read_absent(info, field, &mut *instance)?,
                Some((index, value)) => {
                    claimed.insert(index);
                    field
                        .access()
                        .mark_present(&mut *instance)
                        .map_err(|err| access_error(info, field, err))?;
                    self.read_present(info, field, &mut *instance, value, depth)?;
                }
            }
        }

        overlay::collect_unclaimed(info, doc, &claimed, &mut *instance)?;
        Ok(instance)
    }

    fn read_absent(
        &self,
        info: &TypeDescriptor,
        field: &FieldDescriptor,
        instance: &mut dyn Any,
    ) -> Result<(), ConvertError> {
        let access = field.access();
        let map_err = |err| access_error(info, field, err);

        if access.write_default(instance).map_err(map_err)? {
            log::trace!("Default applied to `{}.{}`", info.name(), field.key());
            return Ok(());
        }
        if field.kind().is_nullable() {
            return access.write(instance, FieldInput::Null).map_err(map_err);
        }
        Err(ConvertError::MissingField {
            type_name: info.name(),
            key: String::from(field.key()),
        })
    }

    fn read_present(
        &self,
        info: &TypeDescriptor,
        field: &FieldDescriptor,
        instance: &mut dyn Any,
        value: &Value,
        depth: usize,
    ) -> Result<(), ConvertError> {
        let mismatch = |expected: &'static str| ConvertError::TypeMismatch {
            type_name: info.name(),
            key: String::from(field.key()),
            expected,
            actual: value.kind(),
        };

        let input = match (field.kind(), value) {
            (kind, Value::Null) if kind.is_nullable() => FieldInput::Null,
            (kind, Value::Null) => return Err(mismatch(kind.expected())),
            (FieldKind::Scalar { .. }, value) => FieldInput::Value(value),
            (
                FieldKind::Structured(target) | FieldKind::OptionalStructured(target),
                Value::Document(nested),
            ) => {
                let nested_info = self.registry.lookup_ref(target)?;
                FieldInput::Structured(self.read_struct(nested_info, nested, None, depth + 1)?)
            }
            (FieldKind::Union(union), Value::Document(nested)) => {
                let alt = resolve_alternative(info, field, union, nested)?;
                let nested_info = self.registry.lookup_ref(alt.target())?;
                let value =
                    self.read_struct(nested_info, nested, union.discriminator(), depth + 1)?;
                FieldInput::Alternative {
                    tag: alt.tag(),
                    value,
                }
            }
            (kind, _) => return Err(mismatch(kind.expected())),
        };

        field
            .access()
            .write(instance, input)
            .map_err(|err| access_error(info, field, err))
    }
}

/// Picks the alternative a nested document holds.
fn resolve_alternative<'u>(
    info: &TypeDescriptor,
    field: &FieldDescriptor,
    union: &'u UnionInfo,
    nested: &Document,
) -> Result<&'u Alternative, ConvertError> {
    let Some(key) = union.discriminator() else {
        // Registration only lets single-alternative unions through here.
        return union.alternatives().first().ok_or(ConvertError::InstanceMismatch {
            type_name: info.name(),
        });
    };

    match nested.get(key) {
        Some(Value::String(tag)) => {
            union
                .alternative(tag)
                .ok_or_else(|| ConvertError::UnknownVariant {
                    type_name: info.name(),
                    key: String::from(field.key()),
                    tag: tag.clone(),
                })
        }
        other => Err(ConvertError::TypeMismatch {
            type_name: info.name(),
            key: alloc::format!("{}.{key}", field.key()),
            expected: "string",
            actual: other.unwrap_or(&Value::Null).kind(),
        }),
    }
}
