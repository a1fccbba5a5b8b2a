use core::any::Any;

use docmap_value::{Document, Value};

use crate::ConvertError;
use crate::convert::converter::access_error;
use crate::convert::{Converter, overlay};
use crate::info::{FieldKind, FieldRef, TypeDescriptor};

impl Converter<'_> {
    /// Builds the document of `instance`, described by `info`.
    pub(super) fn write_struct(
        &self,
        info: &TypeDescriptor,
        instance: &dyn Any,
        depth: usize,
    ) -> Result<Document, ConvertError> {
        self.check_depth(info, depth)?;

        let mut doc = Document::with_capacity(info.fields().len());

        for field in info.fields() {
            if field.skip_serializing() {
                continue;
            }

            #[cfg(all(debug_assertions, feature = "debug"))]
            log::trace!("Writing `{}.{}`", info.name(), field.key());

            let content = field
                .access()
                .read(instance)
                .map_err(|err| access_error(info, field, err))?;

            let value = match (content, field.kind()) {
                (FieldRef::Null, _) => Value::Null,
                (FieldRef::Value(value), _) => value,
                (
                    FieldRef::Structured(nested),
                    FieldKind::Structured(target) | FieldKind::OptionalStructured(target),
                ) => {
                    let nested_info = self.registry.lookup_ref(target)?;
                    Value::Document(self.write_struct(nested_info, nested, depth + 1)?)
                }
                (FieldRef::Alternative { tag, value }, FieldKind::Union(union)) => {
                    let Some(alt) = union.alternative(tag) else {
                        return Err(ConvertError::UnknownVariant {
                            type_name: info.name(),
                            key: field.key().into(),
                            tag: tag.into(),
                        });
                    };
                    let nested_info = self.registry.lookup_ref(alt.target())?;
                    let body = self.write_struct(nested_info, value, depth + 1)?;

                    match union.discriminator() {
                        Some(key) => {
                            let mut tagged = Document::with_capacity(body.len() + 1);
                            tagged.insert(key, tag);
                            for (entry, value) in body {
                                if entry == key {
                                    log::trace!(
                                        "Entry `{key}` of `{}` shadowed by the discriminator",
                                        nested_info.name()
                                    );
                                    continue;
                                }
                                tagged.insert(entry, value);
                            }
                            Value::Document(tagged)
                        }
                        None => Value::Document(body),
                    }
                }
                _ => {
                    return Err(ConvertError::InstanceMismatch {
                        type_name: info.name(),
                    });
                }
            };

            doc.insert(field.key(), value);
        }

        overlay::merge_unmapped(info, instance, &mut doc)?;
        Ok(doc)
    }
}
