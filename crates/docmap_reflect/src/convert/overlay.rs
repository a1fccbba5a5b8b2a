use alloc::string::String;
use core::any::Any;

use docmap_value::Document;
use fixedbitset::FixedBitSet;

use crate::ConvertError;
use crate::info::TypeDescriptor;

/// Handles the entries of `doc` no field claimed, in input order.
///
/// A strict type fails on the first one, before anything is captured.
pub(super) fn collect_unclaimed(
    info: &TypeDescriptor,
    doc: &Document,
    claimed: &FixedBitSet,
    instance: &mut dyn Any,
) -> Result<(), ConvertError> {
    let mut unclaimed = doc
        .iter()
        .enumerate()
        .filter(|(index, _)| !claimed.contains(*index))
        .map(|(_, entry)| entry)
        .peekable();

    if info.is_strict()
        && let Some((key, _)) = unclaimed.peek()
    {
        return Err(ConvertError::UnknownField {
            type_name: info.name(),
            key: String::from(*key),
        });
    }

    match info.unmapped() {
        Some(access) => {
            let bucket = access
                .bucket_mut(instance)
                .map_err(|_| ConvertError::InstanceMismatch {
                    type_name: info.name(),
                })?;
            for (key, value) in unclaimed {
                bucket.insert(key, value.clone());
            }
        }
        None => {
            for (key, _) in unclaimed {
                log::trace!("Discarded unknown key `{key}` for `{}`", info.name());
            }
        }
    }
    Ok(())
}

/// Appends the unmapped bucket of `instance` to `doc`, keeping keys the
/// fields already produced.
pub(super) fn merge_unmapped(
    info: &TypeDescriptor,
    instance: &dyn Any,
    doc: &mut Document,
) -> Result<(), ConvertError> {
    let Some(access) = info.unmapped() else {
        return Ok(());
    };
    let bucket = access
        .bucket(instance)
        .map_err(|_| ConvertError::InstanceMismatch {
            type_name: info.name(),
        })?;

    for (key, value) in bucket {
        if doc.contains_key(key) {
            log::trace!("Unmapped key `{key}` shadowed by a field of `{}`", info.name());
            continue;
        }
        doc.insert(key, value.clone());
    }
    Ok(())
}
