use crate::SchemaError;
use crate::registry::TypeRegistry;

/// A registration function submitted through [`auto_register!`](crate::auto_register).
#[doc(hidden)]
pub struct AutoRegistration(pub fn(&mut TypeRegistry) -> Result<(), SchemaError>);

inventory::collect!(AutoRegistration);

pub(super) fn register_submitted(registry: &mut TypeRegistry) -> Result<(), SchemaError> {
    for AutoRegistration(register) in inventory::iter::<AutoRegistration> {
        register(registry)?;
    }
    Ok(())
}

/// Submits types for [`TypeRegistry::auto_register`].
///
/// Each type must implement [`Mapped`](crate::Mapped). Types reachable
/// from its fields are registered along with it.
///
/// # Examples
///
/// ```ignore
/// docmap_reflect::auto_register!(House, Location, Note);
/// ```
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::__macro_exports::inventory::submit! {
                $crate::registry::AutoRegistration(
                    <$crate::registry::TypeRegistry>::register::<$ty>
                )
            }
        )+
    };
}
