use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::ops::Deref;

use docmap_utils::TypeIdMap;
use docmap_utils::hash::{FixedHashState, HashMap, HashSet};
use docmap_value::Document;

use crate::convert::Converter;
use crate::info::{StructRef, TypeDescriptor};
use crate::registry::validate;
use crate::{ConvertError, Mapped, SchemaError};

// -----------------------------------------------------------------------------
// TypeRegistry

/// The store of [`TypeDescriptor`]s the conversion engine reads from.
///
/// Types are registered up front, together with every struct their fields
/// reference. Each registration is validated as a whole and either fully
/// applied or not at all. Once built the registry is only read, so a
/// shared reference can be used from any number of threads.
///
/// # Example
///
/// ```
/// use core::any::TypeId;
/// use docmap_reflect::info::{FieldDescriptor, TypeDescriptor};
/// use docmap_reflect::{Mapped, TypeRegistry};
///
/// #[derive(Default)]
/// struct Location {
///     address: String,
/// }
///
/// #[derive(Default)]
/// struct House {
///     location: Option<Location>,
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
///             .build()
///     }
/// }
///
/// impl Mapped for House {
///     fn type_descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>("House")
///             .field(FieldDescriptor::optional(
///                 "location",
///                 |h: &House| &h.location,
///                 |h: &mut House| &mut h.location,
///             ))
///             .build()
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<House>().unwrap();
///
/// // The nested type is registered too.
/// assert!(registry.contains(TypeId::of::<Location>()));
/// assert_eq!(registry.get_with_type_name("Location").unwrap().fields().len(), 1);
/// ```
pub struct TypeRegistry {
    descriptors: TypeIdMap<TypeDescriptor>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty [`TypeRegistry`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            descriptors: TypeIdMap::new(),
            type_name_to_id: HashMap::with_hasher(FixedHashState),
            ambiguous_names: HashSet::with_hasher(FixedHashState),
        }
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(
        info: &TypeDescriptor,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let type_name = info.name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, info.type_id());
            }
        }
    }

    fn commit(&mut self, staging: Staging) {
        let Staging { mut pending, order } = staging;
        for type_id in order {
            let Some(info) = pending.remove(&type_id) else {
                continue;
            };
            log::debug!(
                "Registered `{}` ({}) with {} fields",
                info.name(),
                info.type_path(),
                info.fields().len()
            );
            Self::add_new_type_indices(&info, &mut self.type_name_to_id, &mut self.ambiguous_names);
            self.descriptors.insert(type_id, info);
        }
    }

    fn validate(&self, staging: &Staging) -> Result<(), SchemaError> {
        let lookup = |type_id: TypeId| staging.pending.get(&type_id).or_else(|| self.get(type_id));

        for type_id in &staging.order {
            if let Some(info) = staging.pending.get(type_id) {
                validate::check_discriminators(info, lookup)?;
            }
        }
        // Holders registered earlier, whose alternatives arrive now.
        let is_staged = |type_id: TypeId| staging.pending.contains(&type_id);
        for info in self.iter() {
            if validate::holds_alternative(info, is_staged) {
                validate::check_discriminators(info, lookup)?;
            }
        }

        match validate::find_required_cycle(&staging.order, lookup) {
            Some(cycle) => Err(SchemaError::SchemaCycle { cycle }),
            None => Ok(()),
        }
    }

    /// Registers `T` and every struct its fields reference, if not present yet.
    ///
    /// The new descriptors are validated together with the ones already
    /// stored. On error nothing is added.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::DuplicateKey`]: two fields share a document key, or a
    ///   discriminator key is also a field key of an alternative.
    /// - [`SchemaError::AmbiguousUnion`] / [`SchemaError::InvalidUnion`]: a
    ///   union field cannot tell its alternatives apart.
    /// - [`SchemaError::SchemaCycle`]: required nested fields lead back to a
    ///   type on the path. Optional fields break such cycles.
    pub fn register<T: Mapped>(&mut self) -> Result<(), SchemaError> {
        if self.contains(TypeId::of::<T>()) {
            return Ok(());
        }
        let mut staging = Staging::default();
        staging.collect(self, StructRef::of::<T>())?;
        self.validate(&staging)?;
        self.commit(staging);
        Ok(())
    }

    /// Registers a hand-built descriptor.
    ///
    /// Unlike [`register`](Self::register), referenced structs are not
    /// registered; they must be registered before converting.
    /// Does nothing if the type is already present.
    pub fn register_descriptor(&mut self, info: TypeDescriptor) -> Result<(), SchemaError> {
        if self.contains(info.type_id()) {
            return Ok(());
        }
        validate::check_descriptor(&info)?;
        let mut staging = Staging::default();
        staging.push(info);
        self.validate(&staging)?;
        self.commit(staging);
        Ok(())
    }

    /// Registers every type submitted through [`auto_register!`](crate::auto_register).
    ///
    /// Repeated calls are cheap; already present types are skipped.
    ///
    /// ## Return Value
    ///
    /// Returns `Ok(true)` once every submission was registered, `Ok(false)`
    /// when the `auto_register` feature is disabled.
    ///
    /// ## Platform Support
    ///
    /// Static registration is provided by the `inventory` crate, which
    /// covers Linux, macOS, Windows, iOS, Android and Web.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use core::any::TypeId;
    /// use docmap_reflect::info::TypeDescriptor;
    /// use docmap_reflect::{Mapped, TypeRegistry, auto_register};
    ///
    /// #[derive(Default)]
    /// struct Marker;
    ///
    /// impl Mapped for Marker {
    ///     fn type_descriptor() -> TypeDescriptor {
    ///         TypeDescriptor::builder::<Self>("Marker").build()
    ///     }
    /// }
    ///
    /// auto_register!(Marker);
    ///
    /// let mut registry = TypeRegistry::new();
    /// assert_eq!(registry.auto_register(), Ok(true));
    /// assert!(registry.contains(TypeId::of::<Marker>()));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> Result<bool, SchemaError> {
        #[cfg(feature = "auto_register")]
        {
            crate::registry::auto_register::register_submitted(self)?;
            Ok(true)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            Ok(false)
        }
    }

    /// Whether the type with given [`TypeId`] has been registered in this registry.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.descriptors.contains(&type_id)
    }

    /// Returns the descriptor of the type with the given [`TypeId`].
    ///
    /// If the specified type has not been registered, returns `None`.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeDescriptor> {
        self.descriptors.get(&type_id)
    }

    /// Returns the descriptor of the type with the given [`TypeId`], or
    /// [`SchemaError::UnregisteredType`].
    pub fn lookup(&self, type_id: TypeId) -> Result<&TypeDescriptor, SchemaError> {
        self.get(type_id).ok_or(SchemaError::UnregisteredType {
            type_id,
            type_path: "<unknown>",
        })
    }

    /// Returns the descriptor of `T`, or [`SchemaError::UnregisteredType`].
    pub fn lookup_type<T: 'static>(&self) -> Result<&TypeDescriptor, SchemaError> {
        self.lookup_ref_parts(TypeId::of::<T>(), core::any::type_name::<T>())
    }

    /// Returns the descriptor a [`StructRef`] points to.
    pub fn lookup_ref(&self, target: &StructRef) -> Result<&TypeDescriptor, SchemaError> {
        self.lookup_ref_parts(target.type_id(), target.type_path())
    }

    fn lookup_ref_parts(
        &self,
        type_id: TypeId,
        type_path: &'static str,
    ) -> Result<&TypeDescriptor, SchemaError> {
        self.get(type_id)
            .ok_or(SchemaError::UnregisteredType { type_id, type_path })
    }

    /// Returns the descriptor registered under the short `type_name`.
    ///
    /// If the type name is ambiguous, or if no type with the given name
    /// has been registered, returns `None`.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeDescriptor> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if the given type name matches multiple registered types.
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Returns an iterator over the registered descriptors.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeDescriptor> {
        self.descriptors.values()
    }

    /// Builds a `T` from `doc` with default [`ConvertOptions`](crate::ConvertOptions).
    ///
    /// See [`Converter::from_document`].
    #[inline]
    pub fn from_document<T: Mapped>(&self, doc: &Document) -> Result<T, ConvertError> {
        Converter::new(self).from_document(doc)
    }

    /// Builds the document of `value` with default [`ConvertOptions`](crate::ConvertOptions).
    ///
    /// See [`Converter::to_document`].
    #[inline]
    pub fn to_document<T: Mapped>(&self, value: &T) -> Result<Document, ConvertError> {
        Converter::new(self).to_document(value)
    }
}

// -----------------------------------------------------------------------------
// Staging

// Descriptors collected by one registration call, not yet visible.
#[derive(Default)]
struct Staging {
    pending: TypeIdMap<TypeDescriptor>,
    order: Vec<TypeId>,
}

impl Staging {
    fn push(&mut self, info: TypeDescriptor) {
        self.order.push(info.type_id());
        self.pending.insert(info.type_id(), info);
    }

    fn collect(&mut self, registry: &TypeRegistry, root: StructRef) -> Result<(), SchemaError> {
        let mut work = alloc::vec![root];

        while let Some(target) = work.pop() {
            let type_id = target.type_id();
            if registry.contains(type_id) || self.pending.contains(&type_id) {
                continue;
            }

            let info = target.descriptor();
            if info.type_id() != type_id {
                return Err(SchemaError::MismatchedDescriptor {
                    expected: target.type_path(),
                    found: info.type_path(),
                });
            }
            validate::check_descriptor(&info)?;

            for field in info.fields() {
                field.kind().for_each_target(false, |nested| work.push(*nested));
            }
            self.push(info);
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A cheaply clonable handle to a finished [`TypeRegistry`].
///
/// # Examples
///
/// ```
/// use docmap_reflect::TypeRegistry;
/// use docmap_reflect::registry::TypeRegistryArc;
///
/// let shared = TypeRegistryArc::from(TypeRegistry::new());
/// let other = shared.clone();
/// std::thread::spawn(move || assert!(other.is_empty())).join().unwrap();
/// assert_eq!(shared.len(), 0);
/// ```
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<TypeRegistry>,
}

impl From<TypeRegistry> for TypeRegistryArc {
    #[inline]
    fn from(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(registry),
        }
    }
}

impl Deref for TypeRegistryArc {
    type Target = TypeRegistry;

    #[inline]
    fn deref(&self) -> &TypeRegistry {
        &self.internal
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::info::{FieldDescriptor, TypeDescriptor};
    use crate::{Mapped, SchemaError};

    #[derive(Default)]
    struct Twice {
        a: i32,
        b: i32,
    }

    impl Mapped for Twice {
        fn type_descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>("Twice")
                .field(
                    FieldDescriptor::scalar("a", |t: &Twice| &t.a, |t: &mut Twice| &mut t.a)
                        .key("x"),
                )
                .field(
                    FieldDescriptor::scalar("b", |t: &Twice| &t.b, |t: &mut Twice| &mut t.b)
                        .key("x"),
                )
                .build()
        }
    }

    #[derive(Default)]
    struct Ping {
        pong: Box<Pong>,
    }

    #[derive(Default)]
    struct Pong {
        ping: Option<Box<Ping>>,
        name: String,
    }

    impl Mapped for Ping {
        fn type_descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>("Ping")
                .field(FieldDescriptor::nested_boxed(
                    "pong",
                    |p: &Ping| &p.pong,
                    |p: &mut Ping| &mut p.pong,
                ))
                .build()
        }
    }

    impl Mapped for Pong {
        fn type_descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>("Pong")
                .field(FieldDescriptor::optional_boxed(
                    "ping",
                    |p: &Pong| &p.ping,
                    |p: &mut Pong| &mut p.ping,
                ))
                .field(FieldDescriptor::scalar(
                    "name",
                    |p: &Pong| &p.name,
                    |p: &mut Pong| &mut p.name,
                ))
                .build()
        }
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut registry = TypeRegistry::new();
        assert_eq!(
            registry.register::<Twice>(),
            Err(SchemaError::DuplicateKey {
                type_name: "Twice",
                key: String::from("x"),
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn optional_back_edge_is_fine() {
        let mut registry = TypeRegistry::new();
        registry.register::<Ping>().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(TypeId::of::<Pong>()));
        assert!(registry.lookup_type::<Pong>().is_ok());

        // Second registration is a no-op.
        registry.register::<Pong>().unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn lookup_reports_unregistered() {
        let registry = TypeRegistry::new();
        match registry.lookup_type::<Ping>() {
            Err(SchemaError::UnregisteredType { type_path, .. }) => {
                assert!(type_path.ends_with("Ping"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(registry.lookup(TypeId::of::<Pong>()).is_err());
    }

    #[test]
    fn ambiguous_names() {
        mod first {
            use crate::Mapped;
            use crate::info::TypeDescriptor;

            #[derive(Default)]
            pub struct Same;

            impl Mapped for Same {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::builder::<Self>("Same").build()
                }
            }
        }

        mod second {
            use crate::Mapped;
            use crate::info::TypeDescriptor;

            #[derive(Default)]
            pub struct Same;

            impl Mapped for Same {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::builder::<Self>("Same").build()
                }
            }
        }

        let mut registry = TypeRegistry::new();
        registry.register::<first::Same>().unwrap();
        assert!(registry.get_with_type_name("Same").is_some());

        registry.register::<second::Same>().unwrap();
        assert!(registry.is_ambiguous("Same"));
        assert!(registry.get_with_type_name("Same").is_none());
        assert_eq!(registry.iter().count(), 2);
    }

    #[test]
    fn hand_built_descriptor() {
        let mut registry = TypeRegistry::new();
        registry.register_descriptor(Ping::type_descriptor()).unwrap();
        assert!(registry.contains(TypeId::of::<Ping>()));
        assert!(!registry.contains(TypeId::of::<Pong>()));
        assert_eq!(registry.len(), 1);
    }
}
