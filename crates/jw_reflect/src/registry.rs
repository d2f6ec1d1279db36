//! Process-wide memoization of record field lists.
//!
//! Field discovery is cheap but not free; the contract is that it happens
//! once per type. [`FieldRegistry`] is the append-only store, keyed by
//! [`TypeId`], and [`FieldRegistryArc`] wraps it for concurrent use. The
//! JSON writer consults [`global`] by default.

use core::any::TypeId;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use std::sync::{Arc, LazyLock, PoisonError};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{FieldInfo, Fielded, Record};

// -----------------------------------------------------------------------------
// FieldRegistry

/// A registry of record field lists, keyed by concrete type.
///
/// The registry is append-only: entries are inserted on first discovery and
/// never evicted. Field lists are `'static` slices, so lookups hand them
/// out by value and nothing borrows the registry afterwards.
///
/// # Example
///
/// ```
/// use jw_reflect::{impl_record, registry::FieldRegistry};
/// use core::any::TypeId;
///
/// #[derive(Clone)]
/// struct Tag {
///     name: String,
/// }
/// impl_record!(Tag { name });
///
/// let mut registry = FieldRegistry::new();
/// registry.register::<Tag>();
///
/// let fields = registry.get(TypeId::of::<Tag>()).unwrap();
/// assert_eq!(fields[0].name(), "name");
/// ```
#[derive(Default)]
pub struct FieldRegistry {
    field_table: HashMap<TypeId, &'static [FieldInfo]>,
}

impl FieldRegistry {
    /// Creates an empty `FieldRegistry`.
    pub fn new() -> Self {
        Self {
            field_table: HashMap::new(),
        }
    }

    /// Attempts to insert a field list for `type_id`.
    ///
    /// - Returns `true` if the type was not present and the list was inserted.
    /// - Returns `false` if the type already exists, leaving the registry unchanged.
    ///
    /// The closure `f` is only called if the type is not present.
    pub fn try_insert(
        &mut self,
        type_id: TypeId,
        f: impl FnOnce() -> &'static [FieldInfo],
    ) -> bool {
        match self.field_table.entry(type_id) {
            Entry::Vacant(entry) => {
                entry.insert(f());
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Registers the statically declared field list of `T`.
    ///
    /// Registering the same type twice is a no-op.
    pub fn register<T: Fielded + 'static>(&mut self) {
        self.try_insert(TypeId::of::<T>(), T::field_list);
    }

    /// Returns the field list recorded for `type_id`, if present.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static [FieldInfo]> {
        self.field_table.get(&type_id).copied()
    }

    /// Whether a field list has been recorded for `type_id`.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.field_table.contains_key(&type_id)
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.field_table.len()
    }

    /// Returns `true` if no type has been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.field_table.is_empty()
    }

    /// Returns an iterator over the registered types and their field lists.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &'static [FieldInfo])> + '_ {
        self.field_table.iter().map(|(id, fields)| (*id, *fields))
    }

    /// Inserts every record submitted via
    /// [`auto_register_record!`](crate::auto_register_record).
    ///
    /// Repeated calls are cheap and never insert duplicates.
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&mut self) {
        for registration in inventory::iter::<RecordRegistration> {
            self.try_insert((registration.type_id)(), registration.fields);
        }
    }
}

// -----------------------------------------------------------------------------
// FieldRegistryArc

/// A shared, lock-guarded [`FieldRegistry`].
///
/// Reads vastly outnumber writes (each type is written once), so a
/// read/write lock fits the append-only access pattern. Lock poisoning is
/// absorbed rather than propagated; the registry holds no invariant a
/// panicked writer could have broken halfway.
#[derive(Clone, Default)]
pub struct FieldRegistryArc {
    /// The wrapped [`FieldRegistry`].
    pub internal: Arc<RwLock<FieldRegistry>>,
}

impl FieldRegistryArc {
    /// Takes a read lock on the underlying [`FieldRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, FieldRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`FieldRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, FieldRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the field list for `record`'s concrete type, discovering and
    /// memoizing it on first use.
    ///
    /// This is the `members_of(type)` contract the JSON writer relies on:
    /// the fast path is a shared-lock hit; the slow path runs once per type.
    pub fn fields_of(&self, record: &dyn Record) -> &'static [FieldInfo] {
        let type_id = record.ty_id();
        if let Some(fields) = self.read().get(type_id) {
            return fields;
        }

        let fields = record.fields();
        self.write().try_insert(type_id, || fields);
        fields
    }
}

/// Returns the process-wide registry used by the JSON writer.
///
/// With the `auto_register` feature enabled, the first access drains every
/// [`auto_register_record!`](crate::auto_register_record) submission.
pub fn global() -> &'static FieldRegistryArc {
    static GLOBAL: LazyLock<FieldRegistryArc> = LazyLock::new(|| {
        let registry = FieldRegistryArc::default();
        #[cfg(feature = "auto_register")]
        registry.write().auto_register();
        registry
    });
    &GLOBAL
}

// -----------------------------------------------------------------------------
// RecordRegistration

/// A startup-time record submission.
///
/// Collected by the `inventory` crate; constructed through
/// [`auto_register_record!`](crate::auto_register_record) rather than by
/// hand.
#[cfg(feature = "auto_register")]
pub struct RecordRegistration {
    type_id: fn() -> TypeId,
    fields: fn() -> &'static [FieldInfo],
}

#[cfg(feature = "auto_register")]
impl RecordRegistration {
    /// Creates the registration for record type `T`.
    pub const fn of<T: Fielded + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            fields: T::field_list,
        }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(RecordRegistration);

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::{FieldRegistry, FieldRegistryArc};
    use crate::{Record, impl_record};

    #[derive(Clone)]
    struct Widget {
        label: String,
        width: u32,
    }

    impl_record!(Widget { label, width });

    fn widget() -> Widget {
        Widget {
            label: "ok".to_owned(),
            width: 10,
        }
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = FieldRegistry::new();
        registry.register::<Widget>();
        registry.register::<Widget>();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(TypeId::of::<Widget>()));
    }

    #[test]
    fn fields_of_memoizes_per_type() {
        let registry = FieldRegistryArc::default();
        assert!(registry.read().is_empty());

        let first = registry.fields_of(&widget());
        let second = registry.fields_of(&widget());

        // Same static slice both times, discovered once.
        assert_eq!(first.as_ptr(), second.as_ptr());
        assert_eq!(registry.read().len(), 1);
    }

    #[test]
    fn lookup_escapes_the_lock() {
        let registry = FieldRegistryArc::default();
        let fields = registry.fields_of(&widget());

        // The guard is long gone; the slice is still usable.
        let record: &dyn Record = &widget();
        assert_eq!(fields[0].read(record).unwrap().as_scalar(), Some("ok"));
    }

    #[cfg(feature = "auto_register")]
    mod auto {
        use core::any::TypeId;

        use super::super::FieldRegistry;
        use crate::{auto_register_record, impl_record};

        #[derive(Clone)]
        struct Probe {
            on: bool,
        }

        impl_record!(Probe { on });
        auto_register_record!(Probe);

        #[test]
        fn auto_register_drains_submissions() {
            let mut registry = FieldRegistry::new();
            registry.auto_register();
            assert!(registry.contains(TypeId::of::<Probe>()));
        }
    }
}
