use core::any::{Any, TypeId};

use crate::FieldInfo;

// -----------------------------------------------------------------------------
// Fielded

/// A type with a statically declared, ordered field list.
///
/// The list is computed at compile time and handed out as a `'static`
/// slice; the [registry](crate::registry) memoizes it per [`TypeId`] so the
/// declaration is consulted once per type for the life of the process.
pub trait Fielded {
    /// Returns the fields in **declaration order**.
    fn field_list() -> &'static [FieldInfo];
}

// -----------------------------------------------------------------------------
// Record

/// A structured object that can be serialized field by field.
///
/// This is the shape of last resort: values that are not null, scalar,
/// blob, sequence, or map participate in serialization through this trait.
/// Prefer [`impl_record!`](crate::impl_record) over implementing it by
/// hand; manual impls are only needed for conditionally readable fields.
pub trait Record: Any + Send + Sync {
    /// Returns the short name of the concrete type.
    fn type_name(&self) -> &'static str;

    /// Returns this record's fields in declaration order.
    fn fields(&self) -> &'static [FieldInfo];

    /// Clones the record behind the trait object.
    ///
    /// Lets [`Value`](crate::Value) stay [`Clone`] even though it owns its
    /// records as trait objects.
    fn clone_record(&self) -> Box<dyn Record>;

    /// The textual stand-in used when no readable field survives filtering.
    ///
    /// Defaults to the type name, which keeps an all-private or fully
    /// filtered record representable as a plain string.
    fn fallback_text(&self) -> String {
        self.type_name().to_owned()
    }

    /// Return the [`TypeId`] of the underlying type.
    ///
    /// `Any::type_id` on the trait object would report the container; this
    /// reports the concrete record type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

impl dyn Record {
    /// Returns `true` if the underlying record is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the record to type `T` by reference.
    ///
    /// If the underlying record is not of type `T`, returns `None`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }
}

impl Clone for Box<dyn Record> {
    fn clone(&self) -> Self {
        self.clone_record()
    }
}

// -----------------------------------------------------------------------------
// impl_record!

/// Implements [`Fielded`], [`Record`], and [`ToValue`] for a named-field
/// struct.
///
/// Every listed field must itself implement [`ToValue`], and the struct must
/// be [`Clone`] (the record variant of [`Value`] owns its object). Fields
/// are emitted in the listed order.
///
/// # Examples
///
/// ```
/// use jw_reflect::{impl_record, ToValue, Value, ValueKind};
///
/// #[derive(Clone)]
/// struct Session {
///     id: u64,
///     user: String,
/// }
///
/// impl_record!(Session { id, user });
///
/// let session = Session { id: 1, user: "geo".to_owned() };
/// assert_eq!(session.to_value().kind(), ValueKind::Record);
/// ```
///
/// [`ToValue`]: crate::ToValue
/// [`Value`]: crate::Value
#[macro_export]
macro_rules! impl_record {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::Fielded for $ty {
            fn field_list() -> &'static [$crate::FieldInfo] {
                static FIELDS: &[$crate::FieldInfo] = &[$(
                    $crate::FieldInfo::new(::core::stringify!($field), |record| {
                        match record.downcast_ref::<$ty>() {
                            ::core::option::Option::Some(record) => {
                                ::core::result::Result::Ok(
                                    $crate::ToValue::to_value(&record.$field),
                                )
                            }
                            ::core::option::Option::None => {
                                ::core::result::Result::Err(
                                    $crate::FieldError::MismatchedRecord {
                                        expected: ::core::stringify!($ty),
                                    },
                                )
                            }
                        }
                    }),
                )*];
                FIELDS
            }
        }

        impl $crate::Record for $ty {
            fn type_name(&self) -> &'static str {
                ::core::stringify!($ty)
            }

            fn fields(&self) -> &'static [$crate::FieldInfo] {
                <Self as $crate::Fielded>::field_list()
            }

            fn clone_record(&self) -> ::std::boxed::Box<dyn $crate::Record> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }
        }

        impl $crate::ToValue for $ty {
            fn to_value(&self) -> $crate::Value {
                $crate::Value::Record(::std::boxed::Box::new(
                    ::core::clone::Clone::clone(self),
                ))
            }
        }
    };
}

// -----------------------------------------------------------------------------
// auto_register_record!

/// Submits a record type for startup registration.
///
/// Requires the `auto_register` feature. Submitted types are inserted into
/// any registry that calls
/// [`FieldRegistry::auto_register`](crate::registry::FieldRegistry::auto_register);
/// the [global registry](crate::registry::global) does so when first used.
///
/// ```
/// use jw_reflect::{auto_register_record, impl_record};
///
/// #[derive(Clone)]
/// struct Job {
///     id: u32,
/// }
///
/// impl_record!(Job { id });
/// auto_register_record!(Job);
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register_record {
    ($ty:ty) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::RecordRegistration::of::<$ty>()
        }
    };
}
