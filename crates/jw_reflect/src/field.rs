use core::{error, fmt};

use crate::{Record, Value};

// -----------------------------------------------------------------------------
// FieldInfo

/// Information for one named, readable record field.
///
/// A field is a name plus an accessor. The accessor receives the record as a
/// trait object and is expected to downcast it back to the concrete type;
/// [`impl_record!`](crate::impl_record) generates exactly that shape.
///
/// # Examples
///
/// ```
/// use jw_reflect::{FieldError, FieldInfo, Value};
///
/// let info = FieldInfo::new("id", |record| match record.downcast_ref::<u32>() {
///     Some(_) => Ok(Value::scalar(7)),
///     None => Err(FieldError::MismatchedRecord { expected: "u32" }),
/// });
///
/// assert_eq!(info.name(), "id");
/// ```
#[derive(Clone, Copy)]
pub struct FieldInfo {
    name: &'static str,
    read: fn(&dyn Record) -> Result<Value, FieldError>,
}

impl FieldInfo {
    /// Creates a new [`FieldInfo`] for the given field `name`.
    #[inline]
    pub const fn new(
        name: &'static str,
        read: fn(&dyn Record) -> Result<Value, FieldError>,
    ) -> Self {
        Self { name, read }
    }

    /// Returns the field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the field's current value from `record`.
    ///
    /// A failed read is a normal outcome, not a defect: the JSON writer
    /// drops unreadable fields from the output without surfacing the error.
    #[inline]
    pub fn read(&self, record: &dyn Record) -> Result<Value, FieldError> {
        (self.read)(record)
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo").field("name", &self.name).finish()
    }
}

// -----------------------------------------------------------------------------
// FieldError

/// A enumeration of all error outcomes
/// that might happen when reading a record field.
#[derive(Debug, PartialEq, Eq)]
pub enum FieldError {
    /// The accessor was applied to a record of a different concrete type.
    MismatchedRecord { expected: &'static str },
    /// The accessor declined to produce a value for this field.
    Unreadable { field: &'static str },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MismatchedRecord { expected } => {
                write!(f, "attempted to read a field of `{expected}` from another record type")
            }
            Self::Unreadable { field } => {
                write!(f, "field `{field}` is not readable on this record")
            }
        }
    }
}

impl error::Error for FieldError {}
