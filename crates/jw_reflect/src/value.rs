use core::fmt;

use crate::Record;

// -----------------------------------------------------------------------------
// Value

/// A runtime value reduced to one of the shapes the JSON writer understands.
///
/// Instead of inspecting arbitrary runtime types, the writer dispatches on
/// this closed tag set. Native values are adapted into it through
/// [`ToValue`]; the adaptation decides the shape once, up front, so the
/// writer never has to guess.
///
/// # Examples
///
/// ```
/// use jw_reflect::{ToValue, Value, ValueKind};
///
/// assert_eq!(true.to_value().kind(), ValueKind::Scalar);
/// assert_eq!(vec![1, 2, 3].to_value().kind(), ValueKind::List);
/// assert_eq!(None::<i32>.to_value().kind(), ValueKind::Null);
/// ```
#[derive(Clone)]
pub enum Value {
    /// An absent value.
    Null,
    /// The canonical text of a primitive or string.
    ///
    /// Numbers, booleans, chars, and date/time renderings all arrive here as
    /// their culture-invariant [`Display`](core::fmt::Display) form. The
    /// writer decides from the text alone whether the output is quoted.
    Scalar(String),
    /// A byte blob, rendered by the writer as a base64 string.
    Bytes(Vec<u8>),
    /// An ordered sequence of elements.
    List(Vec<Value>),
    /// Ordered key/value entries; keys are already text.
    Map(Vec<(String, Value)>),
    /// A structured object whose fields are read lazily by the writer.
    Record(Box<dyn Record>),
}

impl Value {
    /// Builds a [`Value::Scalar`] from any displayable primitive.
    ///
    /// This is the canonical-string entry point: the value's `Display` form
    /// is captured once and used both for output and for the writer's
    /// number/boolean detection.
    ///
    /// # Examples
    ///
    /// ```
    /// use jw_reflect::Value;
    ///
    /// let value = Value::scalar(1.5_f64);
    /// assert_eq!(value.as_scalar(), Some("1.5"));
    /// ```
    pub fn scalar(value: impl fmt::Display) -> Self {
        Value::Scalar(value.to_string())
    }

    /// Returns the [`ValueKind`] of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Record(_) => ValueKind::Record,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the canonical text if this is a [`Value::Scalar`].
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Scalar(text) => f.debug_tuple("Scalar").field(text).finish(),
            Value::Bytes(bytes) => write!(f, "Bytes(len = {})", bytes.len()),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Record(record) => write!(f, "Record({})", record.type_name()),
        }
    }
}

// -----------------------------------------------------------------------------
// ValueKind

/// A pure enumeration of the shapes a [`Value`] can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Scalar,
    Bytes,
    List,
    Map,
    Record,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Null => "null",
            ValueKind::Scalar => "scalar",
            ValueKind::Bytes => "bytes",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Record => "record",
        })
    }
}

// -----------------------------------------------------------------------------
// ToValue

/// Adapts a native value into its [`Value`] shape.
///
/// Implementations exist for the primitive types, strings, `Option`,
/// references and smart pointers, sequences, and string-keyed maps; see
/// [`crate::impls`] for the full menu. Structured types usually get their
/// impl from [`impl_record!`](crate::impl_record), which produces
/// [`Value::Record`].
pub trait ToValue {
    /// Converts this value into its [`Value`] shape.
    fn to_value(&self) -> Value;
}

// Already-adapted values pass through, so heterogeneous containers can mix
// native values with hand-built `Value`s.
impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

// -----------------------------------------------------------------------------
// Bytes

/// A byte blob that serializes as a base64 string.
///
/// `Vec<u8>` adapts to [`Value::List`] like any other sequence; wrapping it
/// in `Bytes` opts in to the blob shape instead. The distinction has to be
/// made by the caller because, at the type level, a byte buffer *is* a
/// sequence.
///
/// # Examples
///
/// ```
/// use jw_reflect::{Bytes, ToValue, ValueKind};
///
/// assert_eq!(vec![0x41_u8, 0x42].to_value().kind(), ValueKind::List);
/// assert_eq!(Bytes(vec![0x41, 0x42]).to_value().kind(), ValueKind::Bytes);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    /// Creates a blob from anything that can become a byte vector.
    #[inline]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl ToValue for Bytes {
    fn to_value(&self) -> Value {
        Value::Bytes(self.0.clone())
    }
}
