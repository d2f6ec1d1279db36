#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Modules

mod field;
mod record;
mod value;

pub mod impls;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use field::{FieldError, FieldInfo};
pub use record::{Fielded, Record};
pub use value::{Bytes, ToValue, Value, ValueKind};

// -----------------------------------------------------------------------------
// Macro support

/// Implementation details of this crate's macros; not public API.
#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __macro_exports {
    pub use inventory;
}
