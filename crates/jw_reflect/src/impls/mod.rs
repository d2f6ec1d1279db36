//! [`ToValue`](crate::ToValue) implementations for common types.
//!
//! ## Implemented Menu
//!
//! - basic:
//!     - `bool`, `char`
//!     - `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//! - text:
//!     - `str`, `String`, `Cow<'_, str>`
//! - wrap:
//!     - `Option<T>`
//!     - `&T`, `Box<T>`, `Arc<T>`
//! - sequence:
//!     - `[T]`, `[T; N]`, `Vec<T>`, `VecDeque<T>`
//! - map (string-convertible keys, in iteration order):
//!     - `BTreeMap<K, V>`, `std::collections::HashMap<K, V, S>`
//!     - `hashbrown::HashMap<K, V, S>`
//!
//! Byte blobs are deliberately absent: `Vec<u8>` adapts as a sequence, and
//! blob rendering opts in through [`Bytes`](crate::Bytes).

mod basic;
mod map;
mod sequence;
mod text;
mod wrap;
