#![doc = include_str!("../README.md")]

mod escape;
mod layout;
mod writer;

pub use escape::escape;
pub use writer::{JsonWriter, serialize, serialize_excluding, serialize_only};
