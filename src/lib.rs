#![doc = include_str!("../README.md")]

pub use jw_reflect as reflect;
pub use jw_ser as ser;
