use crate::{ToValue, Value};

/// Primitives keep their invariant `Display` rendering as the canonical
/// scalar text.
macro_rules! impl_to_value_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl ToValue for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Value::Scalar(self.to_string())
            }
        }
    )*};
}

impl_to_value_scalar!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);
