use std::borrow::Cow;

use crate::{ToValue, Value};

impl ToValue for str {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Scalar(self.to_owned())
    }
}

impl ToValue for String {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Scalar(self.clone())
    }
}

impl ToValue for Cow<'_, str> {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Scalar(self.clone().into_owned())
    }
}
