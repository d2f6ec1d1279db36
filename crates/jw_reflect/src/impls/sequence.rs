use std::collections::VecDeque;

use crate::{ToValue, Value};

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    #[inline]
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    #[inline]
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for VecDeque<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::{ToValue, Value};

    #[test]
    fn nested_elements_keep_order() {
        let value = vec![vec![1, 2], vec![3]].to_value();
        match value {
            Value::List(items) => assert_eq!(items.len(), 2),
            other => panic!("expected a list, got {other:?}"),
        }
    }
}
