use core::fmt::Display;
use core::hash::BuildHasher;
use std::collections::BTreeMap;

use crate::{ToValue, Value};

/// Map keys are coerced to text; entries keep the map's iteration order.
fn collect_entries<'a, K, V>(entries: impl Iterator<Item = (&'a K, &'a V)>) -> Value
where
    K: Display + 'a,
    V: ToValue + 'a,
{
    Value::Map(
        entries
            .map(|(key, value)| (key.to_string(), value.to_value()))
            .collect(),
    )
}

impl<K: Display, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        collect_entries(self.iter())
    }
}

impl<K: Display, V: ToValue, S: BuildHasher> ToValue for std::collections::HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        collect_entries(self.iter())
    }
}

impl<K: Display, V: ToValue, S: BuildHasher> ToValue for hashbrown::HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        collect_entries(self.iter())
    }
}
