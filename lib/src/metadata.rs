use std::fmt;
use std::borrow::Borrow;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

type Hasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

/// A metadata key with a statically known name and value type.
pub trait MetaKey: 'static {
    const KEY: &'static str;

    type Value: DeserializeOwned + fmt::Debug;
}

#[macro_export]
macro_rules! define_meta_key {
    ($($v:vis $T:ident : $key:literal => $V:ty),+ $(,)?) => {
        $(
            $v struct $T;

            impl $crate::metadata::MetaKey for $T {
                const KEY: &'static str = $key;
                type Value = $V;
            }
        )+
    }
}

define_meta_key! {
    pub KanbanPlugin: "kanban-plugin" => String,
    pub Title: "title" => String,
}

/// A page's metadata: a shared, concurrently writable map from string keys to
/// JSON-like values. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    map: Arc<dashmap::DashMap<Arc<str>, Value, Hasher>>,
}

impl Metadata {
    #[inline(always)]
    pub fn new() -> Self {
        Metadata::default()
    }

    #[inline(always)]
    pub fn get_raw(&self, key: &str) -> Option<Value> {
        self.map.get(key).map(|v| v.clone())
    }

    #[inline(always)]
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn insert_raw<K, V>(&self, key: K, value: V) -> Option<Value>
        where K: Into<Arc<str>> + Borrow<str>, V: Into<Value>
    {
        let mut value = value.into();
        if let Some(mut existing) = self.map.get_mut(key.borrow()) {
            std::mem::swap(&mut *existing, &mut value);
            Some(value)
        } else {
            self.map.insert(key.into(), value)
        }
    }

    /// Returns the value for `K`, or `Err(raw)` if one exists but isn't a
    /// `K::Value`.
    #[inline]
    pub fn get<K: MetaKey>(&self, _: K) -> Option<Result<K::Value, Value>> {
        let value = self.get_raw(K::KEY)?;
        Some(serde_json::from_value(value.clone()).map_err(|_| value))
    }

    /// Returns the value for `key` as a string if it is one.
    pub fn get_str(&self, key: &str) -> Option<Arc<str>> {
        match self.map.get(key)?.value() {
            Value::String(s) => Some(s.as_str().into()),
            _ => None,
        }
    }

    /// Copies every entry of a JSON object into `self`. Non-objects are
    /// ignored; returns the number of entries copied.
    pub fn append(&self, object: Value) -> usize {
        match object {
            Value::Object(map) => {
                let n = map.len();
                for (k, v) in map {
                    self.insert_raw(k, v);
                }

                n
            }
            _ => 0,
        }
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#?}", self.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_and_raw_access() {
        let meta = Metadata::new();
        assert_eq!(meta.append(serde_json::json!({ "kanban-plugin": "board", "n": 3 })), 2);

        assert_eq!(meta.get(KanbanPlugin), Some(Ok("board".to_string())));
        assert_eq!(meta.get_str("kanban-plugin").as_deref(), Some("board"));
        assert!(meta.get(Title).is_none());

        meta.insert_raw("title", 7);
        assert_eq!(meta.get(Title), Some(Err(Value::from(7))));
        assert_eq!(meta.get_str("n"), None);
    }

    #[test]
    fn clones_share_storage() {
        let meta = Metadata::new();
        let other = meta.clone();
        other.insert_raw("title", "Shared");
        assert_eq!(meta.get_str("title").as_deref(), Some("Shared"));
        assert_eq!(meta.append(Value::from(1)), 0);
    }
}
