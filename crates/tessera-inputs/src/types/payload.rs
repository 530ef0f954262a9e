//! Opaque string-keyed payloads.

use std::fmt;
use std::sync::Arc;

use derive_more::Deref;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An immutable, cheaply clonable mapping of string keys to opaque values.
///
/// Payloads are passed through this layer without being interpreted. Cloning
/// shares the underlying map, so two clones of the same payload compare equal
/// with [`Payload::ptr_eq`]. Iteration follows insertion order.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use tessera_inputs::types::Payload;
///
/// let data: Payload = Payload::from_iter([("image", json!({"url": "cat.png"}))]);
/// let shared = data.clone();
///
/// assert!(data.ptr_eq(&shared));
/// assert_eq!(data.get("image"), Some(&json!({"url": "cat.png"})));
/// ```
#[derive(Clone, PartialEq, Deref, Serialize, Deserialize)]
#[deref(forward)]
#[serde(transparent)]
pub struct Payload<V = Value>(Arc<IndexMap<String, V>>);

impl<V> Payload<V> {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self(Arc::new(IndexMap::new()))
    }

    /// Returns true if both payloads share the same underlying map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Adds an entry, copying the map first if it is shared.
    pub fn with_entry(mut self, key: impl Into<String>, value: V) -> Self
    where
        V: Clone,
    {
        Arc::make_mut(&mut self.0).insert(key.into(), value);
        self
    }
}

impl<V> Default for Payload<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Payload<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl<V> From<IndexMap<String, V>> for Payload<V> {
    fn from(entries: IndexMap<String, V>) -> Self {
        Self(Arc::new(entries))
    }
}

impl<K, V> FromIterator<(K, V)> for Payload<V>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(Arc::new(
            iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_payload_preserves_insertion_order() {
        let payload: Payload = Payload::from_iter([
            ("video", json!(1)),
            ("audio", json!(2)),
            ("image", json!(3)),
        ]);

        let keys: Vec<_> = payload.keys().map(String::as_str).collect();
        assert_eq!(keys, ["video", "audio", "image"]);
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"video":1,"audio":2,"image":3}"#
        );
    }

    #[test]
    fn test_payload_with_entry_copies_shared_map() {
        let original: Payload = Payload::new().with_entry("a", json!(1));
        let extended = original.clone().with_entry("b", json!(2));

        assert_eq!(original.len(), 1);
        assert_eq!(extended.len(), 2);
        assert!(!original.ptr_eq(&extended));
    }

    #[test]
    fn test_payload_round_trips_through_json() {
        let payload: Payload = serde_json::from_value(json!({"pixel_values": [[0.1]]})).unwrap();
        assert_eq!(payload.get("pixel_values"), Some(&json!([[0.1]])));
        assert!(Payload::<Value>::default().is_empty());
    }
}
