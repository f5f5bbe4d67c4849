use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which editors nest record field updates.
pub const METADATA: &str = "metadata";

/// A partial update for one record: field name to new value, with record
/// fields grouped under [`METADATA`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a top-level key.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Sets a key inside the [`METADATA`] group.
    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        let metadata = self
            .0
            .entry(METADATA)
            .or_insert_with(|| Value::Object(Map::new()));
        if !metadata.is_object() {
            *metadata = Value::Object(Map::new());
        }
        if let Value::Object(map) = metadata {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    /// Returns a top-level value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the [`METADATA`] group, if present.
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.0.get(METADATA).and_then(Value::as_object)
    }

    /// Returns `true` if this payload carries no update: no top-level keys,
    /// or only an empty [`METADATA`] group.
    pub fn is_empty(&self) -> bool {
        self.0
            .iter()
            .all(|(key, value)| key == METADATA && value.as_object().is_some_and(Map::is_empty))
    }

    /// Merges `other` into `self`; on a key collision `other` wins.
    ///
    /// Objects present on both sides are merged key by key with the same rule,
    /// so two editors writing different [`METADATA`] fields both survive while
    /// two editors writing the same field resolve to the later one.
    pub fn merge(&mut self, other: Payload) {
        merge_maps(&mut self.0, other.0);
    }

    /// Merges payloads in order; later payloads take precedence.
    pub fn merge_all(payloads: impl IntoIterator<Item = Payload>) -> Payload {
        payloads.into_iter().fold(Payload::new(), |mut acc, p| {
            acc.merge(p);
            acc
        })
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

fn merge_maps(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        let Value::Object(incoming) = value else {
            target.insert(key, value);
            continue;
        };
        if let Some(Value::Object(existing)) = target.get_mut(&key) {
            merge_maps(existing, incoming);
            continue;
        }
        target.insert(key, Value::Object(incoming));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    mod emptiness {
        use super::*;

        #[test]
        fn new_is_empty() {
            assert!(Payload::new().is_empty());
        }

        #[test]
        fn empty_metadata_group_is_empty() {
            let payload: Payload = serde_json::from_value(json!({"metadata": {}})).unwrap();
            assert!(payload.is_empty());
        }

        #[test]
        fn metadata_field_is_not_empty() {
            assert!(!Payload::new().with_metadata("weight", "5").is_empty());
        }

        #[test]
        fn null_metadata_value_is_not_empty() {
            let payload = Payload::new().with_metadata("visible_to_staff_only", Value::Null);
            assert!(!payload.is_empty());
        }

        #[test]
        fn top_level_field_is_not_empty() {
            assert!(!Payload::new().with_field("publish", "make_public").is_empty());
        }
    }

    mod merging {
        use super::*;

        #[test]
        fn disjoint_metadata_fields_survive() {
            let merged = Payload::merge_all([
                Payload::new().with_metadata("due", Value::Null),
                Payload::new().with_metadata("weight", "2"),
            ]);
            assert_eq!(
                serde_json::to_value(&merged).unwrap(),
                json!({"metadata": {"due": null, "weight": "2"}})
            );
        }

        #[test]
        fn later_payload_wins_on_collision() {
            let merged = Payload::merge_all([
                Payload::new()
                    .with_field("publish", "republish")
                    .with_metadata("visible_to_staff_only", true),
                Payload::new()
                    .with_field("publish", "make_public")
                    .with_metadata("visible_to_staff_only", Value::Null),
            ]);
            assert_eq!(merged.get("publish"), Some(&json!("make_public")));
            assert_eq!(
                merged.metadata().unwrap().get("visible_to_staff_only"),
                Some(&Value::Null)
            );
        }

        #[test]
        fn empty_payloads_merge_to_empty() {
            let merged = Payload::merge_all([Payload::new(), Payload::new(), Payload::new()]);
            assert!(merged.is_empty());
        }

        #[test]
        fn non_object_replaces_object() {
            let mut payload = Payload::new().with_metadata("weight", "1");
            payload.merge(Payload::new().with_field(METADATA, Value::Null));
            assert_eq!(payload.get(METADATA), Some(&Value::Null));
        }
    }

    #[test]
    fn with_metadata_replaces_non_object_group() {
        let payload = Payload::new()
            .with_field(METADATA, "oops")
            .with_metadata("weight", "3");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"metadata": {"weight": "3"}})
        );
    }
}
