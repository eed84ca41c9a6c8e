use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered request parameters.
///
/// Sent as the query string for `GET` and `DELETE`, and as a JSON object body
/// for `POST`, `PATCH` and `PUT`. Keys keep their insertion order in both
/// encodings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The JSON body for this parameter set, or `None` when there is nothing
    /// to send.
    pub fn to_json(&self) -> Option<Value> {
        (!self.0.is_empty()).then(|| Value::Object(self.0.clone()))
    }

    /// Flatten into query pairs.
    ///
    /// Arrays become repeated `key[]` pairs, nested objects become
    /// `key[field]` pairs and `null` becomes an empty value.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            push_query_pair(&mut pairs, key, value);
        }
        pairs
    }
}

fn push_query_pair(pairs: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Null => pairs.push((key.to_string(), String::new())),
        Value::Bool(b) => pairs.push((key.to_string(), b.to_string())),
        Value::Number(n) => pairs.push((key.to_string(), n.to_string())),
        Value::String(s) => pairs.push((key.to_string(), s.clone())),
        Value::Array(items) => {
            let key = format!("{key}[]");
            for item in items {
                push_query_pair(pairs, &key, item);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                push_query_pair(pairs, &format!("{key}[{field}]"), item);
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_scalars_in_order() {
        let params = Params::new()
            .with("category", "content")
            .with("filepath", "a b.txt")
            .with("version", 3u64)
            .with("latest", true);
        assert_eq!(
            params.query_pairs(),
            vec![
                ("category".to_string(), "content".to_string()),
                ("filepath".to_string(), "a b.txt".to_string()),
                ("version".to_string(), "3".to_string()),
                ("latest".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_arrays_and_objects() {
        let params = Params::new()
            .with("druids", vec!["aa111bb2222", "cc333dd4444"])
            .with("filter", json!({"status": "ok"}))
            .with("empty", Value::Null);
        assert_eq!(
            params.query_pairs(),
            vec![
                ("druids[]".to_string(), "aa111bb2222".to_string()),
                ("druids[]".to_string(), "cc333dd4444".to_string()),
                ("filter[status]".to_string(), "ok".to_string()),
                ("empty".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_empty_params_have_no_body() {
        assert!(Params::new().to_json().is_none());
        assert!(Params::new().is_empty());
    }

    #[test]
    fn test_json_body_preserves_insertion_order() {
        let params: Params = [("zeta", 1), ("alpha", 2)].into_iter().collect();
        let body = serde_json::to_string(&params.to_json()).unwrap_or_default();
        assert_eq!(body, r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn test_insert_replaces_value_in_place() {
        let mut params = Params::new().with("a", 1).with("b", 2);
        params.insert("a", 3);
        assert_eq!(params.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(params.get("a"), Some(&json!(3)));
        assert_eq!(params.len(), 2);
    }
}
