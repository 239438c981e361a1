use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::ModelError;

/// Option bag passed to a builder (target options, configuration overrides, inline task options).
///
/// Keys are ordered so that logs and serialized output are stable.
/// A missing bag deserializes as an empty one when fields are marked `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(BTreeMap<String, Value>);

impl Options {
    /// Create an empty option bag.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Insert a value, replacing any previous value for the key.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style [`Options::insert`].
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.insert(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Overlay `other` on top of `self`.
    ///
    /// Shallow: a key present in `other` replaces the whole value in `self`, nested objects are not merged.
    pub fn merge(&mut self, other: &Options) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Copying variant of [`Options::merge`].
    pub fn merged(&self, other: &Options) -> Options {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Deserialize the bag into a typed option schema.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, ModelError> {
        let value = Value::Object(self.0.clone().into_iter().collect());
        serde_json::from_value(value).map_err(|e| ModelError::InvalidOptions(e.to_string()))
    }

    /// Build a bag from a JSON value. `null` is treated as empty, anything else but an object is rejected.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self(map.into_iter().collect())),
            other => Err(ModelError::InvalidOptions(format!(
                "expected an object, got {other}"
            ))),
        }
    }
}

impl FromIterator<(String, Value)> for Options {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
