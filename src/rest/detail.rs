use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use validator::ValidationErrors;

use crate::validation::first_tag;

/// Field-keyed reasons. A second reason for the same field is appended with `" | "`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorDetails(BTreeMap<String, String>);

impl ErrorDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, reason: &str) {
        let entry = self.0.entry(key.into()).or_default();
        if !entry.is_empty() {
            entry.push_str(" | ");
        }
        entry.push_str(reason);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

/// The shapes accepted for an error envelope's `detail` member
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Validation(ValidationErrors),
    Map(BTreeMap<String, String>),
    Details(ErrorDetails),
    Message(String),
    /// Anything else. Produces no `detail` key.
    Unrecognized,
}

impl Detail {
    /// Single `{key: reason}` entry
    pub fn field(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Detail::Map(BTreeMap::from([(key.into(), reason.into())]))
    }

    pub fn into_map(self) -> Option<BTreeMap<String, String>> {
        match self {
            Detail::Validation(errors) => Some(
                errors
                    .field_errors()
                    .into_iter()
                    .filter_map(|(field, errors)| Some((field.to_lowercase(), first_tag(errors)?)))
                    .collect(),
            ),
            Detail::Map(map) => Some(map),
            Detail::Details(details) => Some(details.into_inner()),
            Detail::Message(message) => Some(BTreeMap::from([("error".to_string(), message)])),
            Detail::Unrecognized => None,
        }
    }
}

impl From<ValidationErrors> for Detail {
    fn from(errors: ValidationErrors) -> Self {
        Detail::Validation(errors)
    }
}

impl From<BTreeMap<String, String>> for Detail {
    fn from(map: BTreeMap<String, String>) -> Self {
        Detail::Map(map)
    }
}

impl From<HashMap<String, String>> for Detail {
    fn from(map: HashMap<String, String>) -> Self {
        Detail::Map(map.into_iter().collect())
    }
}

impl From<ErrorDetails> for Detail {
    fn from(details: ErrorDetails) -> Self {
        Detail::Details(details)
    }
}

impl From<&ErrorDetails> for Detail {
    fn from(details: &ErrorDetails) -> Self {
        Detail::Details(details.clone())
    }
}

impl From<String> for Detail {
    fn from(message: String) -> Self {
        Detail::Message(message)
    }
}

impl From<&str> for Detail {
    fn from(message: &str) -> Self {
        Detail::Message(message.to_string())
    }
}

/// Strings and objects of strings are recognised; every other JSON value is not.
impl From<Value> for Detail {
    fn from(value: Value) -> Self {
        match value {
            Value::String(message) => Detail::Message(message),
            Value::Object(object) => object
                .into_iter()
                .map(|(key, value)| match value {
                    Value::String(reason) => Some((key, reason)),
                    _ => None,
                })
                .collect::<Option<BTreeMap<_, _>>>()
                .map_or(Detail::Unrecognized, Detail::Map),
            _ => Detail::Unrecognized,
        }
    }
}
