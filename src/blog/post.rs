//! Post records as exchanged with the posts API.
//!
//! Only `id` is interpreted by this crate. Everything else (title,
//! description, publish date, ...) is kept as an opaque JSON object and
//! round-trips untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A post that has an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A post that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostDraft {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Post {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Attach an id to a draft.
    pub fn from_draft(id: impl Into<String>, draft: PostDraft) -> Self {
        Self {
            id: id.into(),
            fields: draft.fields,
        }
    }

    /// Set a domain field, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl PostDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Build a draft from a JSON object. An `id` key, if present, is dropped.
    pub fn from_object(mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        Self { fields }
    }
}
