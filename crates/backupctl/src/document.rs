//! Read-only, panic-free access to untyped JSON documents such as the
//! `data` of a `DynamicObject` or a manifest file.
//!
//! Every lookup returns `Option`: a missing key, a `null` value and a value of
//! the wrong shape all read as `None`.

use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    value: &'a Value,
}

impl<'a> Document<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// Child of a mapping. `null` children count as absent.
    pub fn field(&self, key: &str) -> Option<Document<'a>> {
        self.value
            .as_object()?
            .get(key)
            .filter(|v| !v.is_null())
            .map(Document::new)
    }

    /// Walk nested mappings, e.g. `&["metadata", "name"]`.
    pub fn path(&self, keys: &[&str]) -> Option<Document<'a>> {
        keys.iter().try_fold(*self, |doc, key| doc.field(key))
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.value.as_str()
    }

    pub fn is_mapping(&self) -> bool {
        self.value.is_object()
    }

    pub fn str_field(&self, key: &str) -> Option<&'a str> {
        self.field(key)?.as_str()
    }

    pub fn str_at(&self, keys: &[&str]) -> Option<&'a str> {
        self.path(keys)?.as_str()
    }

    /// Elements of a sequence.
    pub fn items(&self) -> Option<impl Iterator<Item = Document<'a>>> {
        self.value.as_array().map(|items| items.iter().map(Document::new))
    }
}
