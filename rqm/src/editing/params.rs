//! Prefixed form parameters

use serde::Serialize;

/// Ordered form fields of an edit submission
///
/// MusicBrainz edit forms namespace every field with the form name, so the
/// work name of the create-work form is posted as `edit-work.name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormParams {
    fields: Vec<(String, String)>,
}

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `prefix.name` to `value`, replacing an earlier value
    pub fn append(&mut self, prefix: &str, name: &str, value: impl ToString) -> &mut Self {
        let key = format!("{}.{}", prefix, name);
        let value = value.to_string();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(field) => field.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    /// Set `prefix.name` to `value`, or to `default` when there is no value
    pub fn append_or<V: ToString>(&mut self, prefix: &str, name: &str, value: Option<V>, default: &str) -> &mut Self {
        match value {
            Some(value) => self.append(prefix, name, value),
            None => self.append(prefix, name, default),
        }
    }

    /// Set `prefix.name` only when there is a value
    pub fn append_opt<V: ToString>(&mut self, prefix: &str, name: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.append(prefix, name, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
