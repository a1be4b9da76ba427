//! Typed front matter, and extraction of the photo field from it

use std::collections::HashMap;
use std::error::Error;

use serde_json::Value;

/// The value of a front matter field, reduced to the shapes this crate cares about
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<FieldValue>),
    /// Numbers, booleans, nulls, nested objects...
    Other,
}

impl FieldValue {
    /// Returns the photo reference this value holds, if any.
    ///
    /// This is the text of a non-blank string, or the first element of a list when that element is a non-blank string.
    /// The text is returned as written, surrounding whitespace included.
    pub fn photo_reference(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => non_blank(text),
            FieldValue::List(items) => match items.first() {
                Some(FieldValue::Text(text)) => non_blank(text),
                _ => None,
            },
            FieldValue::Other => None,
        }
    }
}

fn non_blank(text: &str) -> Option<&str> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => FieldValue::List(items.into_iter().map(FieldValue::from).collect()),
            _ => FieldValue::Other,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// The parsed front matter block of a note, as provided by the host metadata index
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrontMatter {
    fields: HashMap<String, FieldValue>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build front matter from an already-parsed JSON value.
    ///
    /// Returns `None` if the value is not an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(map.into_iter().collect()),
            _ => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value).ok_or_else(|| "front matter must be a JSON object".into())
    }

    pub fn insert<K: Into<String>, V: Into<FieldValue>>(&mut self, key: K, value: V) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> std::iter::FromIterator<(K, Value)> for FrontMatter {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), FieldValue::from(v))).collect(),
        }
    }
}

/// Find the raw photo reference of a note.
///
/// `field_names` are tried in order, and the first one that holds a photo reference wins.
/// Fields that are missing, blank, empty lists or of any other shape are skipped.
pub fn extract_photo_field<'a, S: AsRef<str>>(front_matter: Option<&'a FrontMatter>, field_names: &[S]) -> Option<&'a str> {
    let front_matter = front_matter?;

    field_names.iter()
        .filter_map(|name| front_matter.get(name.as_ref()))
        .find_map(|value| value.photo_reference())
}
