use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::BadgeApiError;

/// Form scope Rails uses for project attributes: `project[<field>]`.
pub const PROJECT_FORM_SCOPE: &str = "project";
/// Top-level form field carrying the authenticity token.
pub const AUTH_TOKEN_FIELD: &str = "authentication_token";

/// Field name to new value, e.g. `{"test_status": "Met"}`.
///
/// Criterion statuses live in `<criterion>_status` and accept `Met`,
/// `Unmet`, `?` or `N/A`; justifications live in `<criterion>_justification`.
/// Values are opaque to this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct FieldUpdates {
    fields: BTreeMap<String, String>,
}

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON object. Remember JSON wants double quotes:
    /// `{"test_status": "Met"}`.
    pub fn from_json(text: &str) -> Result<Self, BadgeApiError> {
        let object: Map<String, Value> = serde_json::from_str(text)?;
        Self::try_from(object).map_err(BadgeApiError::InvalidFieldUpdates)
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

impl TryFrom<Map<String, Value>> for FieldUpdates {
    type Error = String;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut fields = BTreeMap::new();
        for (field, value) in object {
            let value = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null => return Err(format!("field '{field}' is null")),
                Value::Array(_) | Value::Object(_) => {
                    return Err(format!("field '{field}' must be a string, number or boolean"))
                }
            };
            fields.insert(field, value);
        }
        Ok(Self { fields })
    }
}

impl<K, V> FromIterator<(K, V)> for FieldUpdates
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }
}

/// Wrap a field name in the form scope: `test_status` -> `project[test_status]`.
pub fn namespaced_field(scope: &str, field: &str) -> String {
    format!("{scope}[{field}]")
}

/// Form-urlencode an update the way the HTML edit form submits it.
///
/// Every field is scoped under `project[...]`; the authenticity token is
/// appended as a top-level field. A missing token is left out and the server
/// rejects the submission.
pub fn encode_project_form(updates: &FieldUpdates, authenticity_token: Option<&str>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (field, value) in updates.iter() {
        serializer.append_pair(&namespaced_field(PROJECT_FORM_SCOPE, field), value);
    }
    if let Some(token) = authenticity_token {
        serializer.append_pair(AUTH_TOKEN_FIELD, token);
    }
    serializer.finish()
}
