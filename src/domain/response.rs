use std::collections::BTreeMap;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::domain::value::MessageId;

/// `result` value the gateway uses to report a failed call.
pub const RESULT_ERROR: &str = "ERROR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Decoded XML response: root element name plus its direct children as text fields.
///
/// When a child element repeats, the first occurrence is kept.
pub struct ResponseDocument {
    pub root: String,
    pub fields: BTreeMap<String, String>,
}

impl ResponseDocument {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn result(&self) -> Option<&str> {
        self.get("result")
    }

    pub fn is_error(&self) -> bool {
        self.result().map(str::trim) == Some(RESULT_ERROR)
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.get("errorMsg")
    }

    /// `errorCode` as an integer; missing or non-numeric values yield `0`.
    pub fn error_code(&self) -> i64 {
        self.get("errorCode")
            .and_then(|code| code.trim().parse().ok())
            .unwrap_or(0)
    }

    /// `messageId` when present and positive.
    pub fn message_id(&self) -> Option<MessageId> {
        self.get(MessageId::FIELD)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .and_then(|value| MessageId::new(value).ok())
    }

    pub fn result_message(&self) -> Option<&str> {
        self.get("resultMessage")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Labelled report values, kept in the order the gateway sent them.
///
/// Serializes as a map.
pub struct ReportFields(Vec<(String, String)>);

impl ReportFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Add a field unless `label` is already present. Returns whether it was added.
    pub fn insert_first(&mut self, label: impl Into<String>, value: impl Into<String>) -> bool {
        let label = label.into();
        if self.contains(&label) {
            return false;
        }
        self.0.push((label, value.into()));
        true
    }

    /// Set a field; an existing label keeps its position and takes the new value.
    pub fn set(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.0.iter_mut().find(|(name, _)| *name == label) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((label, value)),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReportFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (label, value) in iter {
            fields.set(label, value);
        }
        fields
    }
}

impl Serialize for ReportFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Delivery-status report for one message.
pub struct StatusReport {
    /// Header block (`key: value` lines); the send date is normalized.
    pub from: ReportFields,
    /// One record per recipient, labelled by the table header row.
    pub to: Vec<ReportFields>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(fields: &[(&str, &str)]) -> ResponseDocument {
        ResponseDocument {
            root: "result".to_owned(),
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }

    #[test]
    fn message_id_requires_positive_number() {
        assert_eq!(doc(&[("messageId", "123")]).message_id().map(MessageId::value), Some(123));
        assert_eq!(doc(&[("messageId", "0")]).message_id(), None);
        assert_eq!(doc(&[("messageId", "-4")]).message_id(), None);
        assert_eq!(doc(&[("messageId", "abc")]).message_id(), None);
        assert_eq!(doc(&[]).message_id(), None);
    }

    #[test]
    fn error_fields_are_exposed() {
        let document = doc(&[("result", "ERROR"), ("errorCode", " 5 "), ("errorMsg", "bad key")]);
        assert!(document.is_error());
        assert_eq!(document.error_code(), 5);
        assert_eq!(document.error_msg(), Some("bad key"));

        let document = doc(&[("result", "OK"), ("errorCode", "x")]);
        assert!(!document.is_error());
        assert_eq!(document.error_code(), 0);
    }

    #[test]
    fn status_report_serializes_as_from_and_to() {
        let report = StatusReport {
            from: [("Nadawca", "TEST")].into_iter().collect(),
            to: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["from"]["Nadawca"], "TEST");
        assert!(json["to"].as_array().unwrap().is_empty());
    }

    #[test]
    fn report_fields_keep_gateway_order() {
        let fields: ReportFields = [("Numer", "111"), ("Status", "OK"), ("Data", "x")]
            .into_iter()
            .collect();
        assert_eq!(fields.labels().collect::<Vec<_>>(), vec!["Numer", "Status", "Data"]);

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"Numer":"111","Status":"OK","Data":"x"}"#);
    }

    #[test]
    fn insert_first_keeps_earlier_value_and_set_replaces_in_place() {
        let mut fields = ReportFields::new();
        assert!(fields.insert_first("A", "1"));
        assert!(!fields.insert_first("A", "2"));
        fields.set("B", "3");
        fields.set("A", "4");

        assert_eq!(fields.iter().collect::<Vec<_>>(), vec![("A", "4"), ("B", "3")]);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("C"), None);
    }
}
