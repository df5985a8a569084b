//! Caller-supplied argument maps and their validation against per-operation key sets.

use std::borrow::Cow;

use crate::domain::datetime::to_unix_timestamp;
use crate::domain::validation::ValidationError;

/// Argument key whose value is normalized into a Unix timestamp.
pub const DATE_KEY: &str = "date";

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single argument value.
pub enum ArgValue {
    Text(String),
    Number(i64),
    List(Vec<String>),
}

impl ArgValue {
    /// Scalar view of the value; `None` for lists.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(value) => Some(Cow::Borrowed(value)),
            Self::Number(value) => Some(Cow::Owned(value.to_string())),
            Self::List(_) => None,
        }
    }

    /// Coerce into a list; scalars become a one-element list.
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::Text(value) => vec![value],
            Self::Number(value) => vec![value.to_string()],
            Self::List(values) => values,
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for ArgValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ArgValue {
    fn from(values: [&str; N]) -> Self {
        Self::List(values.into_iter().map(str::to_owned).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Ordered field name → value mapping, as supplied by the caller.
///
/// Keys are unique; inserting an existing key replaces its value in place.
pub struct RequestArgs {
    fields: Vec<(String, ArgValue)>,
}

impl RequestArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`RequestArgs::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Option<ArgValue> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<ArgValue> {
        let idx = self.fields.iter().position(|(existing, _)| existing == key)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestArgs
where
    K: Into<String>,
    V: Into<ArgValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (key, value) in iter {
            args.insert(key, value);
        }
        args
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Declared key sets for one operation.
///
/// `optional` lists every accepted key, required ones included.
pub struct ParamSet {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

/// Check `args` against `params` and normalize the `date` field.
///
/// Missing keys are reported before unknown ones; each error lists every offending key
/// (required-set order for missing keys, argument order for unknown keys).
pub fn validate(mut args: RequestArgs, params: &ParamSet) -> Result<RequestArgs, ValidationError> {
    let missing = params
        .required
        .iter()
        .filter(|key| !args.contains_key(key))
        .map(|key| (*key).to_owned())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(ValidationError::MissingParameter { keys: missing });
    }

    let invalid = args
        .keys()
        .filter(|key| !params.optional.iter().any(|allowed| allowed == key))
        .map(str::to_owned)
        .collect::<Vec<_>>();
    if !invalid.is_empty() {
        return Err(ValidationError::InvalidParameter { keys: invalid });
    }

    let timestamp = match args.get(DATE_KEY) {
        None => None,
        Some(ArgValue::Number(seconds)) => Some(*seconds),
        Some(ArgValue::Text(input)) => Some(to_unix_timestamp(input)?),
        Some(ArgValue::List(_)) => {
            return Err(ValidationError::InvalidValue {
                field: DATE_KEY.to_owned(),
                reason: "expected a single value",
            });
        }
    };
    if let Some(seconds) = timestamp {
        args.insert(DATE_KEY, seconds);
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMS: ParamSet = ParamSet {
        required: &["from", "msg", "to"],
        optional: &["from", "msg", "to", "date", "clear_polish", "test"],
    };

    #[test]
    fn missing_keys_are_all_listed_in_required_order() {
        let args = RequestArgs::new().with("msg", "hi");
        let err = validate(args, &SMS).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingParameter {
                keys: vec!["from".to_owned(), "to".to_owned()],
            }
        );
    }

    #[test]
    fn missing_check_wins_over_invalid_keys() {
        let args = RequestArgs::new().with("msg", "hi").with("bogus", "x");
        let err = validate(args, &SMS).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingParameter {
                keys: vec!["from".to_owned(), "to".to_owned()],
            }
        );
    }

    #[test]
    fn invalid_keys_are_all_listed() {
        let args = RequestArgs::new()
            .with("from", "TEST")
            .with("zzz", "1")
            .with("msg", "hi")
            .with("to", ["111"])
            .with("aaa", "2");
        let err = validate(args, &SMS).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidParameter {
                keys: vec!["zzz".to_owned(), "aaa".to_owned()],
            }
        );
        assert_eq!(err.to_string(), "invalid parameter: zzz, aaa");
    }

    #[test]
    fn date_is_replaced_by_timestamp() {
        let args = RequestArgs::new()
            .with("from", "TEST")
            .with("msg", "hi")
            .with("to", "111")
            .with("date", "2021-01-01T00:00:00Z");
        let args = validate(args, &SMS).unwrap();
        assert_eq!(args.get("date"), Some(&ArgValue::Number(1_609_459_200)));
        assert_eq!(
            args.keys().collect::<Vec<_>>(),
            vec!["from", "msg", "to", "date"]
        );
    }

    #[test]
    fn invalid_date_is_rejected() {
        let args = RequestArgs::new()
            .with("from", "TEST")
            .with("msg", "hi")
            .with("to", "111")
            .with("date", "soon");
        assert!(matches!(
            validate(args, &SMS),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn insert_replaces_in_place_and_remove_works() {
        let mut args: RequestArgs = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(args.insert("a", "3"), Some(ArgValue::Text("1".to_owned())));
        assert_eq!(args.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(args.remove("a"), Some(ArgValue::Text("3".to_owned())));
        assert_eq!(args.len(), 1);
        assert!(!args.contains_key("a"));
    }

    #[test]
    fn scalar_values_coerce_to_lists() {
        assert_eq!(ArgValue::from("x").into_list(), vec!["x".to_owned()]);
        assert_eq!(ArgValue::from(5).into_list(), vec!["5".to_owned()]);
        assert!(ArgValue::from(["a", "b"]).as_text().is_none());
    }
}
