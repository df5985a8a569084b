use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingParameter { keys: Vec<String> },
    InvalidParameter { keys: Vec<String> },
    Empty { field: &'static str },
    InvalidValue { field: String, reason: &'static str },
    InvalidDate { input: String },
    InvalidPhoneNumber { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter { keys } => {
                write!(f, "missing parameter: {}", keys.join(", "))
            }
            Self::InvalidParameter { keys } => {
                write!(f, "invalid parameter: {}", keys.join(", "))
            }
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidValue { field, reason } => write!(f, "invalid value for {field}: {reason}"),
            Self::InvalidDate { input } => write!(f, "invalid date: {input}"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::MissingParameter {
            keys: vec!["from".to_owned(), "msg".to_owned()],
        };
        assert_eq!(err.to_string(), "missing parameter: from, msg");

        let err = ValidationError::InvalidParameter {
            keys: vec!["foo".to_owned()],
        };
        assert_eq!(err.to_string(), "invalid parameter: foo");

        let err = ValidationError::Empty { field: "to" };
        assert_eq!(err.to_string(), "to must not be empty");

        let err = ValidationError::InvalidValue {
            field: "from".to_owned(),
            reason: "expected a single value",
        };
        assert_eq!(
            err.to_string(),
            "invalid value for from: expected a single value"
        );

        let err = ValidationError::InvalidDate {
            input: "tomorrow".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid date: tomorrow");

        let err = ValidationError::InvalidPhoneNumber {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");
    }
}
