use crate::domain::{Credentials, MessageId, Product};

use super::credential_params;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("balance is not a number: {body:?}")]
    Balance { body: String },
}

/// Form for `senderFields` and `getBalance`.
pub fn encode_product_form(credentials: &Credentials, product: Product) -> Vec<(String, String)> {
    let mut params = credential_params(credentials);
    params.push((Product::FIELD.to_owned(), product.as_str().to_owned()));
    params
}

/// Form for `cancelMessage` and `getMessageStatus`.
pub fn encode_message_form(credentials: &Credentials, id: MessageId) -> Vec<(String, String)> {
    let mut params = credential_params(credentials);
    params.push((MessageId::FIELD.to_owned(), id.value().to_string()));
    params
}

pub fn decode_sender_fields_json_response(body: &str) -> Result<serde_json::Value, AccountError> {
    Ok(serde_json::from_str(body)?)
}

/// Balance as a whole number; fractional balances are truncated toward zero.
pub fn decode_balance_response(body: &str) -> Result<i64, AccountError> {
    let trimmed = body.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value.trunc() as i64),
        _ => Err(AccountError::Balance {
            body: body.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("k", "p").unwrap()
    }

    #[test]
    fn product_form_carries_credentials_and_product() {
        assert_eq!(
            encode_product_form(&credentials(), Product::Mms),
            vec![
                ("key".to_owned(), "k".to_owned()),
                ("password".to_owned(), "p".to_owned()),
                ("product".to_owned(), "MMS".to_owned()),
            ]
        );
    }

    #[test]
    fn message_form_carries_message_id() {
        let params = encode_message_form(&credentials(), MessageId::new(99).unwrap());
        assert_eq!(params[2], ("messageId".to_owned(), "99".to_owned()));
    }

    #[test]
    fn balance_accepts_integers_and_truncates_decimals() {
        assert_eq!(decode_balance_response(" 120\n").unwrap(), 120);
        assert_eq!(decode_balance_response("12.75").unwrap(), 12);
        assert_eq!(decode_balance_response("-3").unwrap(), -3);
        assert!(matches!(
            decode_balance_response("ERROR"),
            Err(AccountError::Balance { .. })
        ));
        assert!(decode_balance_response("inf").is_err());
    }

    #[test]
    fn sender_fields_are_returned_verbatim() {
        let value = decode_sender_fields_json_response(r#"{"TEST":"active","SHOP":"pending"}"#)
            .unwrap();
        assert_eq!(value["TEST"], "active");
        assert!(decode_sender_fields_json_response("{ nope").is_err());
    }
}
