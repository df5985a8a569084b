//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod account;
mod response;
mod send_mms;
mod send_sms;
mod status_report;
mod xml;

use crate::domain::{ApiKey, ApiPassword, Credentials};

pub use account::{
    decode_balance_response, decode_sender_fields_json_response,
    encode_message_form, encode_product_form,
};
pub use response::decode_response;
pub use send_mms::build_mms_body;
pub use send_sms::{build_sms_body, encode_simple_sms_query};
pub use status_report::parse_status_report;

/// Form field carrying the XML request body.
pub const XML_FORM_FIELD: &str = "xmldata";

/// `key` and `password` parameters sent with every call.
pub fn credential_params(credentials: &Credentials) -> Vec<(String, String)> {
    vec![
        (ApiKey::FIELD.to_owned(), credentials.key().as_str().to_owned()),
        (
            ApiPassword::FIELD.to_owned(),
            credentials.password().as_str().to_owned(),
        ),
    ]
}

/// Wrap an XML body into the single-field form the send endpoints expect.
pub fn encode_xml_form(body: String) -> Vec<(String, String)> {
    vec![(XML_FORM_FIELD.to_owned(), body)]
}
