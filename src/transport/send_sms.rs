use crate::domain::{
    ApiKey, ApiPassword, Credentials, MessageText, RawPhoneNumber, SendOptions, SendSimpleSms,
    SendSms, SenderName, UnixTimestamp,
};

use super::credential_params;
use super::xml::{XmlValue, XmlWriteError, map_to_element};

/// Root element of every XML request body.
pub const ROOT_ELEMENT: &str = "data";

/// Query parameters for the `send` GET endpoint.
///
/// Recipients are repeated as separate `to` parameters, in order.
pub fn encode_simple_sms_query(
    credentials: &Credentials,
    request: &SendSimpleSms,
) -> Vec<(String, String)> {
    let mut params = credential_params(credentials);
    params.push((
        SenderName::FIELD.to_owned(),
        request.sender().as_str().to_owned(),
    ));
    params.push((
        MessageText::FIELD.to_owned(),
        request.msg().as_str().to_owned(),
    ));
    params.extend(
        request
            .recipients()
            .iter()
            .map(|to| (RawPhoneNumber::FIELD.to_owned(), to.raw().to_owned())),
    );
    params
}

/// XML document for the SMS endpoint.
///
/// Layout: `<data><key/><password/><sms><to/>...<from/><msg/>[date][clear_polish][test]</sms></data>`,
/// with one `<to>` per recipient. `clear_polish` and `test` carry the caller's value as-is.
pub fn build_sms_body(
    credentials: &Credentials,
    request: &SendSms,
) -> Result<String, XmlWriteError> {
    let mut sms = vec![
        (
            RawPhoneNumber::FIELD.to_owned(),
            recipients_value(request.recipients()),
        ),
        (
            SenderName::FIELD.to_owned(),
            XmlValue::text(request.sender().as_str()),
        ),
        (
            MessageText::FIELD.to_owned(),
            XmlValue::text(request.msg().as_str()),
        ),
    ];
    push_options(&mut sms, request.options());

    let entries = vec![
        (
            ApiKey::FIELD.to_owned(),
            XmlValue::text(credentials.key().as_str()),
        ),
        (
            ApiPassword::FIELD.to_owned(),
            XmlValue::text(credentials.password().as_str()),
        ),
        ("sms".to_owned(), XmlValue::Map(sms)),
    ];

    map_to_element(ROOT_ELEMENT, &entries).to_document()
}

fn recipients_value(recipients: &[RawPhoneNumber]) -> XmlValue {
    XmlValue::Repeated(
        recipients
            .iter()
            .map(|to| to.raw().to_owned())
            .collect(),
    )
}

fn push_options(entries: &mut Vec<(String, XmlValue)>, options: &SendOptions) {
    if let Some(date) = options.date {
        entries.push((
            UnixTimestamp::FIELD.to_owned(),
            XmlValue::text(date.value().to_string()),
        ));
    }
    if let Some(clear_polish) = &options.clear_polish {
        entries.push(("clear_polish".to_owned(), XmlValue::text(clear_polish.as_str())));
    }
    if let Some(test) = &options.test {
        entries.push(("test".to_owned(), XmlValue::text(test.as_str())));
    }
}
