use crate::domain::{
    ApiKey, ApiPassword, Attachment, Credentials, MessageText, RawPhoneNumber, SendMms,
    SenderName, Title, UnixTimestamp,
};

use super::send_sms::ROOT_ELEMENT;
use super::xml::{XmlElement, XmlWriteError};

/// MIME type sent for attachments whose extension is unknown.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// XML document for the MMS endpoint.
///
/// `mms` children are emitted in the order the gateway expects:
/// recipients, `from`, `title`, `msg`, `clear_polish`, `date`, `attachments`, `test`.
/// Any `clear_polish` value is sent as `1`; `test` is forwarded as given.
pub fn build_mms_body(
    credentials: &Credentials,
    request: &SendMms,
) -> Result<String, XmlWriteError> {
    let mut data = XmlElement::new(ROOT_ELEMENT);
    data.add_text_element(ApiKey::FIELD, credentials.key().as_str());
    data.add_text_element(ApiPassword::FIELD, credentials.password().as_str());

    let mms = data.add_element("mms");
    mms.add_repeated(
        RawPhoneNumber::FIELD,
        request.recipients().iter().map(RawPhoneNumber::raw),
    );
    mms.add_text_element(SenderName::FIELD, request.sender().as_str());
    if let Some(title) = request.title() {
        mms.add_text_element(Title::FIELD, title.as_str());
    }
    mms.add_text_element(MessageText::FIELD, request.msg().as_str());

    let options = request.options();
    if options.clear_polish.is_some() {
        mms.add_text_element("clear_polish", "1");
    }
    if let Some(date) = options.date {
        mms.add_text_element(UnixTimestamp::FIELD, date.value().to_string());
    }

    let attachments = mms.add_element(Attachment::FIELD);
    for (idx, attachment) in request.attachments().iter().enumerate() {
        attachments
            .add_element("att")
            .add_attribute("nr", (idx + 1).to_string())
            .add_attribute("link", attachment.link())
            .add_attribute("mimetype", mime_type_for(attachment.link()));
    }

    if let Some(test) = &options.test {
        mms.add_text_element("test", test.as_str());
    }

    data.to_document()
}

/// Guess a MIME type from the link's file extension.
pub fn mime_type_for(link: &str) -> String {
    mime_guess::from_path(link)
        .first()
        .map(|mime| mime.essence_str().to_owned())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_owned())
}
