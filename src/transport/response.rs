use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::domain::ResponseDocument;

#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("invalid XML response: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML response is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("XML response has no root element")]
    MissingRoot,

    #[error("XML response ended inside an element")]
    UnexpectedEof,
}

/// Decode a gateway XML response into its root name and top-level fields.
///
/// Text and CDATA of each direct child of the root are concatenated; deeper
/// nesting is ignored.
pub fn decode_response(content: &str) -> Result<ResponseDocument, ResponseError> {
    let mut reader = Reader::from_str(content);
    let mut document = ResponseDocument::default();
    let mut depth = 0usize;
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                depth += 1;
                match depth {
                    1 => document.root = element_name(&start)?,
                    2 => current = Some((element_name(&start)?, String::new())),
                    _ => {}
                }
            }
            Event::Empty(start) => match depth {
                0 => document.root = element_name(&start)?,
                1 => {
                    document
                        .fields
                        .entry(element_name(&start)?)
                        .or_default();
                }
                _ => {}
            },
            Event::Text(text) if depth == 2 => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) if depth == 2 => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(std::str::from_utf8(&data)?);
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some((name, value)) = current.take() {
                        document.fields.entry(name).or_insert(value);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ResponseError::UnexpectedEof);
    }
    if document.root.is_empty() {
        return Err(ResponseError::MissingRoot);
    }
    Ok(document)
}

fn element_name(start: &BytesStart<'_>) -> Result<String, ResponseError> {
    Ok(std::str::from_utf8(start.name().as_ref())?.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_top_level_fields() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
  <result>OK</result>
  <messageId>12345</messageId>
  <empty/>
</result>"#;
        let document = decode_response(xml).unwrap();
        assert_eq!(document.root, "result");
        assert_eq!(document.result(), Some("OK"));
        assert_eq!(document.message_id().map(|id| id.value()), Some(12345));
        assert_eq!(document.get("empty"), Some(""));
    }

    #[test]
    fn decodes_error_fields_with_entities() {
        let xml = "<response><result>ERROR</result><errorCode>5</errorCode>\
                   <errorMsg>bad &amp; wrong key</errorMsg></response>";
        let document = decode_response(xml).unwrap();
        assert!(document.is_error());
        assert_eq!(document.error_code(), 5);
        assert_eq!(document.error_msg(), Some("bad & wrong key"));
    }

    #[test]
    fn keeps_cdata_and_newlines_verbatim() {
        let xml = "<response><result>OK</result>\
                   <resultMessage><![CDATA[a: b\n\n\nc;d]]></resultMessage></response>";
        let document = decode_response(xml).unwrap();
        assert_eq!(document.result_message(), Some("a: b\n\n\nc;d"));
    }

    #[test]
    fn first_occurrence_of_repeated_field_wins() {
        let xml = "<r><messageId>1</messageId><messageId>2</messageId></r>";
        let document = decode_response(xml).unwrap();
        assert_eq!(document.get("messageId"), Some("1"));
    }

    #[test]
    fn nested_elements_do_not_leak_into_fields() {
        let xml = "<r><outer><inner>x</inner></outer><result>OK</result></r>";
        let document = decode_response(xml).unwrap();
        assert_eq!(document.get("outer"), Some(""));
        assert_eq!(document.result(), Some("OK"));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(decode_response("").is_err());
        assert!(decode_response("not xml at all").is_err());
        assert!(decode_response("<r><result>OK</result>").is_err());
        assert!(decode_response("<r><a></b></r>").is_err());
    }

    #[test]
    fn round_trips_a_built_document() {
        let mut root = super::super::xml::XmlElement::new("result");
        root.add_text_element("result", "OK")
            .add_text_element("messageId", "77")
            .add_text_element("resultMessage", "Zażółć <gęślą>");
        let document = decode_response(&root.to_document().unwrap()).unwrap();

        assert_eq!(document.result(), Some("OK"));
        assert_eq!(document.message_id().map(|id| id.value()), Some(77));
        assert_eq!(document.result_message(), Some("Zażółć <gęślą>"));
    }
}
