use crate::domain::params::{ArgValue, ParamSet, RequestArgs, validate};
use crate::domain::validation::ValidationError;
use crate::domain::value::{
    ApiKey, ApiPassword, Attachment, MessageText, RawPhoneNumber, SenderName, Title,
    UnixTimestamp,
};

/// Keys accepted by `send` (GET); all of them are required.
pub const SIMPLE_SMS_PARAMS: ParamSet = ParamSet {
    required: &["from", "msg", "to"],
    optional: &["from", "msg", "to"],
};

/// Keys accepted by the XML SMS endpoint.
pub const SMS_PARAMS: ParamSet = ParamSet {
    required: &["from", "msg", "to"],
    optional: &["from", "msg", "to", "date", "clear_polish", "test"],
};

/// Keys accepted by the XML MMS endpoint.
pub const MMS_PARAMS: ParamSet = ParamSet {
    required: &["from", "msg", "to"],
    optional: &[
        "from",
        "msg",
        "title",
        "to",
        "date",
        "attachments",
        "clear_polish",
        "test",
    ],
};

const CLEAR_POLISH_KEY: &str = "clear_polish";
const TEST_KEY: &str = "test";

#[derive(Debug, Clone, PartialEq, Eq)]
/// API credentials sent with every call.
pub struct Credentials {
    key: ApiKey,
    password: ApiPassword,
}

impl Credentials {
    pub fn new(key: impl Into<String>, password: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            key: ApiKey::new(key)?,
            password: ApiPassword::new(password)?,
        })
    }

    pub fn key(&self) -> &ApiKey {
        &self.key
    }

    pub fn password(&self) -> &ApiPassword {
        &self.password
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Optional knobs shared by the XML send endpoints.
///
/// `clear_polish` and `test` keep the caller's text: the SMS body forwards it
/// verbatim, the MMS body only cares whether `clear_polish` is present.
pub struct SendOptions {
    /// Scheduled send time.
    pub date: Option<UnixTimestamp>,
    /// Ask the gateway to strip Polish diacritics.
    pub clear_polish: Option<String>,
    /// Validate the message without sending it.
    pub test: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Plain SMS sent through the `send` GET endpoint.
pub struct SendSimpleSms {
    from: SenderName,
    msg: MessageText,
    recipients: Vec<RawPhoneNumber>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// SMS sent as an XML document.
pub struct SendSms {
    from: SenderName,
    msg: MessageText,
    recipients: Vec<RawPhoneNumber>,
    options: SendOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// MMS sent as an XML document.
pub struct SendMms {
    from: SenderName,
    msg: MessageText,
    recipients: Vec<RawPhoneNumber>,
    title: Option<Title>,
    attachments: Vec<Attachment>,
    options: SendOptions,
}

impl SendSimpleSms {
    pub fn new(
        from: SenderName,
        msg: MessageText,
        recipients: Vec<RawPhoneNumber>,
    ) -> Result<Self, ValidationError> {
        ensure_recipients(&recipients)?;
        Ok(Self {
            from,
            msg,
            recipients,
        })
    }

    pub fn sender(&self) -> &SenderName {
        &self.from
    }

    pub fn msg(&self) -> &MessageText {
        &self.msg
    }

    pub fn recipients(&self) -> &[RawPhoneNumber] {
        &self.recipients
    }
}

impl SendSms {
    pub fn new(
        from: SenderName,
        msg: MessageText,
        recipients: Vec<RawPhoneNumber>,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        ensure_recipients(&recipients)?;
        Ok(Self {
            from,
            msg,
            recipients,
            options,
        })
    }

    pub fn sender(&self) -> &SenderName {
        &self.from
    }

    pub fn msg(&self) -> &MessageText {
        &self.msg
    }

    pub fn recipients(&self) -> &[RawPhoneNumber] {
        &self.recipients
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

impl SendMms {
    pub fn new(
        from: SenderName,
        msg: MessageText,
        recipients: Vec<RawPhoneNumber>,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        ensure_recipients(&recipients)?;
        Ok(Self {
            from,
            msg,
            recipients,
            title: None,
            attachments: Vec::new(),
            options,
        })
    }

    pub fn with_title(mut self, title: Title) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn sender(&self) -> &SenderName {
        &self.from
    }

    pub fn msg(&self) -> &MessageText {
        &self.msg
    }

    pub fn recipients(&self) -> &[RawPhoneNumber] {
        &self.recipients
    }

    pub fn title(&self) -> Option<&Title> {
        self.title.as_ref()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

impl TryFrom<RequestArgs> for SendSimpleSms {
    type Error = ValidationError;

    fn try_from(args: RequestArgs) -> Result<Self, Self::Error> {
        let mut args = validate(args, &SIMPLE_SMS_PARAMS)?;
        let (from, msg) = take_sender_and_text(&mut args)?;
        let recipients = take_recipients(&mut args)?;
        Self::new(from, msg, recipients)
    }
}

impl TryFrom<RequestArgs> for SendSms {
    type Error = ValidationError;

    fn try_from(args: RequestArgs) -> Result<Self, Self::Error> {
        let mut args = validate(args, &SMS_PARAMS)?;
        let (from, msg) = take_sender_and_text(&mut args)?;
        let recipients = take_recipients(&mut args)?;
        let options = take_options(&mut args)?;
        Self::new(from, msg, recipients, options)
    }
}

impl TryFrom<RequestArgs> for SendMms {
    type Error = ValidationError;

    fn try_from(args: RequestArgs) -> Result<Self, Self::Error> {
        let mut args = validate(args, &MMS_PARAMS)?;
        let (from, msg) = take_sender_and_text(&mut args)?;
        let recipients = take_recipients(&mut args)?;
        let options = take_options(&mut args)?;
        let title = take_text(&mut args, Title::FIELD)?
            .map(Title::new)
            .transpose()?;
        let attachments = args
            .remove(Attachment::FIELD)
            .map(ArgValue::into_list)
            .unwrap_or_default()
            .into_iter()
            .map(Attachment::new)
            .collect::<Result<Vec<_>, _>>()?;

        let mut request = Self::new(from, msg, recipients, options)?.with_attachments(attachments);
        request.title = title;
        Ok(request)
    }
}

fn ensure_recipients(recipients: &[RawPhoneNumber]) -> Result<(), ValidationError> {
    if recipients.is_empty() {
        return Err(ValidationError::Empty {
            field: RawPhoneNumber::FIELD,
        });
    }
    Ok(())
}

fn take_text(args: &mut RequestArgs, key: &str) -> Result<Option<String>, ValidationError> {
    match args.remove(key) {
        None => Ok(None),
        Some(ArgValue::Text(value)) => Ok(Some(value)),
        Some(ArgValue::Number(value)) => Ok(Some(value.to_string())),
        Some(ArgValue::List(_)) => Err(ValidationError::InvalidValue {
            field: key.to_owned(),
            reason: "expected a single value",
        }),
    }
}

fn take_sender_and_text(
    args: &mut RequestArgs,
) -> Result<(SenderName, MessageText), ValidationError> {
    let from = take_text(args, SenderName::FIELD)?.unwrap_or_default();
    let msg = take_text(args, MessageText::FIELD)?.unwrap_or_default();
    Ok((SenderName::new(from)?, MessageText::new(msg)?))
}

fn take_recipients(args: &mut RequestArgs) -> Result<Vec<RawPhoneNumber>, ValidationError> {
    args.remove(RawPhoneNumber::FIELD)
        .map(ArgValue::into_list)
        .unwrap_or_default()
        .into_iter()
        .map(RawPhoneNumber::new)
        .collect()
}

fn take_options(args: &mut RequestArgs) -> Result<SendOptions, ValidationError> {
    // `validate` has already turned any date into a number.
    let date = match args.remove(UnixTimestamp::FIELD) {
        Some(ArgValue::Number(seconds)) => Some(UnixTimestamp::new(seconds)),
        Some(_) => {
            return Err(ValidationError::InvalidValue {
                field: UnixTimestamp::FIELD.to_owned(),
                reason: "expected a timestamp",
            });
        }
        None => None,
    };
    let clear_polish = take_text(args, CLEAR_POLISH_KEY)?;
    let test = take_text(args, TEST_KEY)?;

    Ok(SendOptions {
        date,
        clear_polish,
        test,
    })
}
