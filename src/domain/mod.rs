//! Domain layer: strong types with validation and invariants (no I/O).

mod datetime;
mod params;
mod request;
mod response;
mod validation;
mod value;

pub use datetime::{DATETIME_FORMAT, normalize_datetime, parse_datetime, to_unix_timestamp};
pub use params::{ArgValue, DATE_KEY, ParamSet, RequestArgs, validate};
pub use request::{
    Credentials, MMS_PARAMS, SIMPLE_SMS_PARAMS, SMS_PARAMS, SendMms, SendOptions, SendSimpleSms,
    SendSms,
};
pub use response::{RESULT_ERROR, ReportFields, ResponseDocument, StatusReport};
pub use validation::ValidationError;
pub use value::{
    ApiKey, ApiPassword, Attachment, MessageId, MessageText, PhoneNumber, Product,
    RawPhoneNumber, SenderName, Title, UnixTimestamp,
};
