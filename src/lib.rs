//! Typed Rust client for the SMSPLANET HTTP/XML API.
//!
//! The crate is split into a domain layer of strong types (argument validation,
//! typed requests, decoded responses), a transport layer for the wire formats
//! (XML request bodies, XML responses, the delivery-status report) and a small
//! client layer orchestrating requests over HTTP.
//!
//! ```rust,no_run
//! use smsplanet::{Credentials, RequestArgs, SendSms, SmsPlanetClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smsplanet::SmsPlanetError> {
//!     let client = SmsPlanetClient::new(Credentials::new("key", "password")?)?;
//!     let request = SendSms::try_from(
//!         RequestArgs::new()
//!             .with("from", "TEST")
//!             .with("msg", "hello")
//!             .with("to", ["48500600700"]),
//!     )?;
//!     let _message_id = client.send_sms(request).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    BoxError, BoxFuture, HttpResponse, HttpTransport, SmsPlanetClient, SmsPlanetClientBuilder,
    SmsPlanetError,
};
pub use domain::{
    ArgValue, Attachment, Credentials, MessageId, MessageText, PhoneNumber, Product,
    RawPhoneNumber, ReportFields, RequestArgs, ResponseDocument, SendMms, SendOptions,
    SendSimpleSms, SendSms, SenderName, StatusReport, Title, UnixTimestamp, ValidationError,
};
