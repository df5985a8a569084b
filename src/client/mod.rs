//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::domain::{
    Credentials, MessageId, Product, ResponseDocument, SendMms, SendSimpleSms, SendSms,
    StatusReport, ValidationError,
};
use crate::transport;

const DEFAULT_BASE_URL: &str = "https://api.smsplanet.pl/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SEND_PATH: &str = "send";
const XML_PATH: &str = "";
const SENDER_FIELDS_PATH: &str = "senderFields";
const BALANCE_PATH: &str = "getBalance";
const CANCEL_MESSAGE_PATH: &str = "cancelMessage";
const MESSAGE_STATUS_PATH: &str = "getMessageStatus";

/// Future returned by [`HttpTransport`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
/// Error type produced by [`HttpTransport`] implementations.
pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw HTTP answer: status code and body text.
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP capability used by [`SmsPlanetClient`].
///
/// The default implementation is backed by `reqwest`; plug in another one with
/// [`SmsPlanetClientBuilder::transport`]. `url` is always absolute.
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    /// Send a GET request with `query` appended to `url`, in order.
    fn get<'a>(
        &'a self,
        url: &'a str,
        query: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;

    /// Send a POST request with `params` as an url-encoded form body.
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        url: &'a str,
        query: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let mut url = Url::parse(url)?;
            url.query_pairs_mut().extend_pairs(query);
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }

    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsPlanetClient`].
///
/// None of these are retried by the client.
pub enum SmsPlanetError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The configured base URL cannot be joined with an endpoint path.
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The gateway answered with `result = ERROR`.
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The XML request body could not be written.
    #[error("failed to encode request: {0}")]
    Encode(#[source] BoxError),

    /// Response body could not be decoded (XML, JSON, status report or balance).
    #[error("malformed response: {0}")]
    MalformedResponse(#[source] BoxError),

    /// A field the operation relies on is absent from the response.
    #[error("response is missing field `{0}`")]
    MissingField(&'static str),

    /// Request arguments were rejected before anything was sent.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl SmsPlanetError {
    fn malformed(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::MalformedResponse(Box::new(err))
    }

    fn encode(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Encode(Box::new(err))
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SmsPlanetClient`].
///
/// Use this when you need to customize the endpoint, timeout, user-agent or
/// the HTTP transport itself.
pub struct SmsPlanetClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl SmsPlanetClientBuilder {
    /// Create a builder with the production endpoint and a 30 second timeout.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            transport: None,
        }
    }

    /// Override the API base URL; endpoint paths are resolved against it.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom HTTP transport instead of the built-in `reqwest` one.
    ///
    /// Timeout and user-agent settings only apply to the built-in transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build a [`SmsPlanetClient`].
    pub fn build(self) -> Result<SmsPlanetClient, SmsPlanetError> {
        let mut base_url = self.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Url::parse(&base_url)?;

        let http: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(reqwest_transport(self.timeout, self.user_agent)?),
        };

        Ok(SmsPlanetClient {
            credentials: self.credentials,
            base_url,
            http,
        })
    }
}

fn reqwest_transport(
    timeout: Duration,
    user_agent: Option<String>,
) -> Result<ReqwestTransport, SmsPlanetError> {
    let mut builder = reqwest::Client::builder().timeout(timeout);
    if let Some(user_agent) = user_agent {
        builder = builder.user_agent(user_agent);
    }

    let client = builder
        .build()
        .map_err(|err| SmsPlanetError::Transport(Box::new(err)))?;
    Ok(ReqwestTransport { client })
}

#[derive(Clone)]
/// High-level SMSPLANET client.
///
/// This type orchestrates request encoding, the HTTP call and response decoding.
/// Requests carry their own recipients, so one client can serve concurrent sends.
pub struct SmsPlanetClient {
    credentials: Credentials,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl SmsPlanetClient {
    /// Create a client using the default endpoint and timeout.
    ///
    /// For more customization, use [`SmsPlanetClient::builder`].
    pub fn new(credentials: Credentials) -> Result<Self, SmsPlanetError> {
        SmsPlanetClientBuilder::new(credentials).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> SmsPlanetClientBuilder {
        SmsPlanetClientBuilder::new(credentials)
    }

    /// Send an SMS through the `send` GET endpoint.
    ///
    /// Returns the gateway message id, or `None` when the response carries no positive id.
    ///
    /// Errors:
    /// - [`SmsPlanetError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`SmsPlanetError::Api`] when the gateway reports `ERROR`.
    pub async fn send_simple_sms(
        &self,
        request: SendSimpleSms,
    ) -> Result<Option<MessageId>, SmsPlanetError> {
        let query = transport::encode_simple_sms_query(&self.credentials, &request);
        let url = self.endpoint(SEND_PATH)?;
        debug!(
            operation = "send_simple_sms",
            endpoint = %url,
            recipients = request.recipients().len(),
            "sending request"
        );

        let response = self
            .http
            .get(url.as_str(), query)
            .await
            .map_err(SmsPlanetError::Transport)?;
        let body = ensure_success(response)?;
        Ok(Self::parse_response(&body)?.message_id())
    }

    /// Send an SMS as an XML document.
    pub async fn send_sms(&self, request: SendSms) -> Result<Option<MessageId>, SmsPlanetError> {
        let body = transport::build_sms_body(&self.credentials, &request)
            .map_err(SmsPlanetError::encode)?;
        self.send_xml("send_sms", body).await
    }

    /// Send an MMS as an XML document.
    pub async fn send_mms(&self, request: SendMms) -> Result<Option<MessageId>, SmsPlanetError> {
        let body = transport::build_mms_body(&self.credentials, &request)
            .map_err(SmsPlanetError::encode)?;
        self.send_xml("send_mms", body).await
    }

    /// List sender fields registered for `product`; the JSON body is returned as-is.
    pub async fn get_sender_fields(
        &self,
        product: Product,
    ) -> Result<serde_json::Value, SmsPlanetError> {
        let params = transport::encode_product_form(&self.credentials, product);
        let body = self
            .post("get_sender_fields", SENDER_FIELDS_PATH, params)
            .await?;
        transport::decode_sender_fields_json_response(&body).map_err(SmsPlanetError::malformed)
    }

    /// Remaining balance for `product`.
    pub async fn get_balance(&self, product: Product) -> Result<i64, SmsPlanetError> {
        let params = transport::encode_product_form(&self.credentials, product);
        let body = self.post("get_balance", BALANCE_PATH, params).await?;
        transport::decode_balance_response(&body).map_err(SmsPlanetError::malformed)
    }

    /// Cancel a scheduled message.
    pub async fn cancel_message(&self, id: MessageId) -> Result<ResponseDocument, SmsPlanetError> {
        let params = transport::encode_message_form(&self.credentials, id);
        let body = self
            .post("cancel_message", CANCEL_MESSAGE_PATH, params)
            .await?;
        Self::parse_response(&body)
    }

    /// Delivery-status report for a sent message.
    pub async fn get_message_status(&self, id: MessageId) -> Result<StatusReport, SmsPlanetError> {
        let params = transport::encode_message_form(&self.credentials, id);
        let body = self
            .post("get_message_status", MESSAGE_STATUS_PATH, params)
            .await?;
        let document = Self::parse_response(&body)?;
        let report = document
            .result_message()
            .ok_or(SmsPlanetError::MissingField("resultMessage"))?;
        transport::parse_status_report(report).map_err(SmsPlanetError::malformed)
    }

    /// Decode an XML response and turn `result = ERROR` into [`SmsPlanetError::Api`].
    pub fn parse_response(content: &str) -> Result<ResponseDocument, SmsPlanetError> {
        let document = transport::decode_response(content).map_err(SmsPlanetError::malformed)?;

        if document.is_error() {
            let code = document.error_code();
            let message = document.error_msg().unwrap_or_default().to_owned();
            warn!(code, message = %message, "gateway reported an error");
            return Err(SmsPlanetError::Api { code, message });
        }

        Ok(document)
    }

    async fn send_xml(
        &self,
        operation: &'static str,
        body: String,
    ) -> Result<Option<MessageId>, SmsPlanetError> {
        let params = transport::encode_xml_form(body);
        let body = self.post(operation, XML_PATH, params).await?;
        Ok(Self::parse_response(&body)?.message_id())
    }

    async fn post(
        &self,
        operation: &'static str,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<String, SmsPlanetError> {
        let url = self.endpoint(path)?;
        debug!(operation, endpoint = %url, "sending request");

        let response = self
            .http
            .post_form(url.as_str(), params)
            .await
            .map_err(SmsPlanetError::Transport)?;
        ensure_success(response)
    }

    fn endpoint(&self, path: &str) -> Result<Url, SmsPlanetError> {
        Ok(Url::parse(&self.base_url)?.join(path)?)
    }
}

fn ensure_success(response: HttpResponse) -> Result<String, SmsPlanetError> {
    if (200..=299).contains(&response.status) {
        return Ok(response.body);
    }

    warn!(status = response.status, "unexpected HTTP status");
    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    Err(SmsPlanetError::HttpStatus {
        status: response.status,
        body,
    })
}
