//! HTTP client implementation for the IG dealing gateway.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::auth::{Credentials, Session};
use crate::models::{ApiVersion, Environment, SessionInfo};
use crate::streaming::StreamingBridge;
use crate::{Error, Result};

use super::config::ClientConfig;

pub(crate) const VERSION_HEADER: HeaderName = HeaderName::from_static("version");
pub(crate) const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-ig-api-key");
const METHOD_OVERRIDE_HEADER: HeaderName = HeaderName::from_static("_method");

/// Headers sent with every gateway request: content negotiation plus the
/// account's API key.
pub(crate) fn base_headers(credentials: &Credentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=UTF-8"),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json; charset=UTF-8"),
    );
    headers.insert(
        API_KEY_HEADER,
        HeaderValue::from_str(credentials.api_key())
            .map_err(|_| Error::InvalidInput("API key is not header-safe".into()))?,
    );
    Ok(headers)
}

/// Request payload for [`IgClient::request`].
///
/// `Json` carries a structured value: for GET requests its object
/// entries become query parameters, for every other method it is
/// serialized into the request body. `Raw` passes a pre-serialized body
/// through unmodified.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    /// No payload.
    #[default]
    None,
    /// Structured payload; query parameters for GET, JSON body otherwise.
    Json(Value),
    /// Pre-serialized body, sent as-is.
    Raw(String),
}

impl Payload {
    /// Serialize any `Serialize` value into a JSON payload.
    pub fn json(value: impl Serialize) -> Result<Self> {
        Ok(Payload::Json(serde_json::to_value(value)?))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(raw: String) -> Self {
        Payload::Raw(raw)
    }
}

impl From<&str> for Payload {
    fn from(raw: &str) -> Self {
        Payload::Raw(raw.to_string())
    }
}

/// The main client for the IG REST and streaming APIs.
///
/// Requests go through a single signing path that injects the API key,
/// the per-call `Version` header and, for authenticated calls, the
/// OAuth authorization headers. Responses come back unmodified; status
/// interpretation is the caller's concern.
///
/// # Example
///
/// ```no_run
/// use ig_markets_rs::{ApiVersion, Credentials, Environment, IgClient, Payload};
/// use reqwest::header::HeaderMap;
/// use reqwest::Method;
/// use serde_json::json;
///
/// # async fn example() -> ig_markets_rs::Result<()> {
/// let client = IgClient::new(
///     Credentials::new("api-key", "identifier", "password"),
///     Environment::Demo,
/// )?;
///
/// let response = client
///     .request(
///         ApiVersion::V1,
///         Method::GET,
///         "/markets",
///         Payload::Json(json!({ "searchTerm": "EURUSD" })),
///         HeaderMap::new(),
///         true,
///     )
///     .await?;
/// println!("status: {}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct IgClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) session: Session,
    pub(crate) credentials: Credentials,
    pub(crate) env: Environment,
    pub(crate) gateway_url: String,
    pub(crate) config: ClientConfig,
}

impl IgClient {
    /// Create a client with default configuration. No network traffic
    /// happens until the first request or an explicit login.
    pub fn new(credentials: Credentials, env: Environment) -> Result<Self> {
        Self::with_config(credentials, env, ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(
        credentials: Credentials,
        env: Environment,
        config: ClientConfig,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let gateway_url = config
            .gateway_url
            .clone()
            .unwrap_or_else(|| env.gateway_url());
        let session = Session::new(credentials.clone(), gateway_url.clone(), http.clone());

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                session,
                credentials,
                env,
                gateway_url,
                config,
            }),
        })
    }

    /// Log in from scratch, replacing any existing session.
    pub async fn login(&self) -> Result<SessionInfo> {
        self.inner.session.login().await
    }

    /// Make sure a usable token set exists, refreshing or logging in as
    /// needed.
    pub async fn ensure_authenticated(&self) -> Result<()> {
        self.inner.session.ensure_authenticated().await
    }

    /// Perform a gateway request.
    ///
    /// With `requires_auth`, authentication fully settles before the
    /// authorization headers are computed, and those headers override
    /// caller-supplied headers of the same name. DELETE is tunneled
    /// through POST with a `_method` marker; callers see no difference.
    pub async fn request(
        &self,
        version: ApiVersion,
        method: Method,
        path: &str,
        payload: Payload,
        headers: HeaderMap,
        requires_auth: bool,
    ) -> Result<reqwest::Response> {
        self.inner
            .request(version, method, path, payload, headers, requires_auth)
            .await
    }

    /// Get the streaming bridge.
    pub fn streaming(&self) -> StreamingBridge {
        StreamingBridge::new(self.inner.clone())
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Get the environment this client talks to.
    pub fn environment(&self) -> Environment {
        self.inner.env
    }
}

impl ClientInner {
    pub(crate) async fn request(
        &self,
        version: ApiVersion,
        method: Method,
        path: &str,
        payload: Payload,
        extra: HeaderMap,
        requires_auth: bool,
    ) -> Result<reqwest::Response> {
        let auth = if requires_auth {
            self.session.ensure_authenticated().await?;
            Some(self.session.auth_headers().await?)
        } else {
            None
        };
        self.send(version, method, path, payload, extra, auth).await
    }

    /// Build and dispatch one gateway request. Header precedence, lowest
    /// to highest: base, caller-supplied, `Version`, auth.
    async fn send(
        &self,
        version: ApiVersion,
        method: Method,
        path: &str,
        payload: Payload,
        extra: HeaderMap,
        auth: Option<HeaderMap>,
    ) -> Result<reqwest::Response> {
        let mut url = Url::parse(&format!("{}{}", self.gateway_url, path))?;

        let mut headers = base_headers(&self.credentials)?;
        for (name, value) in extra.iter() {
            headers.insert(name, value.clone());
        }
        headers.insert(
            VERSION_HEADER,
            HeaderValue::from(u64::from(version.as_u8())),
        );
        if let Some(auth) = auth {
            for (name, value) in auth.iter() {
                headers.insert(name, value.clone());
            }
        }

        let mut method = method;
        let mut body = None;
        if method == Method::GET {
            match payload {
                Payload::None | Payload::Json(Value::Null) => {}
                Payload::Json(Value::Object(map)) if !map.is_empty() => {
                    let mut pairs = url.query_pairs_mut();
                    for (key, value) in &map {
                        pairs.append_pair(key, &query_value(value));
                    }
                }
                Payload::Json(Value::Object(_)) => {}
                Payload::Json(_) => {
                    return Err(Error::InvalidInput(
                        "GET payload must be a JSON object".into(),
                    ))
                }
                Payload::Raw(_) => {
                    return Err(Error::InvalidInput(
                        "GET requests take query parameters, not a raw body".into(),
                    ))
                }
            }
        } else {
            body = match payload {
                Payload::None | Payload::Json(Value::Null) => None,
                Payload::Json(value) => Some(serde_json::to_string(&value)?),
                Payload::Raw(raw) => Some(raw),
            };
        }

        // The gateway rejects DELETE; tunnel it through POST.
        if method == Method::DELETE {
            method = Method::POST;
            headers.insert(METHOD_OVERRIDE_HEADER, HeaderValue::from_static("DELETE"));
        }

        let mut request = self.http.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }
        Ok(request.send().await?)
    }
}

/// Render a JSON value as a query-parameter string: strings stay bare,
/// everything else uses its canonical JSON form.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl std::fmt::Debug for IgClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IgClient")
            .field("env", &self.inner.env)
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_value_coercion() {
        assert_eq!(query_value(&json!("EURUSD")), "EURUSD");
        assert_eq!(query_value(&json!(5)), "5");
        assert_eq!(query_value(&json!(true)), "true");
        assert_eq!(query_value(&json!(1.5)), "1.5");
    }

    #[test]
    fn test_payload_conversions() {
        assert!(matches!(Payload::from(json!({"a": 1})), Payload::Json(_)));
        assert!(matches!(Payload::from("raw".to_string()), Payload::Raw(_)));
        assert!(matches!(Payload::default(), Payload::None));
    }

    #[test]
    fn test_payload_json_from_serialize() {
        #[derive(Serialize)]
        struct Body {
            size: u32,
        }
        let payload = Payload::json(Body { size: 3 }).unwrap();
        match payload {
            Payload::Json(value) => assert_eq!(value, json!({"size": 3})),
            _ => panic!("expected Json payload"),
        }
    }
}
