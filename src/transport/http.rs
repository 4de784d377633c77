use crate::auth::AuthStore;
use crate::classify::{classify, ClassifiedOutcome};
use crate::config::ClientConfig;
use crate::envelope::ResponseEnvelope;
use crate::transport::{join_url, RequestSpec, TransportError};
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Proxy;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Notice shown for a business failure whose envelope has no message.
pub const REQUEST_FAILED_NOTICE: &str = "Request failed";

const REQUEST_ID_HEADER: &str = "x-kb-request-id";

/// Unified JSON dispatcher.
///
/// Every call re-reads the token from the [`AuthStore`], so a logout from
/// another code path is seen by the very next request.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    default_timeout: Duration,
    auth: Arc<AuthStore>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, auth: Arc<AuthStore>) -> Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config, auth))
    }

    pub fn with_client(client: reqwest::Client, config: &ClientConfig, auth: Arc<AuthStore>) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_timeout: config.request_timeout,
            auth,
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Issue a JSON request and resolve it according to [`classify`].
    ///
    /// A 401 tears the session down before the error is returned, so the
    /// caller's error handling already runs against a forgotten session.
    pub async fn dispatch(&self, spec: RequestSpec) -> Result<ResponseEnvelope> {
        let request_id = Uuid::new_v4().to_string();
        debug!(
            request_id = %request_id,
            method = spec.method.as_str(),
            path = %spec.path,
            timeout_ms = spec.timeout.as_millis() as u64,
            "dispatch"
        );

        match self.execute(&spec, &request_id).await {
            ClassifiedOutcome::Success(envelope) => Ok(envelope),
            ClassifiedOutcome::BusinessFailure(envelope) => {
                let err = Error::business(envelope, REQUEST_FAILED_NOTICE);
                if let Error::Business { message, .. } = &err {
                    self.auth.host().notify(message);
                }
                Err(err)
            }
            ClassifiedOutcome::AuthExpired => {
                warn!(request_id = %request_id, path = %spec.path, "session expired");
                // The redirect task runs detached; nothing awaits it here.
                let _ = self.auth.teardown();
                Err(Error::AuthExpired)
            }
            ClassifiedOutcome::TransportFailure(err) => {
                warn!(request_id = %request_id, path = %spec.path, error = %err, "request failed");
                Err(Error::Transport(err))
            }
        }
    }

    pub async fn get(&self, path: impl Into<String>) -> Result<ResponseEnvelope> {
        self.dispatch(self.spec(RequestSpec::get(path))).await
    }

    pub async fn get_with(&self, path: impl Into<String>, query: Value) -> Result<ResponseEnvelope> {
        self.dispatch(self.spec(RequestSpec::get(path)).payload(query))
            .await
    }

    pub async fn post(&self, path: impl Into<String>, payload: Value) -> Result<ResponseEnvelope> {
        self.dispatch(self.spec(RequestSpec::post(path)).payload(payload))
            .await
    }

    pub async fn put(&self, path: impl Into<String>, payload: Value) -> Result<ResponseEnvelope> {
        self.dispatch(self.spec(RequestSpec::put(path)).payload(payload))
            .await
    }

    pub async fn delete(&self, path: impl Into<String>) -> Result<ResponseEnvelope> {
        self.dispatch(self.spec(RequestSpec::delete(path))).await
    }

    fn spec(&self, spec: RequestSpec) -> RequestSpec {
        spec.timeout(self.default_timeout)
    }

    async fn execute(&self, spec: &RequestSpec, request_id: &str) -> ClassifiedOutcome {
        let request = match self.build(spec, request_id) {
            Ok(r) => r,
            Err(e) => return classify(0, None, Some(e)),
        };

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => return classify(0, None, Some(TransportError::from_reqwest(e, spec.timeout))),
        };

        let status = response.status().as_u16();
        if status != 200 {
            return classify(status, None, None);
        }

        let (body, err) = match response.text().await {
            Ok(text) => match serde_json::from_str::<ResponseEnvelope>(&text) {
                Ok(envelope) => (Some(envelope), None),
                Err(e) => (None, Some(TransportError::MalformedBody(e.to_string()))),
            },
            Err(e) => (None, Some(TransportError::from_reqwest(e, spec.timeout))),
        };
        classify(status, body, err)
    }

    fn build(&self, spec: &RequestSpec, request_id: &str) -> std::result::Result<reqwest::RequestBuilder, TransportError> {
        let url = self.url(&spec.path);
        let mut request = self
            .client
            .request(spec.method.into(), &url)
            .headers(self.headers(spec, request_id))
            .timeout(spec.timeout);

        match spec.method {
            crate::transport::Method::Get => {
                let query = spec.query_pairs();
                if !query.is_empty() {
                    request = request.query(&query);
                }
            }
            _ => {
                if let Some(payload) = &spec.payload {
                    let body = serde_json::to_vec(payload).map_err(|e| TransportError::Other(e.to_string()))?;
                    request = request.body(body);
                }
            }
        }
        Ok(request)
    }

    fn headers(&self, spec: &RequestSpec, request_id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(v) = HeaderValue::from_str(request_id) {
            headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), v);
        }

        for (name, value) in &spec.extra_headers {
            let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) else {
                warn!(header = %name, "skipping invalid header");
                continue;
            };
            if name == AUTHORIZATION {
                debug!("ignoring caller-supplied authorization header");
                continue;
            }
            headers.insert(name, value);
        }

        if let Some(token) = self.auth.token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(v) => {
                    headers.insert(AUTHORIZATION, v);
                }
                Err(_) => warn!("stored token is not a valid header value"),
            }
        }
        headers
    }
}

/// Shared reqwest client: pooling, keepalive and optional proxy from config.
pub(crate) fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(Some(Duration::from_secs(90)));

    if let Some(proxy_url) = &config.proxy_url {
        let proxy = Proxy::all(proxy_url)
            .map_err(|e| Error::configuration(format!("invalid proxy url: {}", e)))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))
}
