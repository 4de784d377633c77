use super::AuthStore;
use crate::envelope::ResponseEnvelope;
use crate::transport::{HttpTransport, TransportError};
use crate::{Error, Result};
use serde::Serialize;
use tracing::{debug, warn};

pub const LOGIN_PATH: &str = "/api/user/login";

const LOGIN_FAILED: &str = "Login failed";

/// Username/password pair. Serialized form-url-encoded, in this field order.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl AuthStore {
    /// Submit credentials to the login endpoint.
    ///
    /// The backend's login route takes `application/x-www-form-urlencoded`,
    /// not JSON, so this bypasses [`HttpTransport::dispatch`] and only borrows
    /// its client and origin. Resolves only for status 200 with code 0; any
    /// other combination is a [`Error::Business`] carrying the raw envelope.
    /// A rejected login never tears the session down.
    pub async fn login(
        &self,
        transport: &HttpTransport,
        credentials: &Credentials,
    ) -> Result<ResponseEnvelope> {
        let timeout = transport.default_timeout();
        debug!(username = %credentials.username, "login");

        let response = transport
            .http()
            .post(transport.url(LOGIN_PATH))
            .form(credentials)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, timeout))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(e, timeout))?;
        let envelope: ResponseEnvelope = serde_json::from_str(&text).map_err(|e| {
            warn!(status, error = %e, "login response is not an envelope");
            TransportError::MalformedBody(e.to_string())
        })?;

        if status == 200 && envelope.is_strict_success() {
            Ok(envelope)
        } else {
            Err(Error::business(envelope, LOGIN_FAILED))
        }
    }

    /// [`AuthStore::login`], then persist `data.access_token` and `data.user`.
    pub async fn login_and_store(
        &self,
        transport: &HttpTransport,
        credentials: &Credentials,
    ) -> Result<ResponseEnvelope> {
        let envelope = self.login(transport, credentials).await?;
        let token = envelope
            .data
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::ResponseParse {
                message: "login response carries no access_token".to_string(),
            })?;
        self.save_session(token, envelope.data.get("user"))?;
        Ok(envelope)
    }
}
