use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::Result;
use crate::error::{ApiError, AuthError, ConfigError, Error, ProtocolError, TransportError};

use super::decode::RpcResult;
use super::rpc::{self, RpcRequest};
use super::session::Session;

const CORRELATION_HEADER: &str = "x-correlation-id";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const LOGIN_METHOD: &str = "user.login";
const LOGOUT_METHOD: &str = "user.logout";
const VERSION_METHOD: &str = "apiinfo.version";

/// Methods the server insists on receiving without an `auth` member.
const NO_AUTH_METHODS: &[&str] = &[LOGIN_METHOD, VERSION_METHOD];

/// Typed client for one Zabbix JSON-RPC endpoint. Cheap to clone; clones
/// share the session (token and request counter).
#[derive(Clone)]
pub struct ZbxClient {
    http: reqwest::Client,
    session: Arc<Session>,
}

pub struct ZbxClientBuilder {
    base: Url,
    timeout: Duration,
    connect_timeout: Duration,
    token: Option<SecretString>,
    insecure_http: bool,
}

impl ZbxClientBuilder {
    fn new(base: Url) -> Self {
        Self {
            base,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            token: None,
            insecure_http: false,
        }
    }

    /// Overall deadline for one request/response exchange.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Preset API token; calls carry it immediately and the `user.login`
    /// handshake is skipped.
    #[must_use]
    pub fn token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Accept plain-http endpoints (local test servers).
    #[must_use]
    pub fn insecure_http(mut self, insecure_http: bool) -> Self {
        self.insecure_http = insecure_http;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not HTTPS while `insecure_http`
    /// is unset, or if the underlying HTTP client fails to build.
    pub fn build(self) -> Result<ZbxClient> {
        if self.base.scheme() != "https" && !self.insecure_http {
            return Err(ConfigError::InvalidField {
                field: "base_url",
                message: "only https URLs are accepted without insecure_http".to_string(),
            }
            .into());
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json-rpc"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(concat!("zbx-api/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(30));

        if !self.insecure_http {
            builder = builder.https_only(true);
        }

        let http = builder
            .build()
            .map_err(|err| TransportError::Client { source: err })?;

        Ok(ZbxClient {
            http,
            session: Arc::new(Session::new(self.base, self.token)),
        })
    }
}

impl ZbxClient {
    /// Client for `base` with default timeouts and no token.
    ///
    /// # Errors
    ///
    /// See [`ZbxClientBuilder::build`].
    pub fn new(base: Url) -> Result<Self> {
        Self::builder(base).build()
    }

    #[must_use]
    pub fn builder(base: Url) -> ZbxClientBuilder {
        ZbxClientBuilder::new(base)
    }

    /// Whether a session token (from `login` or a preset API token) is
    /// currently held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.has_token()
    }

    /// Perform one JSON-RPC call: exactly one network round trip, no
    /// hidden retries. The request id is consumed even when the call
    /// fails, so id gaps after errors are expected.
    ///
    /// # Errors
    ///
    /// `TransportError` for network, HTTP-status and timeout failures,
    /// `ProtocolError` for malformed envelopes or a bad id echo, and
    /// `ApiError` when the server answers with an `error` member.
    pub async fn call(&self, method: &str, params: Value) -> Result<RpcResult> {
        let id = self.session.next_id();
        let token = if NO_AUTH_METHODS.contains(&method) {
            None
        } else {
            self.session.token()
        };
        let correlation_id = Uuid::now_v7().to_string();
        let started = Instant::now();

        let payload = RpcRequest::new(
            method,
            &params,
            id,
            token.as_ref().map(|token| token.expose_secret()),
        );
        let response = self
            .http
            .post(self.session.base().clone())
            .header(CORRELATION_HEADER, &correlation_id)
            .json(&payload)
            .send()
            .await
            .map_err(TransportError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus { status }.into());
        }

        let body = response.bytes().await.map_err(TransportError::from)?;
        let envelope = rpc::decode_envelope(&body)?;

        if let Some(err) = envelope.error {
            let err = ApiError::from(err);
            debug!(method, %correlation_id, id, code = err.code, "zabbix call failed");
            return Err(err.into());
        }

        let Some(result) = envelope.result else {
            return Err(ProtocolError::EmptyEnvelope.into());
        };
        match envelope.id {
            Some(ref echoed) if rpc::id_matches(echoed, id) => {}
            other => {
                return Err(ProtocolError::IdMismatch {
                    sent: id,
                    got: other.map_or_else(|| "<absent>".to_string(), |v| v.to_string()),
                }
                .into());
            }
        }

        debug!(
            method,
            %correlation_id,
            id,
            latency_ms = started.elapsed().as_millis() as u64,
            "zabbix call succeeded"
        );
        Ok(RpcResult::classify(result))
    }

    /// Exchange credentials for a session token and store it for all
    /// subsequent calls.
    ///
    /// # Errors
    ///
    /// [`AuthError::Rejected`] when the server refuses the credentials;
    /// otherwise whatever the underlying call surfaces.
    pub async fn login(&self, user: &str, password: &str) -> Result<SecretString> {
        let params = json!({ "user": user, "password": password });
        let result = match self.call(LOGIN_METHOD, params).await {
            Err(Error::Api(source)) => return Err(AuthError::Rejected { source }.into()),
            other => other?,
        };
        let token = SecretString::from(result.into_scalar_string()?);
        self.session.set_token(token.clone());
        debug!("session established");
        Ok(token)
    }

    /// End the session. The stored token is cleared on success regardless
    /// of prior state; a second logout surfaces the server's error, which
    /// callers may ignore.
    ///
    /// # Errors
    ///
    /// Any error from the underlying `user.logout` call.
    pub async fn logout(&self) -> Result<()> {
        let _ = self.call(LOGOUT_METHOD, json!([])).await?;
        self.session.clear_token();
        Ok(())
    }

    /// Server API version, available without authentication.
    ///
    /// # Errors
    ///
    /// Any error from the underlying `apiinfo.version` call.
    pub async fn api_version(&self) -> Result<String> {
        self.call(VERSION_METHOD, json!([])).await?.into_scalar_string()
    }
}
