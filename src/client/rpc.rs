use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ProtocolError};

pub(crate) const JSONRPC_VERSION: &str = "2.0";
const BODY_PREVIEW_LIMIT: usize = 256;

/// Outbound JSON-RPC envelope. `auth` is left out entirely when no token
/// is held or when the method belongs to the unauthenticated set.
#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    pub(crate) jsonrpc: &'static str,
    pub(crate) method: &'a str,
    pub(crate) params: &'a Value,
    pub(crate) id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) auth: Option<&'a str>,
}

impl<'a> RpcRequest<'a> {
    pub(crate) fn new(method: &'a str, params: &'a Value, id: u64, auth: Option<&'a str>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id,
            auth,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcEnvelope {
    #[allow(dead_code)]
    pub(crate) jsonrpc: Option<String>,
    pub(crate) result: Option<Value>,
    pub(crate) error: Option<WireError>,
    pub(crate) id: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    pub(crate) code: i64,
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) data: Option<String>,
}

impl From<WireError> for ApiError {
    fn from(err: WireError) -> Self {
        Self {
            code: err.code,
            message: err.message,
            data: err.data,
        }
    }
}

/// Parse a response body into an envelope carrying `result` or `error`.
pub(crate) fn decode_envelope(body: &[u8]) -> Result<RpcEnvelope, ProtocolError> {
    let envelope: RpcEnvelope =
        serde_json::from_slice(body).map_err(|err| ProtocolError::Json {
            message: format!(
                "error decoding response body: {err}; body preview: {}",
                body_preview(body)
            ),
        })?;
    if envelope.result.is_none() && envelope.error.is_none() {
        return Err(ProtocolError::EmptyEnvelope);
    }
    Ok(envelope)
}

/// Whether the echoed envelope id matches the id we sent. Servers echo it
/// back as a number or, on some versions, its string form.
pub(crate) fn id_matches(echoed: &Value, sent: u64) -> bool {
    match echoed {
        Value::Number(n) => n.as_u64() == Some(sent),
        Value::String(s) => s.parse::<u64>() == Ok(sent),
        _ => false,
    }
}

pub(crate) fn body_preview(body: &[u8]) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }
    let end = body.len().min(BODY_PREVIEW_LIMIT);
    let mut preview = String::from_utf8_lossy(&body[..end]).to_string();
    if body.len() > BODY_PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview.replace('\n', "\\n")
}
