//! The generic RPC layer every entity wrapper builds on: session state,
//! envelope codec, the single-round-trip caller and the heterogeneous
//! result decoder.

mod client;
mod compat;
mod decode;
mod rpc;
mod session;

pub use client::{ZbxClient, ZbxClientBuilder};
pub use decode::RpcResult;

pub(crate) use compat::wants_plain_id_fallback;
pub(crate) use decode::exactly_one;

use serde_json::Value;

/// Insert a defaulted parameter into an object-shaped parameter bag.
/// Explicit values and non-object bags are left untouched; this is the
/// only mutation the library applies to caller-supplied params.
pub(crate) fn ensure_param(params: &mut Value, key: &str, value: Value) {
    if let Value::Object(map) = params {
        map.entry(key).or_insert(value);
    }
}

/// Serialize a batch of records into the outbound parameter position.
pub(crate) fn encode_params<T>(records: T) -> crate::Result<Value>
where
    T: serde::Serialize,
{
    serde_json::to_value(records).map_err(|err| {
        crate::error::ProtocolError::Json {
            message: format!("error encoding request params: {err}"),
        }
        .into()
    })
}
