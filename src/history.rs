use serde::Deserialize;
use serde_json::{Value, json};

use crate::Result;
use crate::client::{ZbxClient, ensure_param};
use crate::serde_util::{deserialize_i64, deserialize_u64};

/// One history sample. Values always come back as strings; the log
/// fields are only present for log-type items.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct History {
    #[serde(default, deserialize_with = "deserialize_u64")]
    pub clock: u64,
    #[serde(default, rename = "itemid")]
    pub item_id: String,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub ns: i64,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "logeventid", deserialize_with = "deserialize_i64")]
    pub log_event_id: i64,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub severity: i64,
    #[serde(default)]
    pub source: String,
    #[serde(default, deserialize_with = "deserialize_u64")]
    pub timestamp: u64,
}

impl ZbxClient {
    /// Wrapper for `history.get`. Injects `output = "extend"` when
    /// absent; the caller picks the value type via the `history` param.
    ///
    /// # Errors
    ///
    /// Any error surfaced by the underlying call or record decoding.
    pub async fn histories(&self, params: Value) -> Result<Vec<History>> {
        let mut params = params;
        ensure_param(&mut params, "output", json!("extend"));
        self.call("history.get", params).await?.into_records()
    }
}
