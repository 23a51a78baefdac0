use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::client::{ZbxClient, ensure_param, exactly_one};
use crate::serde_util::zbx_code_enum;

zbx_code_enum! {
    pub enum PriorityType {
        NotClassified = 0,
        Information = 1,
        Warning = 2,
        Average = 3,
        High = 4,
        Disaster = 5,
    }
}

zbx_code_enum! {
    /// Trigger/event value: OK or PROBLEM.
    pub enum ValueType {
        Ok = 0,
        Problem = 1,
    }
}

/// Trigger record. `hosts` is populated when the server is asked for it
/// via `selectHosts`; an absent collection decodes as empty.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Trigger {
    #[serde(default, rename = "triggerid", skip_serializing_if = "String::is_empty")]
    pub trigger_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expression: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<HostRef>,
    #[serde(default)]
    pub priority: PriorityType,
    #[serde(default)]
    pub value: ValueType,
}

/// Host reference attached to a trigger or maintenance window.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct HostRef {
    #[serde(default, rename = "hostid")]
    pub host_id: String,
    #[serde(default)]
    pub name: String,
}

impl ZbxClient {
    /// Wrapper for `trigger.get`. Defaults `output` and `selectHosts` to
    /// `"extend"` when absent.
    ///
    /// # Errors
    ///
    /// Any error surfaced by the underlying call or record decoding.
    pub async fn triggers(&self, params: Value) -> Result<Vec<Trigger>> {
        let mut params = params;
        ensure_param(&mut params, "output", json!("extend"));
        ensure_param(&mut params, "selectHosts", json!("extend"));
        self.call("trigger.get", params).await?.into_records()
    }

    /// Fetch a trigger by id; exactly one match is required.
    ///
    /// # Errors
    ///
    /// `Error::ExpectedOneResult` when zero or several triggers match.
    pub async fn trigger_by_id(&self, id: &str) -> Result<Trigger> {
        exactly_one(self.triggers(json!({ "triggerids": id })).await?)
    }

    /// Current problem triggers, the dashboard view: monitored hosts,
    /// value PROBLEM, last event unacknowledged, dependencies skipped.
    ///
    /// # Errors
    ///
    /// Any error surfaced by the underlying call or record decoding.
    pub async fn active_triggers(&self, params: Value) -> Result<Vec<Trigger>> {
        let mut params = params;
        ensure_param(&mut params, "output", json!("extend"));
        ensure_param(&mut params, "expandDescription", json!(1));
        ensure_param(&mut params, "active", json!(1));
        ensure_param(&mut params, "withLastEventUnacknowledged", json!(1));
        ensure_param(&mut params, "monitored", json!(1));
        ensure_param(&mut params, "only_true", json!(1));
        ensure_param(&mut params, "skipDependent", json!(1));
        ensure_param(&mut params, "selectHosts", json!("host"));
        self.call("trigger.get", params).await?.into_records()
    }
}
