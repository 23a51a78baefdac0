use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::client::{ZbxClient, ensure_param};
use crate::serde_util::{deserialize_bool, deserialize_i64, zbx_code_enum};
use crate::trigger::{Trigger, ValueType};

zbx_code_enum! {
    /// What kind of object the event is related to.
    pub enum ObjectType {
        Trigger = 0,
        DiscoveredHost = 1,
        DiscoveredService = 2,
        AutoRegisteredHost = 3,
        Item = 4,
        LldRule = 5,
    }
}

zbx_code_enum! {
    pub enum SourceType {
        Trigger = 0,
        DiscoveryRule = 1,
        ActiveAgent = 2,
        Internal = 3,
    }
}

/// One acknowledgement attached to an event.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Acknowledge {
    #[serde(default, rename = "acknowledgeid")]
    pub acknowledge_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub clock: i64,
    #[serde(default, rename = "eventid")]
    pub event_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub surname: String,
    #[serde(default, rename = "userid", skip_serializing_if = "String::is_empty")]
    pub user_id: String,
}

/// Event record. Acknowledges and triggers are populated when the
/// corresponding `select*` parameters are sent; absent collections
/// decode as empty.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Event {
    #[serde(default, deserialize_with = "deserialize_bool")]
    pub acknowledged: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acknowledges: Vec<Acknowledge>,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub clock: i64,
    #[serde(default, rename = "eventid")]
    pub event_id: String,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub ns: i64,
    #[serde(default)]
    pub object: ObjectType,
    #[serde(default, rename = "objectid")]
    pub object_id: String,
    #[serde(default)]
    pub source: SourceType,
    #[serde(default)]
    pub value: ValueType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<Trigger>,
}

impl ZbxClient {
    /// Wrapper for `event.get`. Defaults `output` and
    /// `select_acknowledges` to `"extend"` when absent.
    ///
    /// # Errors
    ///
    /// Any error surfaced by the underlying call or record decoding.
    pub async fn events(&self, params: Value) -> Result<Vec<Event>> {
        let mut params = params;
        ensure_param(&mut params, "output", json!("extend"));
        ensure_param(&mut params, "select_acknowledges", json!("extend"));
        self.call("event.get", params).await?.into_records()
    }

    /// Events with the given event id.
    ///
    /// # Errors
    ///
    /// See [`ZbxClient::events`].
    pub async fn events_by_id(&self, id: &str) -> Result<Vec<Event>> {
        self.events(json!({ "eventids": id })).await
    }

    /// Events generated by one trigger.
    ///
    /// # Errors
    ///
    /// See [`ZbxClient::events`].
    pub async fn events_by_trigger_id(&self, id: &str) -> Result<Vec<Event>> {
        self.events(json!({ "objectids": id })).await
    }

    /// Wrapper for `event.acknowledge`.
    ///
    /// # Errors
    ///
    /// Any error surfaced by the underlying call.
    pub async fn acknowledge_event(&self, id: &str, message: &str) -> Result<()> {
        let _ = self
            .call(
                "event.acknowledge",
                json!({ "eventids": id, "message": message }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::{Event, ObjectType, SourceType};

    #[test]
    fn event_decodes_with_nested_collections() {
        let event: Event = serde_json::from_value(json!({
            "eventid": "9695",
            "source": "0",
            "object": "0",
            "objectid": "13926",
            "clock": "1347970410",
            "value": "1",
            "acknowledged": "1",
            "ns": "413316245",
            "acknowledges": [
                {
                    "acknowledgeid": "1",
                    "eventid": "9695",
                    "clock": "1350475821",
                    "message": "problem solved"
                }
            ],
            "triggers": [
                { "triggerid": "13926", "description": "d", "expression": "e" }
            ]
        }))
        .unwrap();
        assert!(event.acknowledged);
        assert_eq!(event.source, SourceType::Trigger);
        assert_eq!(event.object, ObjectType::Trigger);
        assert_eq!(event.acknowledges.len(), 1);
        assert_eq!(event.triggers[0].trigger_id, "13926");
    }

    #[test]
    fn absent_collections_normalize_to_empty() {
        let event: Event = serde_json::from_value(json!({ "eventid": "1" })).unwrap();
        assert!(event.acknowledges.is_empty());
        assert!(event.triggers.is_empty());
        assert!(!event.acknowledged);
    }
}
