use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::Result;
use crate::client::{
    ZbxClient, encode_params, ensure_param, exactly_one, wants_plain_id_fallback,
};

/// Host group record.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct HostGroup {
    #[serde(default, rename = "groupid", skip_serializing_if = "String::is_empty")]
    pub group_id: String,
    #[serde(default)]
    pub name: String,
}

/// Wire shape `{"groupid": "..."}` used where the API wants group
/// references rather than full records.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct HostGroupId {
    #[serde(rename = "groupid")]
    pub group_id: String,
}

impl ZbxClient {
    /// Wrapper for `hostgroup.get`. Injects `output = "extend"` when
    /// absent.
    ///
    /// # Errors
    ///
    /// Any error surfaced by the underlying call or record decoding.
    pub async fn host_groups(&self, params: Value) -> Result<Vec<HostGroup>> {
        let mut params = params;
        ensure_param(&mut params, "output", json!("extend"));
        self.call("hostgroup.get", params).await?.into_records()
    }

    /// Fetch a host group by id; exactly one match is required.
    ///
    /// # Errors
    ///
    /// `Error::ExpectedOneResult` when zero or several groups match.
    pub async fn host_group_by_id(&self, id: &str) -> Result<HostGroup> {
        exactly_one(self.host_groups(json!({ "groupids": id })).await?)
    }

    /// Wrapper for `hostgroup.create`. Assigns the generated ids back
    /// onto the submitted records, positionally.
    ///
    /// # Errors
    ///
    /// `Error::CountMismatch` when the server acknowledges a different
    /// number of groups than were submitted.
    pub async fn create_host_groups(&self, groups: &mut [HostGroup]) -> Result<()> {
        let params = encode_params(&*groups)?;
        let result = self.call("hostgroup.create", params).await?;
        let ids = result.generated_ids("groupids", groups.len())?;
        for (group, id) in groups.iter_mut().zip(ids) {
            group.group_id = id;
        }
        Ok(())
    }

    /// Wrapper for `hostgroup.delete`; clears `group_id` on every record
    /// once the server confirms the delete.
    ///
    /// # Errors
    ///
    /// See [`ZbxClient::delete_host_groups_by_ids`].
    pub async fn delete_host_groups(&self, groups: &mut [HostGroup]) -> Result<()> {
        let ids: Vec<String> = groups.iter().map(|group| group.group_id.clone()).collect();
        self.delete_host_groups_by_ids(&ids).await?;
        for group in groups.iter_mut() {
            group.group_id.clear();
        }
        Ok(())
    }

    /// Wrapper for `hostgroup.delete`. Pre-2.4 servers want the wrapped
    /// id-object shape; newer ones reject it with `-32500`, after which
    /// the call is re-issued with the plain id array.
    ///
    /// # Errors
    ///
    /// `Error::CountMismatch` when the acknowledgement covers fewer ids
    /// than were submitted.
    pub async fn delete_host_groups_by_ids(&self, ids: &[String]) -> Result<()> {
        let wrapped: Vec<Value> = ids.iter().map(|id| json!({ "groupid": id })).collect();
        let result = match self.call("hostgroup.delete", Value::Array(wrapped)).await {
            Err(err) if wants_plain_id_fallback("hostgroup.delete", &err) => {
                warn!(code = err.api_code(), "hostgroup.delete rejected wrapped ids, re-issuing with plain id array");
                self.call("hostgroup.delete", json!(ids)).await?
            }
            other => other?,
        };
        result.generated_ids("groupids", ids.len())?;
        Ok(())
    }
}
