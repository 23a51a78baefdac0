use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::Result;
use crate::client::{
    ZbxClient, encode_params, ensure_param, exactly_one, wants_plain_id_fallback,
};
use crate::hostgroup::{HostGroup, HostGroupId};
use crate::serde_util::{deserialize_i64, zbx_code_enum};

zbx_code_enum! {
    /// Agent availability as reported by the server.
    pub enum AvailableType {
        Available = 1,
        Unavailable = 2,
    }
}

zbx_code_enum! {
    pub enum StatusType {
        Monitored = 0,
        Unmonitored = 1,
    }
}

zbx_code_enum! {
    pub enum MaintenanceStatus {
        Normal = 0,
        InMaintenance = 1,
    }
}

/// Host record. Groups, interfaces and templates are only sent on
/// `host.create`; the server answers gets with flat host rows unless the
/// caller selects more.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Host {
    #[serde(default, rename = "hostid", skip_serializing_if = "String::is_empty")]
    pub host_id: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub available: AvailableType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(default)]
    pub status: StatusType,
    #[serde(default)]
    pub maintenance_status: MaintenanceStatus,
    #[serde(default, rename = "groups", skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<HostGroupId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<HostInterface>,
    #[serde(default, rename = "templates", skip_serializing_if = "Vec::is_empty")]
    pub template_ids: Vec<TemplateId>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct HostInterface {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dns: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub main: i64,
    #[serde(default)]
    pub port: String,
    #[serde(default, rename = "type", deserialize_with = "deserialize_i64")]
    pub interface_type: i64,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub useip: i64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TemplateId {
    #[serde(rename = "templateid")]
    pub template_id: String,
}

impl ZbxClient {
    /// Wrapper for `host.get`. Injects `output = "extend"` when absent.
    ///
    /// # Errors
    ///
    /// Any error surfaced by the underlying call or record decoding.
    pub async fn hosts(&self, params: Value) -> Result<Vec<Host>> {
        let mut params = params;
        ensure_param(&mut params, "output", json!("extend"));
        self.call("host.get", params).await?.into_records()
    }

    /// Hosts belonging to the given host group ids.
    ///
    /// # Errors
    ///
    /// See [`ZbxClient::hosts`].
    pub async fn hosts_by_group_ids(&self, ids: &[String]) -> Result<Vec<Host>> {
        self.hosts(json!({ "groupids": ids })).await
    }

    /// Hosts belonging to the given host groups.
    ///
    /// # Errors
    ///
    /// See [`ZbxClient::hosts`].
    pub async fn hosts_by_groups(&self, groups: &[HostGroup]) -> Result<Vec<Host>> {
        let ids: Vec<&str> = groups.iter().map(|group| group.group_id.as_str()).collect();
        self.hosts(json!({ "groupids": ids })).await
    }

    /// Fetch a host by id; exactly one match is required.
    ///
    /// # Errors
    ///
    /// `Error::ExpectedOneResult` when zero or several hosts match.
    pub async fn host_by_id(&self, id: &str) -> Result<Host> {
        exactly_one(self.hosts(json!({ "hostids": id })).await?)
    }

    /// Fetch a host by technical name; exactly one match is required.
    ///
    /// # Errors
    ///
    /// `Error::ExpectedOneResult` when zero or several hosts match.
    pub async fn host_by_name(&self, host: &str) -> Result<Host> {
        exactly_one(
            self.hosts(json!({ "filter": { "host": host } })).await?,
        )
    }

    /// Wrapper for `host.create`. Assigns the generated ids back onto
    /// the submitted records, positionally.
    ///
    /// # Errors
    ///
    /// `Error::CountMismatch` when the server acknowledges a different
    /// number of hosts than were submitted.
    pub async fn create_hosts(&self, hosts: &mut [Host]) -> Result<()> {
        let params = encode_params(&*hosts)?;
        let result = self.call("host.create", params).await?;
        let ids = result.generated_ids("hostids", hosts.len())?;
        for (host, id) in hosts.iter_mut().zip(ids) {
            host.host_id = id;
        }
        Ok(())
    }

    /// Wrapper for `host.delete`; clears `host_id` on every record once
    /// the server confirms the delete.
    ///
    /// # Errors
    ///
    /// See [`ZbxClient::delete_hosts_by_ids`].
    pub async fn delete_hosts(&self, hosts: &mut [Host]) -> Result<()> {
        let ids: Vec<String> = hosts.iter().map(|host| host.host_id.clone()).collect();
        self.delete_hosts_by_ids(&ids).await?;
        for host in hosts.iter_mut() {
            host.host_id.clear();
        }
        Ok(())
    }

    /// Wrapper for `host.delete`. Pre-2.4 servers want the wrapped
    /// id-object shape; newer ones reject it with `-32500`, after which
    /// the call is re-issued with the plain id array.
    ///
    /// # Errors
    ///
    /// `Error::CountMismatch` when the acknowledgement covers fewer ids
    /// than were submitted.
    pub async fn delete_hosts_by_ids(&self, ids: &[String]) -> Result<()> {
        let wrapped: Vec<Value> = ids.iter().map(|id| json!({ "hostid": id })).collect();
        let result = match self.call("host.delete", Value::Array(wrapped)).await {
            Err(err) if wants_plain_id_fallback("host.delete", &err) => {
                warn!(code = err.api_code(), "host.delete rejected wrapped ids, re-issuing with plain id array");
                self.call("host.delete", json!(ids)).await?
            }
            other => other?,
        };
        result.generated_ids("hostids", ids.len())?;
        Ok(())
    }
}
