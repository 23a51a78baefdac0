use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::client::{ZbxClient, encode_params, ensure_param, exactly_one};
use crate::hostgroup::HostGroup;
use crate::serde_util::{deserialize_i64, zbx_code_enum};
use crate::trigger::HostRef;

zbx_code_enum! {
    /// Whether data collection continues during the window.
    pub enum MaintenanceType {
        WithData = 0,
        NoData = 1,
    }
}

/// Maintenance window with its host, group and time-period associations.
/// `host_ids`/`group_ids` are the create-side references; `hosts`,
/// `groups` and `time_periods` are filled in when decoding get results.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Maintenance {
    #[serde(default, rename = "maintenanceid", skip_serializing_if = "String::is_empty")]
    pub maintenance_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub active_since: i64,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub active_till: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub maintenance_type: MaintenanceType,
    #[serde(default, rename = "hostids", skip_serializing_if = "Vec::is_empty")]
    pub host_ids: Vec<String>,
    #[serde(default, rename = "groupids", skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<HostRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<HostGroup>,
    #[serde(default, rename = "timeperiods", skip_serializing_if = "Vec::is_empty")]
    pub time_periods: Vec<TimePeriod>,
}

/// Recurrence rule inside a maintenance window.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TimePeriod {
    #[serde(default, rename = "timeperiodid", skip_serializing_if = "String::is_empty")]
    pub time_period_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub day: String,
    #[serde(default, rename = "dayofweek", deserialize_with = "deserialize_i64")]
    pub day_of_week: i64,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub every: i64,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub month: i64,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub period: i64,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub start_date: i64,
    #[serde(default, deserialize_with = "deserialize_i64")]
    pub start_time: i64,
    #[serde(default, rename = "timeperiod_type", deserialize_with = "deserialize_i64")]
    pub timeperiod_type: i64,
}

impl ZbxClient {
    /// Wrapper for `maintenance.get`. Defaults `output` and the
    /// `selectHosts`/`selectGroups`/`selectTimeperiods` projections to
    /// `"extend"` when absent.
    ///
    /// # Errors
    ///
    /// Any error surfaced by the underlying call or record decoding.
    pub async fn maintenances(&self, params: Value) -> Result<Vec<Maintenance>> {
        let mut params = params;
        ensure_param(&mut params, "output", json!("extend"));
        ensure_param(&mut params, "selectHosts", json!("extend"));
        ensure_param(&mut params, "selectGroups", json!("extend"));
        ensure_param(&mut params, "selectTimeperiods", json!("extend"));
        self.call("maintenance.get", params).await?.into_records()
    }

    /// Fetch a maintenance window by id; exactly one match is required.
    ///
    /// # Errors
    ///
    /// `Error::ExpectedOneResult` when zero or several windows match.
    pub async fn maintenance_by_id(&self, id: &str) -> Result<Maintenance> {
        exactly_one(self.maintenances(json!({ "maintenanceids": id })).await?)
    }

    /// Wrapper for `maintenance.create`. Assigns the generated ids back
    /// onto the submitted records, positionally.
    ///
    /// # Errors
    ///
    /// `Error::CountMismatch` when the server acknowledges a different
    /// number of windows than were submitted.
    pub async fn create_maintenances(&self, maintenances: &mut [Maintenance]) -> Result<()> {
        let params = encode_params(&*maintenances)?;
        let result = self.call("maintenance.create", params).await?;
        let ids = result.generated_ids("maintenanceids", maintenances.len())?;
        for (maintenance, id) in maintenances.iter_mut().zip(ids) {
            maintenance.maintenance_id = id;
        }
        Ok(())
    }

    /// Wrapper for `maintenance.delete`; clears `maintenance_id` on
    /// every record once the server confirms the delete.
    ///
    /// # Errors
    ///
    /// See [`ZbxClient::delete_maintenances_by_ids`].
    pub async fn delete_maintenances(&self, maintenances: &mut [Maintenance]) -> Result<()> {
        let ids: Vec<String> = maintenances
            .iter()
            .map(|maintenance| maintenance.maintenance_id.clone())
            .collect();
        self.delete_maintenances_by_ids(&ids).await?;
        for maintenance in maintenances.iter_mut() {
            maintenance.maintenance_id.clear();
        }
        Ok(())
    }

    /// Wrapper for `maintenance.delete`.
    ///
    /// # Errors
    ///
    /// `Error::CountMismatch` when the acknowledgement covers fewer ids
    /// than were submitted.
    pub async fn delete_maintenances_by_ids(&self, ids: &[String]) -> Result<()> {
        let result = self.call("maintenance.delete", json!(ids)).await?;
        result.generated_ids("maintenanceids", ids.len())?;
        Ok(())
    }
}
