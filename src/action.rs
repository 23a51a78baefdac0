use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Result;
use crate::client::{ZbxClient, encode_params, ensure_param, exactly_one};
use crate::event::SourceType;
use crate::serde_util::{deserialize_i64, is_default, is_zero, zbx_code_enum};

zbx_code_enum! {
    pub enum EvalType {
        AndOr = 0,
        And = 1,
        Or = 2,
    }
}

zbx_code_enum! {
    pub enum OperationType {
        SendMessage = 0,
        RemoteCommand = 1,
        AddHost = 2,
        RemoveHost = 3,
        AddToHostGroup = 4,
        RemoveFromHostGroup = 5,
        LinkToTemplate = 6,
        UnlinkFromTemplate = 7,
        EnableHost = 8,
        DisableHost = 9,
        SetHostInventoryMode = 10,
    }
}

zbx_code_enum! {
    pub enum CommandType {
        CustomScript = 0,
        IpmiCmd = 1,
        Ssh = 2,
        Telnet = 3,
        GlobalScript = 4,
    }
}

zbx_code_enum! {
    pub enum AuthType {
        Password = 0,
        PublicKey = 1,
    }
}

zbx_code_enum! {
    /// Where a remote command runs.
    pub enum ExecuteOn {
        Agent = 0,
        Server = 1,
        Proxy = 2,
    }
}

/// Action record with its operation catalog.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Action {
    #[serde(default, rename = "actionid", skip_serializing_if = "String::is_empty")]
    pub action_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub esc_period: String,
    #[serde(default, rename = "eventsource")]
    pub event_source: SourceType,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub def_longdata: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub def_shortdata: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub r_longdata: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub r_shortdata: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ack_longdata: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ack_shortdata: String,
    #[serde(default, deserialize_with = "deserialize_i64", skip_serializing_if = "is_zero")]
    pub status: i64,
    #[serde(default, deserialize_with = "deserialize_i64", skip_serializing_if = "is_zero")]
    pub pause_suppressed: i64,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Operation {
    #[serde(default, rename = "operationid", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(default, rename = "operationtype")]
    pub operation_type: OperationType,
    #[serde(default, rename = "actionid", skip_serializing_if = "String::is_empty")]
    pub action_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub esc_period: String,
    #[serde(default, deserialize_with = "deserialize_i64", skip_serializing_if = "is_zero")]
    pub esc_step_from: i64,
    #[serde(default, deserialize_with = "deserialize_i64", skip_serializing_if = "is_zero")]
    pub esc_step_to: i64,
    #[serde(default, rename = "evaltype", skip_serializing_if = "is_default")]
    pub eval_type: EvalType,
    #[serde(default, rename = "opcommand", skip_serializing_if = "is_default")]
    pub op_command: OpCommand,
    #[serde(default, rename = "opcommand_grp", skip_serializing_if = "Vec::is_empty")]
    pub op_command_groups: Vec<OpCommandGrp>,
    #[serde(default, rename = "opcommand_hst", skip_serializing_if = "Vec::is_empty")]
    pub op_command_hosts: Vec<OpCommandHst>,
    #[serde(default, rename = "opconditions", skip_serializing_if = "Vec::is_empty")]
    pub op_conditions: Vec<OpCondition>,
    #[serde(default, rename = "opgroup", skip_serializing_if = "Vec::is_empty")]
    pub op_groups: Vec<OpGroup>,
    #[serde(default, rename = "opmessage", skip_serializing_if = "is_default")]
    pub op_message: OpMessage,
    #[serde(default, rename = "opmessage_grp", skip_serializing_if = "Vec::is_empty")]
    pub op_message_groups: Vec<OpMessageGrp>,
    #[serde(default, rename = "opmessage_usr", skip_serializing_if = "Vec::is_empty")]
    pub op_message_users: Vec<OpMessageUsr>,
    #[serde(default, rename = "optemplate", skip_serializing_if = "Vec::is_empty")]
    pub op_templates: Vec<OpTemplate>,
    #[serde(default, rename = "opinventory", skip_serializing_if = "is_default")]
    pub op_inventory: OpInventory,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OpCommand {
    #[serde(default, rename = "operationid", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,
    #[serde(default, rename = "type")]
    pub command_type: CommandType,
    #[serde(default, rename = "authtype", skip_serializing_if = "is_default")]
    pub auth_type: AuthType,
    #[serde(default, rename = "execute_on", skip_serializing_if = "is_default")]
    pub execute_on: ExecuteOn,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub port: String,
    #[serde(default, rename = "privatekey", skip_serializing_if = "String::is_empty")]
    pub private_key: String,
    #[serde(default, rename = "publickey", skip_serializing_if = "String::is_empty")]
    pub public_key: String,
    #[serde(default, rename = "scriptid", skip_serializing_if = "String::is_empty")]
    pub script_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OpCommandGrp {
    #[serde(default, rename = "opcommand_grpid", skip_serializing_if = "String::is_empty")]
    pub op_command_grp_id: String,
    #[serde(default, rename = "operationid", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(default, rename = "groupid", skip_serializing_if = "String::is_empty")]
    pub group_id: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OpCommandHst {
    #[serde(default, rename = "opcommand_hstid", skip_serializing_if = "String::is_empty")]
    pub op_command_hst_id: String,
    #[serde(default, rename = "operationid", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(default, rename = "hostid", skip_serializing_if = "String::is_empty")]
    pub host_id: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OpCondition {
    #[serde(default, rename = "opconditionid", skip_serializing_if = "String::is_empty")]
    pub op_condition_id: String,
    #[serde(default, rename = "conditiontype", deserialize_with = "deserialize_i64")]
    pub condition_type: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, rename = "operationid", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(default, deserialize_with = "deserialize_i64", skip_serializing_if = "is_zero")]
    pub operator: i64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OpGroup {
    #[serde(default, rename = "groupid", skip_serializing_if = "String::is_empty")]
    pub group_id: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OpMessage {
    #[serde(default, rename = "operationid", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    /// 0 uses the operation's own message, 1 the action default.
    #[serde(default, deserialize_with = "deserialize_i64", skip_serializing_if = "is_zero")]
    pub default_msg: i64,
    #[serde(default, rename = "mediatypeid", skip_serializing_if = "String::is_empty")]
    pub media_type_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subject: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OpMessageGrp {
    #[serde(default, rename = "operationid", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(default, rename = "usrgrpid", skip_serializing_if = "String::is_empty")]
    pub usr_grp_id: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OpMessageUsr {
    #[serde(default, rename = "operationid", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(default, rename = "userid", skip_serializing_if = "String::is_empty")]
    pub user_id: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OpTemplate {
    #[serde(default, rename = "operationid", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(default, rename = "templateid", skip_serializing_if = "String::is_empty")]
    pub template_id: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OpInventory {
    #[serde(default, rename = "operationid", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(default, rename = "inventory_mode", skip_serializing_if = "String::is_empty")]
    pub inventory_mode: String,
}

impl ZbxClient {
    /// Wrapper for `action.get`. Injects `output = "extend"` when
    /// absent; operations decode when the caller selects them.
    ///
    /// # Errors
    ///
    /// Any error surfaced by the underlying call or record decoding.
    pub async fn actions(&self, params: Value) -> Result<Vec<Action>> {
        let mut params = params;
        ensure_param(&mut params, "output", json!("extend"));
        ensure_param(&mut params, "selectOperations", json!("extend"));
        self.call("action.get", params).await?.into_records()
    }

    /// Fetch an action by id; exactly one match is required.
    ///
    /// # Errors
    ///
    /// `Error::ExpectedOneResult` when zero or several actions match.
    pub async fn action_by_id(&self, id: &str) -> Result<Action> {
        exactly_one(self.actions(json!({ "actionids": id })).await?)
    }

    /// Wrapper for `action.create`. Assigns the generated ids back onto
    /// the submitted records, positionally; some servers return them as
    /// numbers, which are normalized to strings.
    ///
    /// # Errors
    ///
    /// `Error::CountMismatch` when the server acknowledges a different
    /// number of actions than were submitted.
    pub async fn create_actions(&self, actions: &mut [Action]) -> Result<()> {
        let params = encode_params(&*actions)?;
        let result = self.call("action.create", params).await?;
        let ids = result.generated_ids("actionids", actions.len())?;
        for (action, id) in actions.iter_mut().zip(ids) {
            action.action_id = id;
        }
        Ok(())
    }

    /// Wrapper for `action.delete`; clears `action_id` on every record
    /// once the server confirms the delete.
    ///
    /// # Errors
    ///
    /// See [`ZbxClient::delete_actions_by_ids`].
    pub async fn delete_actions(&self, actions: &mut [Action]) -> Result<()> {
        let ids: Vec<String> = actions.iter().map(|action| action.action_id.clone()).collect();
        self.delete_actions_by_ids(&ids).await?;
        for action in actions.iter_mut() {
            action.action_id.clear();
        }
        Ok(())
    }

    /// Wrapper for `action.delete`.
    ///
    /// # Errors
    ///
    /// `Error::CountMismatch` when the acknowledgement covers fewer ids
    /// than were submitted.
    pub async fn delete_actions_by_ids(&self, ids: &[String]) -> Result<()> {
        let result = self.call("action.delete", json!(ids)).await?;
        result.generated_ids("actionids", ids.len())?;
        Ok(())
    }
}
