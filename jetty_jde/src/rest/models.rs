//! Request and response bodies for the AIS REST API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub(crate) struct AuthRequest<'a> {
    pub(crate) username: &'a str,
    pub(crate) password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) environment: Option<&'a str>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    #[serde(default)]
    pub(crate) environment: String,
    #[serde(default)]
    pub(crate) user_info: UserInfo,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserInfo {
    #[serde(default)]
    pub(crate) token: String,
    #[serde(default)]
    pub(crate) apps_release: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigResponse {
    #[serde(default)]
    pub(crate) ais_version: String,
    #[serde(default)]
    pub(crate) default_environment: String,
    #[serde(default)]
    pub(crate) capability_list: Vec<Capability>,
    #[serde(default)]
    pub(crate) required_capability_missing: bool,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Capability {
    pub(crate) name: String,
}

#[derive(Serialize, Debug)]
pub(crate) struct ValidateRequest<'a> {
    pub(crate) token: &'a str,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidateResponse {
    #[serde(default)]
    pub(crate) is_valid_session: bool,
    #[serde(default)]
    pub(crate) message: String,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DataRequest {
    pub(crate) target_name: String,
    pub(crate) target_type: &'static str,
    pub(crate) data_service_type: &'static str,
    pub(crate) find_on_entry: &'static str,
    #[serde(rename = "returnControlIDs")]
    pub(crate) return_control_ids: String,
    pub(crate) max_page_size: String,
    pub(crate) enable_next_page_processing: String,
    pub(crate) output_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) query: Option<Query>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Query {
    pub(crate) auto_find: bool,
    pub(crate) condition: Vec<ConditionBody>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConditionBody {
    pub(crate) control_id: String,
    pub(crate) operator: String,
    pub(crate) value: Vec<ValueBody>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValueBody {
    pub(crate) content: String,
    pub(crate) special_value_id: &'static str,
}

/// A browse response. The form is keyed by table
/// (`fs_DATABROWSE_<TABLE>`), so it's pulled out of `forms` once we know
/// which table was asked for.
#[derive(Deserialize, Debug)]
pub(crate) struct BrowseEnvelope {
    #[serde(default)]
    pub(crate) links: Vec<Link>,
    #[serde(flatten)]
    pub(crate) forms: HashMap<String, serde_json::Value>,
}

/// The body of a browse form (`fs_DATABROWSE_<TABLE>`).
#[derive(Deserialize, Debug)]
pub(crate) struct BrowseForm<R> {
    pub(crate) data: BrowseData<R>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BrowseData<R> {
    pub(crate) grid_data: GridData<R>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GridData<R> {
    #[serde(default = "Vec::new")]
    pub(crate) rowset: Vec<R>,
    #[serde(default)]
    pub(crate) summary: Summary,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Summary {
    #[serde(default)]
    pub(crate) records: u64,
    #[serde(default)]
    pub(crate) more_records: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct Link {
    #[serde(default)]
    pub(crate) rel: String,
    pub(crate) href: String,
}
