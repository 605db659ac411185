//! Property Manager (PAPI) payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pagination::Versioned;
use crate::providers::null_as_default;

/// PAPI wraps every collection as `{"items": [...]}`
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Items<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub versions: Items<SearchItem>,
}

/// One hit of `POST /papi/v1/search/find-by-value`; one per matching version
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub property_id: String,
    pub property_name: String,
    pub contract_id: String,
    pub group_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PropertyResponse {
    pub properties: Items<Property>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub property_id: String,
    pub property_name: String,
    pub contract_id: String,
    pub group_id: String,
    #[serde(default)]
    pub latest_version: Option<i64>,
    #[serde(default)]
    pub staging_version: Option<i64>,
    #[serde(default)]
    pub production_version: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct VersionResponse {
    pub versions: Items<PropertyVersion>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyVersion {
    pub property_version: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_id: String,
    #[serde(default)]
    pub rule_format: Option<String>,
}

impl Versioned for PropertyVersion {
    fn version(&self) -> i64 {
        self.property_version
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTree {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rule_format: String,
    pub rules: Value,
}

#[derive(Debug, Deserialize)]
pub struct HostnameResponse {
    pub hostnames: Items<Hostname>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hostname {
    pub cname_from: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cname_to: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cname_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cert_provisioning_type: String,
}
