//! Cloudlets API payloads
//!
//! Field names follow the Cloudlets v2 API; the same structs serialize back
//! out as template data, so templates see camelCase keys.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::activation::{ActivationEntry, Network};
use crate::pagination::{Named, Versioned};
use crate::providers::null_as_default;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub policy_id: i64,
    #[serde(default)]
    pub group_id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub cloudlet_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activations: Vec<PolicyActivation>,
}

impl Named for Policy {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyActivation {
    pub network: String,
    pub policy_info: PolicyInfo,
    pub property_info: PropertyInfo,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolicyInfo {
    pub version: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
}

impl ActivationEntry for PolicyActivation {
    fn network(&self) -> Option<Network> {
        Network::parse(&self.network)
    }

    fn version(&self) -> i64 {
        self.policy_info.version
    }

    fn property_name(&self) -> &str {
        &self.property_info.name
    }
}

/// A policy version; list responses omit the match rules
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyVersion {
    pub policy_id: i64,
    pub version: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_rule_format: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_rules: Vec<MatchRule>,
}

impl Versioned for PolicyVersion {
    fn version(&self) -> i64 {
        self.version
    }
}

/// One match rule; the variant is chosen by the `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchRule {
    #[serde(rename = "erMatchRule")]
    EdgeRedirector(RedirectRule),
    #[serde(rename = "albMatchRule")]
    ApplicationLoadBalancer(ForwardRule),
    #[serde(rename = "apMatchRule")]
    ApiPrioritization(PassThroughRule),
    #[serde(rename = "asMatchRule")]
    AudienceSegmentation(ForwardRule),
    #[serde(rename = "cdMatchRule")]
    PhasedRelease(ForwardRule),
    #[serde(rename = "frMatchRule")]
    ForwardRewrite(ForwardRule),
    #[serde(rename = "igMatchRule")]
    RequestControl(AllowDenyRule),
    #[serde(rename = "vpMatchRule")]
    VisitorPrioritization(PassThroughRule),
}

impl MatchRule {
    /// Origin a load balancer rule forwards to, if any
    pub fn origin_id(&self) -> Option<&str> {
        match self {
            MatchRule::ApplicationLoadBalancer(r) => r
                .forward_settings
                .origin_id
                .as_deref()
                .filter(|id| !id.is_empty()),
            _ => None,
        }
    }
}

/// Fields every match rule carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBase {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
    #[serde(default, rename = "matchURL", skip_serializing_if = "Option::is_none")]
    pub match_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches: Vec<MatchCriteria>,
    #[serde(default)]
    pub matches_always: bool,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRule {
    #[serde(flatten)]
    pub base: RuleBase,
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
    pub status_code: u16,
    #[serde(default, rename = "useRelativeUrl", skip_serializing_if = "Option::is_none")]
    pub use_relative_url: Option<String>,
    #[serde(default)]
    pub use_incoming_query_string: bool,
    #[serde(default)]
    pub use_incoming_scheme_and_host: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardRule {
    #[serde(flatten)]
    pub base: RuleBase,
    #[serde(default)]
    pub forward_settings: ForwardSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,
    #[serde(default, rename = "pathAndQS", skip_serializing_if = "Option::is_none")]
    pub path_and_qs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_incoming_query_string: Option<bool>,
    /// Phased release only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassThroughRule {
    #[serde(flatten)]
    pub base: RuleBase,
    #[serde(default)]
    pub pass_through_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowDenyRule {
    #[serde(flatten)]
    pub base: RuleBase,
    pub allow_deny: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCriteria {
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_value: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_operator: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub negate: bool,
    #[serde(default, rename = "checkIPs", skip_serializing_if = "Option::is_none")]
    pub check_ips: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_match_value: Option<ObjectMatchValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectMatchValue {
    #[serde(alias = "SIMPLE")]
    Simple {
        #[serde(default, deserialize_with = "null_as_default")]
        value: Vec<String>,
    },
    #[serde(alias = "OBJECT", rename_all = "camelCase")]
    Object {
        name: String,
        #[serde(default)]
        name_case_sensitive: bool,
        #[serde(default)]
        name_has_wildcard: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<ObjectMatchOptions>,
    },
    #[serde(alias = "RANGE")]
    Range {
        #[serde(default, deserialize_with = "null_as_default")]
        value: Vec<i64>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMatchOptions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: Vec<String>,
    #[serde(default)]
    pub value_has_wildcard: bool,
    #[serde(default)]
    pub value_case_sensitive: bool,
    #[serde(default)]
    pub value_escaped: bool,
}

/// A load balancer (origin) configuration version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerVersion {
    pub origin_id: String,
    pub version: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balancing_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data_centers: Vec<DataCenter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_settings: Option<LivenessSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCenter {
    pub origin_id: String,
    #[serde(default)]
    pub percent: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub continent: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_or_province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default)]
    pub cloud_service: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub liveness_hosts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_header: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_headers: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    pub path: String,
    pub port: u16,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_string: Option<String>,
    #[serde(default)]
    pub status_3xx_failure: bool,
    #[serde(default)]
    pub status_4xx_failure: bool,
    #[serde(default)]
    pub status_5xx_failure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
}

/// One entry of a load balancer's activation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerActivation {
    pub origin_id: String,
    pub network: Network,
    pub version: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activated_date: String,
}
