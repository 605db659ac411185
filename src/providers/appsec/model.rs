//! Application Security API payloads
//!
//! Only the fields the exporter reasons about are typed; bodies that are
//! embedded verbatim as JSON keep their remaining keys in order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pagination::{Named, Versioned};
use crate::providers::null_as_default;

/// Entry of `GET /appsec/v1/configs`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub latest_version: Option<i64>,
    #[serde(default)]
    pub staging_version: Option<i64>,
    #[serde(default)]
    pub production_version: Option<i64>,
}

impl Named for ConfigSummary {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfigList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub configurations: Vec<ConfigSummary>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VersionSummary {
    pub version: i64,
}

impl Versioned for VersionSummary {
    fn version(&self) -> i64 {
        self.version
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub version_list: Vec<VersionSummary>,
}

/// Full export of one configuration version
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigExport {
    pub config_id: i64,
    pub config_name: String,
    pub version: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub security_policies: Vec<SecurityPolicy>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_rules: Vec<CustomRule>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rulesets: Vec<Ruleset>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rate_policies: Vec<NamedBody>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub malware_policies: Vec<NamedBody>,
    #[serde(default)]
    pub match_targets: Option<MatchTargets>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected_hosts: Vec<String>,
    #[serde(default)]
    pub advanced_options: Option<AdvancedOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPolicy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub security_controls: Option<SecurityControls>,
    #[serde(default)]
    pub web_application_firewall: Option<WebApplicationFirewall>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rate_policy_actions: Vec<RatePolicyAction>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_rule_actions: Vec<CustomRuleAction>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub malware_policy_actions: Vec<MalwarePolicyAction>,
    #[serde(default)]
    pub ip_geo_firewall: Option<IpGeoFirewall>,
    #[serde(default)]
    pub penalty_box: Option<PenaltyBox>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityControls {
    #[serde(default)]
    pub apply_application_layer_controls: bool,
    #[serde(default)]
    pub apply_network_layer_controls: bool,
    #[serde(default)]
    pub apply_rate_controls: bool,
    #[serde(default)]
    pub apply_reputation_controls: bool,
    #[serde(default)]
    pub apply_api_constraints: bool,
    #[serde(default)]
    pub apply_slow_post_controls: bool,
    #[serde(default)]
    pub apply_malware_controls: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebApplicationFirewall {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rule_actions: Vec<RuleAction>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attack_group_actions: Vec<AttackGroupAction>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleAction {
    pub id: i64,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttackGroupAction {
    pub group: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePolicyAction {
    pub id: i64,
    pub ipv4_action: String,
    pub ipv6_action: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomRuleAction {
    pub id: i64,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MalwarePolicyAction {
    pub id: i64,
    pub action: String,
    pub unscanned_action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpGeoFirewall {
    pub block: String,
    #[serde(default)]
    pub geo_controls: Option<GeoControls>,
    #[serde(default)]
    pub ip_controls: Option<IpControls>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoControls {
    #[serde(default, rename = "blockedIPNetworkLists")]
    pub blocked_ip_network_lists: Option<NetworkLists>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpControls {
    #[serde(default, rename = "allowedIPNetworkLists")]
    pub allowed_ip_network_lists: Option<NetworkLists>,
    #[serde(default, rename = "blockedIPNetworkLists")]
    pub blocked_ip_network_lists: Option<NetworkLists>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkLists {
    #[serde(default, deserialize_with = "null_as_default")]
    pub network_list: Vec<String>,
}

impl NetworkLists {
    pub fn ids(lists: &Option<NetworkLists>) -> Vec<String> {
        lists
            .as_ref()
            .map(|l| l.network_list.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyBox {
    pub penalty_box_protection: bool,
    pub action: String,
}

/// A custom rule; `structured` is false for legacy rules
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomRule {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub structured: bool,
    #[serde(flatten)]
    pub body: IndexMap<String, Value>,
}

/// A config-level object embedded as JSON (rate policy, malware policy)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedBody {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub body: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ruleset {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<RuleInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attack_groups: Vec<AttackGroupInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackGroupInfo {
    pub group: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTargets {
    #[serde(default, deserialize_with = "null_as_default")]
    pub website_targets: Vec<MatchTarget>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_targets: Vec<MatchTarget>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTarget {
    pub target_id: i64,
    pub security_policy: PolicyRef,
    #[serde(flatten)]
    pub body: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRef {
    pub policy_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AdvancedOptions {
    #[serde(default)]
    pub logging: Option<Value>,
    #[serde(default)]
    pub prefetch: Option<Prefetch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prefetch {
    #[serde(default)]
    pub enable_app_layer: bool,
    #[serde(default)]
    pub all_extensions: bool,
    #[serde(default)]
    pub enable_rate_controls: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extensions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_from_api() {
        let export: ConfigExport = serde_json::from_str(
            r#"{
              "configId": 43253,
              "configName": "Example Config",
              "version": 7,
              "securityPolicies": [{
                "id": "abcd_12345",
                "name": "Main Policy",
                "securityControls": {"applyApplicationLayerControls": true},
                "webApplicationFirewall": {
                  "ruleActions": [{"id": 950002, "action": "deny"}],
                  "attackGroupActions": [{"group": "SQL", "action": "alert"}]
                },
                "ratePolicyActions": null
              }],
              "customRules": [{"id": 60036378, "name": "Block bots", "structured": true,
                               "conditions": [{"type": "pathMatch"}]}],
              "rulesets": [{"rules": [{"id": 950002, "title": "System Command Access"}]}],
              "matchTargets": {"websiteTargets": [{"targetId": 2, "type": "website",
                               "securityPolicy": {"policyId": "abcd_12345"},
                               "hostnames": ["www.example.com"]}]}
            }"#,
        )
        .unwrap();

        let policy = &export.security_policies[0];
        assert_eq!(policy.id, "abcd_12345");
        assert!(policy.rate_policy_actions.is_empty());
        assert!(policy.security_controls.unwrap().apply_application_layer_controls);
        assert_eq!(
            policy.web_application_firewall.as_ref().unwrap().rule_actions[0].id,
            950002
        );

        let rule = &export.custom_rules[0];
        assert!(rule.structured);
        assert!(rule.body.contains_key("conditions"));
        assert!(!rule.body.contains_key("id"));

        let target = &export.match_targets.unwrap().website_targets[0];
        assert_eq!(target.security_policy.policy_id, "abcd_12345");
        assert_eq!(target.body["hostnames"][0], "www.example.com");
    }
}
