//! Application Security configuration export
//!
//! Exports the latest version of a security configuration: config-level
//! objects (rate policies, custom rules, malware policies, advanced
//! settings), every security policy with its protections and actions, match
//! targets and selected hostnames, plus the current activations.

pub mod api;
pub mod helpers;
pub mod model;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::activation::Network;
use crate::error::ExportError;
use crate::import_script::{ImportPhase, ImportScript};
use crate::pagination::{self, DEFAULT_PAGE_SIZE};
use crate::template::helpers::escape_name;
use crate::template::{TemplateProcessor, TemplateSet, template_data};
use api::AppsecApi;
use model::{
    AttackGroupInfo, ConfigExport, ConfigSummary, NamedBody, NetworkLists, PenaltyBox, Prefetch,
    RuleInfo, SecurityControls, SecurityPolicy,
};

pub const TEMPLATES: TemplateSet = TemplateSet {
    templates: &[
        ("appsec", include_str!("templates/appsec.hbs")),
        ("policies", include_str!("templates/policies.hbs")),
        ("actions", include_str!("templates/actions.hbs")),
        ("variables", include_str!("templates/variables.hbs")),
        ("imports", include_str!("templates/imports.hbs")),
    ],
    partials: &[],
    helpers: helpers::register,
};

pub const FILES: &[(&str, &str)] = &[
    ("appsec", "appsec.tf"),
    ("policies", "appsec-policies.tf"),
    ("actions", "appsec-actions.tf"),
    ("variables", "variables.tf"),
    ("imports", "import.sh"),
];

/// Protection toggles, in the order the provider documents them
fn protection_toggles(c: &SecurityControls) -> [(&'static str, bool); 7] {
    [
        ("akamai_appsec_waf_protection", c.apply_application_layer_controls),
        ("akamai_appsec_ip_geo_protection", c.apply_network_layer_controls),
        ("akamai_appsec_rate_protection", c.apply_rate_controls),
        ("akamai_appsec_reputation_protection", c.apply_reputation_controls),
        ("akamai_appsec_api_constraints_protection", c.apply_api_constraints),
        ("akamai_appsec_slowpost_protection", c.apply_slow_post_controls),
        ("akamai_appsec_malware_protection", c.apply_malware_controls),
    ]
}

/// Everything the appsec templates render
#[derive(Debug, Serialize)]
pub struct ConfigSnapshot {
    pub config_id: i64,
    pub config_name: String,
    pub description: String,
    pub version: i64,
    pub rules: Vec<RuleInfo>,
    pub attack_groups: Vec<AttackGroupInfo>,
    pub custom_rules: Vec<CustomRuleData>,
    pub rate_policies: Vec<BodyData>,
    pub malware_policies: Vec<BodyData>,
    pub policies: Vec<PolicyData>,
    pub match_targets: Vec<MatchTargetData>,
    pub selected_hosts: Vec<String>,
    pub logging: Option<Value>,
    pub prefetch: Option<Prefetch>,
    pub activations: Vec<ConfigActivation>,
    pub section: String,
    pub imports: ImportScript,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomRuleData {
    pub id: i64,
    pub name: String,
    pub resource_name: String,
    pub structured: bool,
    pub body: Value,
}

/// Rate or malware policy, rendered as a JSON body
#[derive(Debug, Clone, Serialize)]
pub struct BodyData {
    pub id: i64,
    pub name: String,
    pub resource_name: String,
    pub body: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyData {
    pub id: String,
    pub name: String,
    pub resource_name: String,
    /// Leading part of the policy ID, used when the policy is recreated
    pub prefix: String,
    pub waf_mode: Option<String>,
    pub protections: Vec<Protection>,
    pub ip_geo: Option<IpGeo>,
    pub penalty_box: Option<PenaltyBox>,
    pub rule_actions: Vec<ActionData>,
    pub attack_group_actions: Vec<ActionData>,
    pub rate_policy_actions: Vec<RatePolicyActionData>,
    pub custom_rule_actions: Vec<ActionData>,
    pub malware_policy_actions: Vec<MalwarePolicyActionData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Protection {
    pub resource_type: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpGeo {
    pub mode: &'static str,
    pub geo_network_lists: Vec<String>,
    pub ip_network_lists: Vec<String>,
    pub exception_ip_network_lists: Vec<String>,
}

/// Rule, attack group or custom rule action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionData {
    pub id: String,
    pub resource_name: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatePolicyActionData {
    pub id: i64,
    pub resource_name: String,
    pub ipv4_action: String,
    pub ipv6_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalwarePolicyActionData {
    pub id: i64,
    pub resource_name: String,
    pub action: String,
    pub unscanned_action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchTargetData {
    pub id: i64,
    pub resource_name: String,
    pub policy_resource: String,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigActivation {
    pub network: Network,
    pub network_name: &'static str,
    pub version: i64,
}

/// Fetch a configuration and render it through `processor`
pub fn export_config(
    api: &dyn AppsecApi,
    processor: &dyn TemplateProcessor,
    config_name: &str,
    section: &str,
) -> Result<ConfigSnapshot, ExportError> {
    let snapshot = build_snapshot(api, config_name, section)?;

    tracing::info!(
        config = %snapshot.config_name,
        policies = snapshot.policies.len(),
        "saving terraform configuration"
    );
    processor.process_templates(&template_data(&snapshot)?)?;
    Ok(snapshot)
}

pub fn build_snapshot(
    api: &dyn AppsecApi,
    config_name: &str,
    section: &str,
) -> Result<ConfigSnapshot, ExportError> {
    tracing::info!(config = config_name, "fetching security configuration");
    let summary: ConfigSummary = pagination::find_by_name(
        "security configuration",
        config_name,
        DEFAULT_PAGE_SIZE,
        |page| api.list_configurations(page),
    )?;

    let export = pagination::latest_version(
        "security configuration version",
        DEFAULT_PAGE_SIZE,
        |page| api.list_versions(summary.id, page),
        |version| api.export_version(summary.id, version),
    )?;
    tracing::debug!(config_id = export.config_id, version = export.version, "exported version");

    Ok(snapshot_from_export(&summary, export, section))
}

fn snapshot_from_export(summary: &ConfigSummary, export: ConfigExport, section: &str) -> ConfigSnapshot {
    let custom_rules: Vec<CustomRuleData> = export
        .custom_rules
        .into_iter()
        .map(|rule| {
            let mut body = rule.body;
            body.shift_insert(0, "name".to_string(), Value::String(rule.name.clone()));
            CustomRuleData {
                id: rule.id,
                resource_name: escape_name(&rule.name),
                name: rule.name,
                structured: rule.structured,
                body: Value::Object(body.into_iter().collect()),
            }
        })
        .collect();
    let rate_policies = body_data(export.rate_policies);
    let malware_policies = body_data(export.malware_policies);

    let names = ResourceNames {
        custom_rules: custom_rules
            .iter()
            .map(|r| (r.id, r.resource_name.clone()))
            .collect(),
        rate_policies: rate_policies
            .iter()
            .map(|p| (p.id, p.resource_name.clone()))
            .collect(),
        malware_policies: malware_policies
            .iter()
            .map(|p| (p.id, p.resource_name.clone()))
            .collect(),
    };

    let policies: Vec<PolicyData> = export
        .security_policies
        .iter()
        .map(|policy| policy_data(policy, &names))
        .collect();
    let policy_names: HashMap<&str, &str> = policies
        .iter()
        .map(|p| (p.id.as_str(), p.resource_name.as_str()))
        .collect();

    let match_targets = export
        .match_targets
        .map(|t| {
            t.website_targets
                .into_iter()
                .chain(t.api_targets)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
        .into_iter()
        .map(|target| {
            let policy_resource = policy_names
                .get(target.security_policy.policy_id.as_str())
                .map(|name| name.to_string())
                .unwrap_or_else(|| escape_name(&target.security_policy.policy_id));
            let mut body = target.body;
            body.insert(
                "securityPolicy".to_string(),
                serde_json::json!({ "policyId": target.security_policy.policy_id }),
            );
            MatchTargetData {
                id: target.target_id,
                resource_name: format!("match_target_{}", target.target_id),
                policy_resource,
                body: Value::Object(body.into_iter().collect()),
            }
        })
        .collect();

    let (rules, attack_groups) = export.rulesets.into_iter().fold(
        (Vec::new(), Vec::new()),
        |(mut rules, mut groups), ruleset| {
            rules.extend(ruleset.rules);
            groups.extend(ruleset.attack_groups);
            (rules, groups)
        },
    );

    let activations = [
        (Network::Staging, "STAGING", summary.staging_version),
        (Network::Production, "PRODUCTION", summary.production_version),
    ]
    .into_iter()
    .filter_map(|(network, network_name, version)| {
        version.map(|version| ConfigActivation {
            network,
            network_name,
            version,
        })
    })
    .collect();

    let advanced = export.advanced_options.unwrap_or_default();
    let mut snapshot = ConfigSnapshot {
        config_id: export.config_id,
        config_name: export.config_name,
        description: summary.description.clone(),
        version: export.version,
        rules,
        attack_groups,
        custom_rules,
        rate_policies,
        malware_policies,
        policies,
        match_targets,
        selected_hosts: export.selected_hosts,
        logging: advanced.logging,
        prefetch: advanced.prefetch,
        activations,
        section: section.to_string(),
        imports: ImportScript::new(),
    };
    snapshot.imports = import_script(&snapshot);
    snapshot
}

fn body_data(items: Vec<NamedBody>) -> Vec<BodyData> {
    items
        .into_iter()
        .map(|item| {
            let mut body = item.body;
            body.shift_insert(0, "name".to_string(), Value::String(item.name.clone()));
            BodyData {
                id: item.id,
                resource_name: escape_name(&item.name),
                name: item.name,
                body: Value::Object(body.into_iter().collect()),
            }
        })
        .collect()
}

/// Resource names of config-level objects, keyed by ID
struct ResourceNames {
    custom_rules: HashMap<i64, String>,
    rate_policies: HashMap<i64, String>,
    malware_policies: HashMap<i64, String>,
}

fn lookup(names: &HashMap<i64, String>, id: i64) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

fn policy_data(policy: &SecurityPolicy, names: &ResourceNames) -> PolicyData {
    let resource_name = escape_name(&policy.name);
    let scoped = |suffix: &str| escape_name(&format!("{}_{}", resource_name, suffix));

    let protections = policy
        .security_controls
        .map(|controls| {
            protection_toggles(&controls)
                .into_iter()
                .map(|(resource_type, enabled)| Protection {
                    resource_type,
                    enabled,
                })
                .collect()
        })
        .unwrap_or_default();

    let ip_geo = policy.ip_geo_firewall.as_ref().map(|firewall| {
        let (ip_network_lists, exception_ip_network_lists) = match &firewall.ip_controls {
            Some(ip) if firewall.block == "blockAllTrafficExceptAllowedIPs" => {
                (NetworkLists::ids(&ip.allowed_ip_network_lists), Vec::new())
            }
            Some(ip) => (
                NetworkLists::ids(&ip.blocked_ip_network_lists),
                NetworkLists::ids(&ip.allowed_ip_network_lists),
            ),
            None => (Vec::new(), Vec::new()),
        };
        IpGeo {
            mode: if firewall.block == "blockAllTrafficExceptAllowedIPs" {
                "allow"
            } else {
                "block"
            },
            geo_network_lists: firewall
                .geo_controls
                .as_ref()
                .map(|g| NetworkLists::ids(&g.blocked_ip_network_lists))
                .unwrap_or_default(),
            ip_network_lists,
            exception_ip_network_lists,
        }
    });

    let waf = policy.web_application_firewall.clone().unwrap_or_default();
    let rule_actions = waf
        .rule_actions
        .iter()
        .map(|a| ActionData {
            id: a.id.to_string(),
            resource_name: scoped(&a.id.to_string()),
            action: a.action.clone(),
        })
        .collect();
    let attack_group_actions = waf
        .attack_group_actions
        .iter()
        .map(|a| ActionData {
            id: a.group.clone(),
            resource_name: scoped(&a.group),
            action: a.action.clone(),
        })
        .collect();

    PolicyData {
        id: policy.id.clone(),
        prefix: policy
            .id
            .split('_')
            .next()
            .unwrap_or_default()
            .to_string(),
        name: policy.name.clone(),
        waf_mode: waf.mode,
        protections,
        ip_geo,
        penalty_box: policy.penalty_box.clone(),
        rule_actions,
        attack_group_actions,
        rate_policy_actions: policy
            .rate_policy_actions
            .iter()
            .map(|a| RatePolicyActionData {
                id: a.id,
                resource_name: scoped(&lookup(&names.rate_policies, a.id)),
                ipv4_action: a.ipv4_action.clone(),
                ipv6_action: a.ipv6_action.clone(),
            })
            .collect(),
        custom_rule_actions: policy
            .custom_rule_actions
            .iter()
            .map(|a| ActionData {
                id: a.id.to_string(),
                resource_name: scoped(&lookup(&names.custom_rules, a.id)),
                action: a.action.clone(),
            })
            .collect(),
        malware_policy_actions: policy
            .malware_policy_actions
            .iter()
            .map(|a| MalwarePolicyActionData {
                id: a.id,
                resource_name: scoped(&lookup(&names.malware_policies, a.id)),
                action: a.action.clone(),
                unscanned_action: a.unscanned_action.clone(),
            })
            .collect(),
        resource_name,
    }
}

fn import_script(snapshot: &ConfigSnapshot) -> ImportScript {
    let config_id = snapshot.config_id;
    let mut script = ImportScript::new();

    script.push(
        ImportPhase::Configuration,
        "akamai_appsec_configuration",
        "config",
        config_id.to_string(),
    );

    if snapshot.logging.is_some() {
        script.push(
            ImportPhase::GlobalSettings,
            "akamai_appsec_advanced_settings_logging",
            "logging",
            config_id.to_string(),
        );
    }
    if snapshot.prefetch.is_some() {
        script.push(
            ImportPhase::GlobalSettings,
            "akamai_appsec_advanced_settings_prefetch",
            "prefetch",
            config_id.to_string(),
        );
    }
    for policy in &snapshot.rate_policies {
        script.push(
            ImportPhase::GlobalSettings,
            "akamai_appsec_rate_policy",
            &policy.resource_name,
            format!("{}:{}", config_id, policy.id),
        );
    }
    for rule in snapshot.custom_rules.iter().filter(|r| r.structured) {
        script.push(
            ImportPhase::GlobalSettings,
            "akamai_appsec_custom_rule",
            &rule.resource_name,
            format!("{}:{}", config_id, rule.id),
        );
    }
    for policy in &snapshot.malware_policies {
        script.push(
            ImportPhase::GlobalSettings,
            "akamai_appsec_malware_policy",
            &policy.resource_name,
            format!("{}:{}", config_id, policy.id),
        );
    }

    for policy in &snapshot.policies {
        let policy_id = format!("{}:{}", config_id, policy.id);
        script.push(
            ImportPhase::PolicySettings,
            "akamai_appsec_security_policy",
            &policy.resource_name,
            policy_id.clone(),
        );
        if policy.waf_mode.is_some() {
            script.push(
                ImportPhase::PolicySettings,
                "akamai_appsec_waf_mode",
                &policy.resource_name,
                policy_id.clone(),
            );
        }
        if policy.ip_geo.is_some() {
            script.push(
                ImportPhase::PolicySettings,
                "akamai_appsec_ip_geo",
                &policy.resource_name,
                policy_id.clone(),
            );
        }
        if policy.penalty_box.is_some() {
            script.push(
                ImportPhase::PolicySettings,
                "akamai_appsec_penalty_box",
                &policy.resource_name,
                policy_id.clone(),
            );
        }

        for protection in &policy.protections {
            script.push(
                ImportPhase::PolicyProtections,
                protection.resource_type,
                &policy.resource_name,
                policy_id.clone(),
            );
        }

        for action in &policy.rule_actions {
            script.push(
                ImportPhase::NestedActions,
                "akamai_appsec_rule",
                &action.resource_name,
                format!("{}:{}", policy_id, action.id),
            );
        }
        for action in &policy.attack_group_actions {
            script.push(
                ImportPhase::NestedActions,
                "akamai_appsec_attack_group",
                &action.resource_name,
                format!("{}:{}", policy_id, action.id),
            );
        }
        for action in &policy.rate_policy_actions {
            script.push(
                ImportPhase::NestedActions,
                "akamai_appsec_rate_policy_action",
                &action.resource_name,
                format!("{}:{}", policy_id, action.id),
            );
        }
        for action in &policy.custom_rule_actions {
            script.push(
                ImportPhase::NestedActions,
                "akamai_appsec_custom_rule_action",
                &action.resource_name,
                format!("{}:{}", policy_id, action.id),
            );
        }
        for action in &policy.malware_policy_actions {
            script.push(
                ImportPhase::NestedActions,
                "akamai_appsec_malware_policy_action",
                &action.resource_name,
                format!("{}:{}", policy_id, action.id),
            );
        }
    }

    for target in &snapshot.match_targets {
        script.push(
            ImportPhase::DomainSettings,
            "akamai_appsec_match_target",
            &target.resource_name,
            format!("{}:{}", config_id, target.id),
        );
    }
    if !snapshot.selected_hosts.is_empty() {
        script.push(
            ImportPhase::DomainSettings,
            "akamai_appsec_selected_hostnames",
            "selected_hostnames",
            config_id.to_string(),
        );
    }

    for activation in &snapshot.activations {
        script.push(
            ImportPhase::Activation,
            "akamai_appsec_activations",
            &format!("appsec_activation_{}", activation.network),
            format!(
                "{}:{}:{}",
                config_id, activation.version, activation.network_name
            ),
        );
    }

    script.ordered()
}

pub fn targets(work_dir: &Path) -> IndexMap<String, PathBuf> {
    super::target_map(work_dir, FILES)
}
