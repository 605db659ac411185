//! Cloudlets policy export
//!
//! Finds a policy by name, takes its latest version with match rules, folds
//! its activation history per network and, for application load balancer
//! policies, exports every load balancer the rules forward to.

pub mod api;
pub mod model;

use handlebars::Handlebars;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::activation::{self, Activation, Network};
use crate::error::{ExportError, FetchPhase};
use crate::import_script::{ImportPhase, ImportScript};
use crate::pagination::{self, DEFAULT_PAGE_SIZE};
use crate::template::helpers::escape_name;
use crate::template::{TemplateProcessor, TemplateSet, template_data};
use api::CloudletsApi;
use model::{LoadBalancerActivation, LoadBalancerVersion, MatchRule, Policy};

pub const TEMPLATES: TemplateSet = TemplateSet {
    templates: &[
        ("policy", include_str!("templates/policy.hbs")),
        ("match-rules", include_str!("templates/match-rules.hbs")),
        ("load-balancer", include_str!("templates/load-balancer.hbs")),
        ("variables", include_str!("templates/variables.hbs")),
        ("imports", include_str!("templates/imports.hbs")),
    ],
    partials: &[
        ("match_criteria", include_str!("templates/match-criteria.hbs")),
        ("forward_settings", include_str!("templates/forward-settings.hbs")),
    ],
    helpers: no_extra_helpers,
};

/// Output file per template
pub const FILES: &[(&str, &str)] = &[
    ("policy", "policy.tf"),
    ("match-rules", "match-rules.tf"),
    ("load-balancer", "load-balancer.tf"),
    ("variables", "variables.tf"),
    ("imports", "import.sh"),
];

fn no_extra_helpers(_: &mut Handlebars<'static>) {}

/// Cloudlet types that can be exported, with their match rule data source
const SUPPORTED_CLOUDLETS: &[(&str, &str)] = &[
    ("ALB", "akamai_cloudlets_application_load_balancer_match_rule"),
    ("AP", "akamai_cloudlets_api_prioritization_match_rule"),
    ("AS", "akamai_cloudlets_audience_segmentation_match_rule"),
    ("CD", "akamai_cloudlets_phased_release_match_rule"),
    ("ER", "akamai_cloudlets_edge_redirector_match_rule"),
    ("FR", "akamai_cloudlets_forward_rewrite_match_rule"),
    ("IG", "akamai_cloudlets_request_control_match_rule"),
    ("VP", "akamai_cloudlets_visitor_prioritization_match_rule"),
];

const POLICY_RESOURCE: &str = "akamai_cloudlets_policy";
const POLICY_ACTIVATION_RESOURCE: &str = "akamai_cloudlets_policy_activation";
const LOAD_BALANCER_RESOURCE: &str = "akamai_cloudlets_application_load_balancer";
const LOAD_BALANCER_ACTIVATION_RESOURCE: &str =
    "akamai_cloudlets_application_load_balancer_activation";

/// Everything the cloudlets templates render
#[derive(Debug, Serialize)]
pub struct PolicySnapshot {
    pub name: String,
    pub policy_id: i64,
    pub cloudlet_code: String,
    pub description: String,
    pub group_id: i64,
    pub match_rule_format: String,
    pub match_rules: Vec<MatchRule>,
    pub match_rules_source: &'static str,
    pub activations: PolicyActivations,
    pub load_balancers: Vec<LoadBalancerVersion>,
    pub load_balancer_activations: Vec<LoadBalancerActivation>,
    pub section: String,
    pub imports: ImportScript,
}

#[derive(Debug, Default, Serialize)]
pub struct PolicyActivations {
    pub staging: Option<Activation>,
    pub prod: Option<Activation>,
}

/// Fetch a policy and render it through `processor`
pub fn export_policy(
    api: &dyn CloudletsApi,
    processor: &dyn TemplateProcessor,
    policy_name: &str,
    section: &str,
) -> Result<PolicySnapshot, ExportError> {
    let snapshot = build_snapshot(api, policy_name, section)?;

    tracing::info!(policy = %snapshot.name, "saving terraform configuration");
    processor.process_templates(&template_data(&snapshot)?)?;
    Ok(snapshot)
}

/// Assemble the template data for one policy
pub fn build_snapshot(
    api: &dyn CloudletsApi,
    policy_name: &str,
    section: &str,
) -> Result<PolicySnapshot, ExportError> {
    tracing::info!(policy = policy_name, "fetching policy");
    let policy: Policy = pagination::find_by_name("policy", policy_name, DEFAULT_PAGE_SIZE, |page| {
        api.list_policies(page)
    })?;

    let match_rules_source = SUPPORTED_CLOUDLETS
        .iter()
        .find(|(code, _)| *code == policy.cloudlet_code)
        .map(|(_, source)| *source)
        .ok_or_else(|| ExportError::UnsupportedType {
            kind: "cloudlet",
            code: policy.cloudlet_code.clone(),
        })?;

    let version = pagination::latest_version(
        "policy version",
        DEFAULT_PAGE_SIZE,
        |page| api.list_policy_versions(policy.policy_id, page),
        |version| api.get_policy_version(policy.policy_id, version),
    )?;
    tracing::debug!(policy_id = policy.policy_id, version = version.version, "latest version");

    let activations = PolicyActivations {
        staging: activation::aggregate(policy.policy_id, &policy.activations, Network::Staging),
        prod: activation::aggregate(policy.policy_id, &policy.activations, Network::Production),
    };

    let (load_balancers, load_balancer_activations) = if policy.cloudlet_code == "ALB" {
        let origins = origin_ids(&version.match_rules);
        (
            latest_load_balancers(api, &origins)?,
            newest_load_balancer_activations(api, &origins)?,
        )
    } else {
        (Vec::new(), Vec::new())
    };

    let imports = import_script(&policy, &activations, &load_balancers, &load_balancer_activations);

    Ok(PolicySnapshot {
        name: policy.name,
        policy_id: policy.policy_id,
        cloudlet_code: policy.cloudlet_code,
        description: version.description,
        group_id: policy.group_id,
        match_rule_format: version.match_rule_format,
        match_rules: version.match_rules,
        match_rules_source,
        activations,
        load_balancers,
        load_balancer_activations,
        section: section.to_string(),
        imports,
    })
}

/// Distinct origins referenced by load balancer rules, sorted
fn origin_ids(rules: &[MatchRule]) -> Vec<String> {
    rules
        .iter()
        .filter_map(MatchRule::origin_id)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Highest version of each load balancer; origins without versions are skipped
fn latest_load_balancers(
    api: &dyn CloudletsApi,
    origin_ids: &[String],
) -> Result<Vec<LoadBalancerVersion>, ExportError> {
    let mut load_balancers = Vec::new();
    for origin_id in origin_ids {
        let versions = api
            .list_load_balancer_versions(origin_id)
            .map_err(|e| ExportError::fetch("load balancer", FetchPhase::VersionFetch, e))?;

        if let Some(latest) = versions
            .into_iter()
            .filter(|v| v.version > 0)
            .max_by_key(|v| v.version)
        {
            load_balancers.push(latest);
        }
    }
    Ok(load_balancers)
}

/// Most recent activation of each load balancer on each network
///
/// The activation list carries no request ID, so the newest `activatedDate`
/// is taken as the current one.
fn newest_load_balancer_activations(
    api: &dyn CloudletsApi,
    origin_ids: &[String],
) -> Result<Vec<LoadBalancerActivation>, ExportError> {
    let mut activations = Vec::new();
    for origin_id in origin_ids {
        let history = api
            .list_load_balancer_activations(origin_id)
            .map_err(|e| ExportError::fetch("load balancer activation", FetchPhase::Listing, e))?;

        for network in Network::ALL {
            if let Some(newest) = history
                .iter()
                .filter(|a| a.network == network)
                .max_by(|a, b| a.activated_date.cmp(&b.activated_date))
            {
                activations.push(newest.clone());
            }
        }
    }
    Ok(activations)
}

fn import_script(
    policy: &Policy,
    activations: &PolicyActivations,
    load_balancers: &[LoadBalancerVersion],
    load_balancer_activations: &[LoadBalancerActivation],
) -> ImportScript {
    let mut script = ImportScript::new();
    for lb in load_balancers {
        script.push(
            ImportPhase::Configuration,
            LOAD_BALANCER_RESOURCE,
            &format!("load_balancer_{}", escape_name(&lb.origin_id)),
            lb.origin_id.clone(),
        );
    }
    script.push(
        ImportPhase::Configuration,
        POLICY_RESOURCE,
        "policy",
        policy.name.clone(),
    );
    for activation in [&activations.staging, &activations.prod].into_iter().flatten() {
        script.push(
            ImportPhase::Activation,
            POLICY_ACTIVATION_RESOURCE,
            &format!("policy_activation_{}", activation.network),
            format!("{}:{}", policy.name, activation.network),
        );
    }
    for activation in load_balancer_activations {
        script.push(
            ImportPhase::Activation,
            LOAD_BALANCER_ACTIVATION_RESOURCE,
            &format!(
                "load_balancer_activation_{}_{}",
                escape_name(&activation.origin_id),
                activation.network
            ),
            format!("{}:{}", activation.origin_id, activation.network),
        );
    }
    script.ordered()
}

/// Resolve the output files for an export into `work_dir`
pub fn targets(work_dir: &Path) -> indexmap::IndexMap<String, std::path::PathBuf> {
    super::target_map(work_dir, FILES)
}

#[cfg(test)]
mod tests {
    use super::api::mock::MockCloudletsApi;
    use super::model::*;
    use super::*;
    use crate::template::TemplateError;
    use crate::template::testing::{render_all, rendered};
    use crate::traits::MockFileSystem;
    use crate::template::FsTemplateProcessor;
    use serde_json::Value;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Records the data it was given instead of rendering
    #[derive(Default)]
    struct RecordingProcessor {
        data: RefCell<Option<Value>>,
        fail: bool,
    }

    impl TemplateProcessor for RecordingProcessor {
        fn process_templates(&self, data: &Value) -> Result<(), TemplateError> {
            *self.data.borrow_mut() = Some(data.clone());
            if self.fail {
                return Err(TemplateError::NotFound("policy".to_string()));
            }
            Ok(())
        }
    }

    fn policy(id: i64, name: &str, code: &str) -> Policy {
        Policy {
            policy_id: id,
            group_id: 234,
            name: name.to_string(),
            description: String::new(),
            cloudlet_code: code.to_string(),
            activations: Vec::new(),
        }
    }

    fn activation(network: &str, version: i64, property: &str) -> PolicyActivation {
        PolicyActivation {
            network: network.to_string(),
            policy_info: PolicyInfo { version },
            property_info: PropertyInfo {
                name: property.to_string(),
            },
        }
    }

    fn version(policy_id: i64, version: i64, rules: Vec<MatchRule>) -> PolicyVersion {
        PolicyVersion {
            policy_id,
            version,
            description: format!("version {} description", version),
            match_rule_format: "1.0".to_string(),
            match_rules: rules,
        }
    }

    fn redirect_rule(name: &str) -> MatchRule {
        MatchRule::EdgeRedirector(RedirectRule {
            base: RuleBase {
                name: name.to_string(),
                start: 1,
                end: 2,
                match_url: Some("test.url".to_string()),
                matches: vec![MatchCriteria {
                    match_type: "cookie".to_string(),
                    match_value: Some("cookie=cookievalue".to_string()),
                    match_operator: "equals".to_string(),
                    case_sensitive: true,
                    negate: false,
                    check_ips: None,
                    object_match_value: None,
                }],
                ..Default::default()
            },
            redirect_url: "/abc/sss".to_string(),
            status_code: 307,
            use_relative_url: Some("copy_scheme_hostname".to_string()),
            use_incoming_query_string: false,
            use_incoming_scheme_and_host: true,
        })
    }

    fn alb_rule(origin: &str) -> MatchRule {
        MatchRule::ApplicationLoadBalancer(ForwardRule {
            base: RuleBase {
                name: "some rule".to_string(),
                id: Some(1234),
                start: 1,
                end: 2,
                ..Default::default()
            },
            forward_settings: ForwardSettings {
                origin_id: Some(origin.to_string()),
                ..Default::default()
            },
        })
    }

    fn er_api() -> MockCloudletsApi {
        let mut target = policy(2, "test_policy", "ER");
        target.activations = vec![
            activation("staging", 2, "prp_0"),
            activation("prod", 1, "prp_0"),
            activation("staging", 2, "prp_1"),
        ];

        MockCloudletsApi {
            policies: vec![policy(1, "some policy", "ER"), target],
            versions: HashMap::from([(
                2,
                vec![
                    version(2, 1, vec![]),
                    version(2, 2, vec![redirect_rule("r1"), redirect_rule("r2")]),
                ],
            )]),
            ..Default::default()
        }
    }

    #[test]
    fn test_snapshot_uses_latest_version_and_activations() {
        let api = er_api();

        let snapshot = build_snapshot(&api, "test_policy", "test_section").unwrap();

        assert_eq!(snapshot.policy_id, 2);
        assert_eq!(snapshot.description, "version 2 description");
        assert_eq!(snapshot.match_rules.len(), 2);
        assert_eq!(
            snapshot.match_rules_source,
            "akamai_cloudlets_edge_redirector_match_rule"
        );

        let staging = snapshot.activations.staging.unwrap();
        assert_eq!(staging.version, 2);
        assert_eq!(staging.properties, vec!["prp_0", "prp_1"]);
        let prod = snapshot.activations.prod.unwrap();
        assert_eq!(prod.version, 1);
        assert_eq!(prod.properties, vec!["prp_0"]);

        assert_eq!(api.call_count("get_policy_version(2,2)"), 1);
        assert_eq!(api.call_count("list_load_balancer"), 0);
    }

    #[test]
    fn test_rendered_activations_depend_on_staging() {
        let snapshot = build_snapshot(&er_api(), "test_policy", "test_section").unwrap();
        let (fs, dir) = render_all(&TEMPLATES, &snapshot);
        let policy_tf = rendered(&fs, &dir, "policy");

        assert!(policy_tf.contains(
            r#"resource "akamai_cloudlets_policy_activation" "policy_activation_staging" {"#
        ));
        assert!(policy_tf.contains(
            r#"resource "akamai_cloudlets_policy_activation" "policy_activation_prod" {"#
        ));
        assert!(policy_tf.contains("version = 2"));
        assert!(policy_tf.contains("version = 1"));
        assert!(policy_tf.contains(r#"associated_properties = ["prp_0", "prp_1"]"#));
        assert!(policy_tf.contains(r#"associated_properties = ["prp_0"]"#));
        assert!(policy_tf.contains(
            "depends_on = [akamai_cloudlets_policy_activation.policy_activation_staging]"
        ));

        let prod_block = policy_tf
            .split(r#""policy_activation_prod""#)
            .nth(1)
            .unwrap();
        assert!(prod_block.contains(r#"network = "prod""#));
        assert!(prod_block.contains("depends_on"));
    }

    #[test]
    fn test_prod_without_staging_has_no_dependency() {
        let mut api = er_api();
        api.policies[1].activations = vec![activation("prod", 1, "prp_0")];

        let snapshot = build_snapshot(&api, "test_policy", "s").unwrap();
        let (fs, dir) = render_all(&TEMPLATES, &snapshot);
        let policy_tf = rendered(&fs, &dir, "policy");

        assert!(!policy_tf.contains("policy_activation_staging"));
        assert!(policy_tf.contains("policy_activation_prod"));
        assert!(!policy_tf.contains("depends_on"));
    }

    #[test]
    fn test_rendered_policy_and_match_rules() {
        let snapshot = build_snapshot(&er_api(), "test_policy", "test_section").unwrap();
        let (fs, dir) = render_all(&TEMPLATES, &snapshot);

        let policy_tf = rendered(&fs, &dir, "policy");
        assert!(policy_tf.contains(r#"resource "akamai_cloudlets_policy" "policy" {"#));
        assert!(policy_tf.contains(r#"name = "test_policy""#));
        assert!(policy_tf.contains(r#"cloudlet_code = "ER""#));
        assert!(policy_tf.contains(r#"group_id = "234""#));
        assert!(policy_tf.contains(
            "match_rules = data.akamai_cloudlets_edge_redirector_match_rule.match_rules_er.json"
        ));

        let rules_tf = rendered(&fs, &dir, "match-rules");
        assert!(rules_tf.contains(
            r#"data "akamai_cloudlets_edge_redirector_match_rule" "match_rules_er" {"#
        ));
        assert!(rules_tf.contains(r#"name = "r1""#));
        assert!(rules_tf.contains(r#"redirect_url = "/abc/sss""#));
        assert!(rules_tf.contains("status_code = 307"));
        assert!(rules_tf.contains(r#"match_value = "cookie=cookievalue""#));
        assert!(rules_tf.contains("use_incoming_scheme_and_host = true"));

        let variables_tf = rendered(&fs, &dir, "variables");
        assert!(variables_tf.contains(r#"default = "test_section""#));

        let imports = rendered(&fs, &dir, "imports");
        assert!(imports.contains("terraform import akamai_cloudlets_policy.policy 'test_policy'"));
        assert!(imports.contains(
            "terraform import akamai_cloudlets_policy_activation.policy_activation_staging 'test_policy:staging'"
        ));
        let policy_pos = imports.find("akamai_cloudlets_policy.policy").unwrap();
        let activation_pos = imports.find("policy_activation_staging").unwrap();
        assert!(policy_pos < activation_pos);
    }

    #[test]
    fn test_load_balancers_for_alb_policy() {
        let lb = |version| LoadBalancerVersion {
            origin_id: "test_origin".to_string(),
            version,
            description: "test description".to_string(),
            balancing_type: Some("WEIGHTED".to_string()),
            data_centers: Vec::new(),
            liveness_settings: None,
        };
        let lb_activation = |network, version, date: &str| LoadBalancerActivation {
            origin_id: "test_origin".to_string(),
            network,
            version,
            activated_date: date.to_string(),
        };
        let api = MockCloudletsApi {
            policies: vec![policy(2, "test_policy", "ALB")],
            versions: HashMap::from([(
                2,
                vec![version(2, 1, vec![alb_rule("test_origin"), alb_rule("test_origin")])],
            )]),
            load_balancers: HashMap::from([("test_origin".to_string(), vec![lb(1), lb(2)])]),
            load_balancer_activations: HashMap::from([(
                "test_origin".to_string(),
                vec![
                    lb_activation(Network::Production, 2, "2021-10-29T00:00:10.000Z"),
                    lb_activation(Network::Staging, 1, "2021-10-28T00:00:00.000Z"),
                    lb_activation(Network::Staging, 2, "2021-10-29T00:00:20.000Z"),
                ],
            )]),
            ..Default::default()
        };

        let snapshot = build_snapshot(&api, "test_policy", "s").unwrap();

        assert_eq!(api.call_count("list_load_balancer_versions(test_origin)"), 1);
        assert_eq!(snapshot.load_balancers.len(), 1);
        assert_eq!(snapshot.load_balancers[0].version, 2);
        assert_eq!(snapshot.load_balancer_activations.len(), 2);
        assert_eq!(snapshot.load_balancer_activations[0].network, Network::Staging);
        assert_eq!(
            snapshot.load_balancer_activations[0].activated_date,
            "2021-10-29T00:00:20.000Z"
        );

        let (fs, dir) = render_all(&TEMPLATES, &snapshot);
        let lb_tf = rendered(&fs, &dir, "load-balancer");
        assert!(lb_tf.contains(
            r#"resource "akamai_cloudlets_application_load_balancer" "load_balancer_test_origin" {"#
        ));
        assert!(lb_tf.contains(r#""load_balancer_activation_test_origin_staging""#));
        assert!(lb_tf.contains(r#""load_balancer_activation_test_origin_prod""#));
        assert!(lb_tf.contains(
            "origin_id = akamai_cloudlets_application_load_balancer.load_balancer_test_origin.origin_id"
        ));

        let imports = rendered(&fs, &dir, "imports");
        let lb_pos = imports.find("load_balancer_test_origin 'test_origin'").unwrap();
        let lb_activation_pos = imports.find("load_balancer_activation_test_origin_prod").unwrap();
        assert!(lb_pos < lb_activation_pos);
    }

    #[test]
    fn test_phased_release_keeps_zero_percent() {
        let rule = MatchRule::PhasedRelease(ForwardRule {
            base: RuleBase {
                name: "dark launch".to_string(),
                ..Default::default()
            },
            forward_settings: ForwardSettings {
                origin_id: Some("origin_a".to_string()),
                percent: Some(0),
                ..Default::default()
            },
        });
        let api = MockCloudletsApi {
            policies: vec![policy(7, "phased", "CD")],
            versions: HashMap::from([(7, vec![version(7, 1, vec![rule])])]),
            ..Default::default()
        };

        let snapshot = build_snapshot(&api, "phased", "s").unwrap();
        let (fs, dir) = render_all(&TEMPLATES, &snapshot);
        let rules_tf = rendered(&fs, &dir, "match-rules");

        assert!(rules_tf.contains(r#"origin_id = "origin_a""#));
        assert!(rules_tf.contains("percent = 0"));
    }

    #[test]
    fn test_unsupported_cloudlet() {
        let api = MockCloudletsApi {
            policies: vec![policy(1, "gone", "XX")],
            ..Default::default()
        };

        let err = build_snapshot(&api, "gone", "s").unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedType { ref code, .. } if code == "XX"));
        assert_eq!(api.call_count("list_policy_versions"), 0);
    }

    #[test]
    fn test_policy_not_found() {
        let err = build_snapshot(&er_api(), "missing", "s").unwrap_err();
        assert!(matches!(err, ExportError::NotFound { ref name, .. } if name == "missing"));
    }

    #[test]
    fn test_error_phases() {
        let api = MockCloudletsApi {
            failing: vec!["list_policies"],
            ..er_api()
        };
        let err = build_snapshot(&api, "test_policy", "s").unwrap_err();
        assert!(matches!(err, ExportError::Fetch { phase: FetchPhase::Listing, .. }));

        let api = MockCloudletsApi {
            failing: vec!["list_policy_versions"],
            ..er_api()
        };
        let err = build_snapshot(&api, "test_policy", "s").unwrap_err();
        assert!(matches!(err, ExportError::Fetch { phase: FetchPhase::VersionFetch, .. }));

        let api = MockCloudletsApi {
            failing: vec!["get_policy_version"],
            ..er_api()
        };
        let err = build_snapshot(&api, "test_policy", "s").unwrap_err();
        assert!(matches!(err, ExportError::Fetch { phase: FetchPhase::DetailFetch, .. }));
    }

    #[test]
    fn test_no_versions() {
        let api = MockCloudletsApi {
            versions: HashMap::new(),
            ..er_api()
        };

        let err = build_snapshot(&api, "test_policy", "s").unwrap_err();
        assert!(matches!(err, ExportError::NoVersions { .. }));
    }

    #[test]
    fn test_processor_failure_is_saving_files() {
        let processor = RecordingProcessor {
            fail: true,
            ..Default::default()
        };

        let err = export_policy(&er_api(), &processor, "test_policy", "s").unwrap_err();

        assert!(matches!(err, ExportError::SavingFiles(_)));
        let data = processor.data.borrow().clone().unwrap();
        assert_eq!(data["name"], "test_policy");
        assert_eq!(data["activations"]["staging"]["version"], 2);
        assert_eq!(data["match_rules"][0]["type"], "erMatchRule");
    }

    #[test]
    fn test_export_writes_every_file() {
        let fs = Arc::new(MockFileSystem::new());
        let processor =
            FsTemplateProcessor::new(&TEMPLATES, targets(Path::new("/work")), fs.clone()).unwrap();

        export_policy(&er_api(), &processor, "test_policy", "s").unwrap();

        for (_, file) in FILES {
            assert!(fs.has_file(&Path::new("/work").join(file)), "missing {}", file);
        }
    }
}
