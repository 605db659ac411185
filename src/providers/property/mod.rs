//! Property Manager export
//!
//! The latest property version becomes an `akamai_property` resource with
//! inline hostnames; its rule tree goes to `rules.json` next to it.

pub mod api;
pub mod model;

use handlebars::Handlebars;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::activation::Network;
use crate::error::{ExportError, FetchPhase};
use crate::import_script::{ImportPhase, ImportScript};
use crate::pagination::{self, DEFAULT_PAGE_SIZE};
use crate::template::helpers::escape_name;
use crate::template::{TemplateProcessor, TemplateSet, template_data};
use api::PropertyApi;
use model::{Hostname, Property};

pub const TEMPLATES: TemplateSet = TemplateSet {
    templates: &[
        ("property", include_str!("templates/property.hbs")),
        ("rules", include_str!("templates/rules.hbs")),
        ("variables", include_str!("templates/variables.hbs")),
        ("imports", include_str!("templates/imports.hbs")),
    ],
    partials: &[],
    helpers: no_extra_helpers,
};

pub const FILES: &[(&str, &str)] = &[
    ("property", "property.tf"),
    ("rules", "rules.json"),
    ("variables", "variables.tf"),
    ("imports", "import.sh"),
];

fn no_extra_helpers(_: &mut Handlebars<'static>) {}

#[derive(Debug, Serialize)]
pub struct PropertySnapshot {
    pub property_name: String,
    pub resource_name: String,
    pub property_id: String,
    pub contract_id: String,
    pub group_id: String,
    pub product_id: String,
    pub rule_format: String,
    pub version: i64,
    pub hostnames: Vec<Hostname>,
    pub rules: Value,
    pub activations: Vec<PropertyActivation>,
    pub section: String,
    pub imports: ImportScript,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyActivation {
    pub network: Network,
    pub network_name: &'static str,
    pub version: i64,
}

/// Fetch a property and render it through `processor`
pub fn export_property(
    api: &dyn PropertyApi,
    processor: &dyn TemplateProcessor,
    property_name: &str,
    section: &str,
) -> Result<PropertySnapshot, ExportError> {
    let snapshot = build_snapshot(api, property_name, section)?;

    tracing::info!(
        property = property_name,
        version = snapshot.version,
        "saving terraform configuration"
    );
    processor.process_templates(&template_data(&snapshot)?)?;
    Ok(snapshot)
}

pub fn build_snapshot(
    api: &dyn PropertyApi,
    property_name: &str,
    section: &str,
) -> Result<PropertySnapshot, ExportError> {
    tracing::info!(property = property_name, "searching property");
    let hit = api
        .search_property(property_name)
        .map_err(|e| ExportError::fetch("property", FetchPhase::Listing, e))?
        .into_iter()
        .find(|hit| hit.property_name == property_name)
        .ok_or_else(|| ExportError::NotFound {
            kind: "property",
            name: property_name.to_string(),
        })?;

    let property: Property = api
        .get_property(&hit)
        .map_err(|e| ExportError::fetch("property", FetchPhase::DetailFetch, e))?;

    let version = pagination::latest_version(
        "property version",
        DEFAULT_PAGE_SIZE,
        |page| api.list_versions(&property, page),
        |version| api.get_version(&property, version),
    )?;
    let version_number = version.property_version;
    tracing::debug!(property_id = %property.property_id, version = version_number, "latest version");

    let tree = api
        .get_rule_tree(&property, version_number)
        .map_err(|e| ExportError::fetch("rule tree", FetchPhase::DetailFetch, e))?;
    let hostnames = api
        .list_hostnames(&property, version_number)
        .map_err(|e| ExportError::fetch("property hostnames", FetchPhase::DetailFetch, e))?;

    let activations: Vec<PropertyActivation> = [
        (Network::Staging, "STAGING", property.staging_version),
        (Network::Production, "PRODUCTION", property.production_version),
    ]
    .into_iter()
    .filter_map(|(network, network_name, version)| {
        version.map(|version| PropertyActivation {
            network,
            network_name,
            version,
        })
    })
    .collect();

    let resource_name = escape_name(&property.property_name);
    let imports = import_script(&property, &resource_name, &activations);
    let rule_format = version.rule_format.unwrap_or(tree.rule_format);

    Ok(PropertySnapshot {
        property_name: property.property_name,
        resource_name,
        property_id: property.property_id,
        contract_id: property.contract_id,
        group_id: property.group_id,
        product_id: version.product_id,
        rule_format,
        version: version_number,
        hostnames,
        rules: tree.rules,
        activations,
        section: section.to_string(),
        imports,
    })
}

fn import_script(
    property: &Property,
    resource_name: &str,
    activations: &[PropertyActivation],
) -> ImportScript {
    let mut script = ImportScript::new();
    script.push(
        ImportPhase::Configuration,
        "akamai_property",
        resource_name,
        format!(
            "{},{},{}",
            property.property_id, property.contract_id, property.group_id
        ),
    );
    for activation in activations {
        script.push(
            ImportPhase::Activation,
            "akamai_property_activation",
            &format!("{}_{}", resource_name, activation.network),
            format!("{}:{}", property.property_id, activation.network_name),
        );
    }
    script.ordered()
}

pub fn targets(work_dir: &Path) -> IndexMap<String, PathBuf> {
    super::target_map(work_dir, FILES)
}
