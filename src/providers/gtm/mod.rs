//! Global Traffic Management domain export
//!
//! Renders the domain, its datacenters, geographic maps and properties.
//! The three default datacenters exist in every domain and are never emitted;
//! references to them stay literal IDs.

pub mod api;
pub mod helpers;
pub mod model;

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::edgegrid::ApiError;
use crate::error::{ExportError, FetchPhase};
use crate::import_script::{ImportPhase, ImportScript};
use crate::template::helpers::escape_name;
use crate::template::{TemplateProcessor, TemplateSet, template_data};
use api::GtmApi;
use helpers::DEFAULT_DATACENTERS;
use model::{Datacenter, Domain, GeoMap, Property};

pub const TEMPLATES: TemplateSet = TemplateSet {
    templates: &[
        ("domain", include_str!("templates/domain.hbs")),
        ("datacenters", include_str!("templates/datacenters.hbs")),
        ("properties", include_str!("templates/properties.hbs")),
        ("variables", include_str!("templates/variables.hbs")),
        ("imports", include_str!("templates/imports.hbs")),
    ],
    partials: &[],
    helpers: helpers::register,
};

pub const FILES: &[(&str, &str)] = &[
    ("domain", "domain.tf"),
    ("datacenters", "datacenters.tf"),
    ("properties", "properties.tf"),
    ("variables", "variables.tf"),
    ("imports", "import.sh"),
];

#[derive(Debug, Serialize)]
pub struct DomainSnapshot {
    pub domain: Domain,
    pub resource_name: String,
    pub datacenters: Vec<DatacenterData>,
    pub geo_maps: Vec<GeoMapData>,
    pub properties: Vec<PropertyData>,
    pub section: String,
    pub imports: ImportScript,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatacenterData {
    #[serde(flatten)]
    pub datacenter: Datacenter,
    pub resource_name: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeoMapData {
    #[serde(flatten)]
    pub map: GeoMap,
    pub resource_name: String,
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyData {
    #[serde(flatten)]
    pub property: Property,
    pub resource_name: String,
    /// Addresses of the domain and every exported datacenter this property targets
    pub depends_on: Vec<String>,
}

/// Fetch a domain and render it through `processor`
pub fn export_domain(
    api: &dyn GtmApi,
    processor: &dyn TemplateProcessor,
    domain_name: &str,
    section: &str,
) -> Result<DomainSnapshot, ExportError> {
    let snapshot = build_snapshot(api, domain_name, section)?;

    tracing::info!(
        domain = domain_name,
        datacenters = snapshot.datacenters.len(),
        properties = snapshot.properties.len(),
        "saving terraform configuration"
    );
    processor.process_templates(&template_data(&snapshot)?)?;
    Ok(snapshot)
}

pub fn build_snapshot(
    api: &dyn GtmApi,
    domain_name: &str,
    section: &str,
) -> Result<DomainSnapshot, ExportError> {
    tracing::info!(domain = domain_name, "fetching domain");
    let mut domain = api.get_domain(domain_name).map_err(|e| match e {
        ApiError::Status { status: 404, .. } => ExportError::NotFound {
            kind: "domain",
            name: domain_name.to_string(),
        },
        other => ExportError::fetch("domain", FetchPhase::DetailFetch, other),
    })?;

    let resource_name = escape_name(&domain.name);
    let domain_address = format!("akamai_gtm_domain.{}", resource_name);

    let datacenters: Vec<DatacenterData> = std::mem::take(&mut domain.datacenters)
        .into_iter()
        .map(|datacenter| DatacenterData {
            resource_name: datacenter_resource_name(&datacenter),
            is_default: DEFAULT_DATACENTERS.contains(&datacenter.datacenter_id),
            datacenter,
        })
        .collect();

    let geo_maps: Vec<GeoMapData> = std::mem::take(&mut domain.geographic_maps)
        .into_iter()
        .map(|map| GeoMapData {
            resource_name: escape_name(&map.name),
            depends_on: dependencies(
                &domain_address,
                &datacenters,
                std::iter::once(map.default_datacenter.datacenter_id)
                    .chain(map.assignments.iter().map(|a| a.datacenter_id)),
            ),
            map,
        })
        .collect();

    let properties: Vec<PropertyData> = std::mem::take(&mut domain.properties)
        .into_iter()
        .map(|property| PropertyData {
            resource_name: escape_name(&property.name),
            depends_on: dependencies(
                &domain_address,
                &datacenters,
                property.traffic_targets.iter().map(|t| t.datacenter_id),
            ),
            property,
        })
        .collect();

    let imports = import_script(&domain.name, &resource_name, &datacenters, &geo_maps, &properties);

    Ok(DomainSnapshot {
        domain,
        resource_name,
        datacenters,
        geo_maps,
        properties,
        section: section.to_string(),
        imports,
    })
}

/// The domain plus every exported datacenter among `ids`
fn dependencies(
    domain_address: &str,
    datacenters: &[DatacenterData],
    ids: impl IntoIterator<Item = i64>,
) -> Vec<String> {
    let referenced: BTreeSet<i64> = ids.into_iter().collect();
    std::iter::once(domain_address.to_string())
        .chain(
            datacenters
                .iter()
                .filter(|dc| !dc.is_default && referenced.contains(&dc.datacenter.datacenter_id))
                .map(|dc| format!("akamai_gtm_datacenter.{}", dc.resource_name)),
        )
        .collect()
}

fn datacenter_resource_name(datacenter: &Datacenter) -> String {
    if datacenter.nickname.is_empty() {
        format!("datacenter_{}", datacenter.datacenter_id)
    } else {
        escape_name(&datacenter.nickname)
    }
}

fn import_script(
    domain: &str,
    resource_name: &str,
    datacenters: &[DatacenterData],
    geo_maps: &[GeoMapData],
    properties: &[PropertyData],
) -> ImportScript {
    let mut script = ImportScript::new();
    script.push(
        ImportPhase::Configuration,
        "akamai_gtm_domain",
        resource_name,
        domain,
    );
    for dc in datacenters.iter().filter(|dc| !dc.is_default) {
        script.push(
            ImportPhase::GlobalSettings,
            "akamai_gtm_datacenter",
            &dc.resource_name,
            format!("{}:{}", domain, dc.datacenter.datacenter_id),
        );
    }
    for map in geo_maps {
        script.push(
            ImportPhase::DomainSettings,
            "akamai_gtm_geomap",
            &map.resource_name,
            format!("{}:{}", domain, map.map.name),
        );
    }
    for property in properties {
        script.push(
            ImportPhase::DomainSettings,
            "akamai_gtm_property",
            &property.resource_name,
            format!("{}:{}", domain, property.property.name),
        );
    }
    script.ordered()
}

pub fn targets(work_dir: &Path) -> IndexMap<String, PathBuf> {
    super::target_map(work_dir, FILES)
}

#[cfg(test)]
mod tests {
    use super::api::mock::MockGtmApi;
    use super::*;
    use crate::template::testing::{render_all, rendered};

    fn domain() -> Domain {
        serde_json::from_str(
            r#"{
              "name": "example.akadns.net",
              "type": "weighted",
              "comment": "managed by ops",
              "emailNotificationList": ["ops@example.com"],
              "loadImbalancePercentage": 10.0,
              "datacenters": [
                {"datacenterId": 3131, "nickname": "DC 1", "city": "Chicago", "country": "US",
                 "continent": "NA", "latitude": 41.88, "longitude": -87.63},
                {"datacenterId": 3132, "nickname": ""},
                {"datacenterId": 5400, "nickname": "Default Datacenter"}
              ],
              "geographicMaps": [{
                "name": "geo",
                "defaultDatacenter": {"datacenterId": 5400, "nickname": "Default Datacenter"},
                "assignments": [{"datacenterId": 3131, "nickname": "DC 1", "countries": ["US", "CA"]}]
              }],
              "properties": [{
                "name": "www",
                "type": "weighted-round-robin",
                "handoutMode": "normal",
                "scoreAggregationType": "mean",
                "trafficTargets": [
                  {"datacenterId": 3131, "enabled": true, "weight": 50, "servers": ["192.0.2.10"]},
                  {"datacenterId": 5400, "enabled": false, "weight": 50, "servers": []}
                ],
                "livenessTests": [{"name": "http", "testObjectProtocol": "HTTP",
                                   "testInterval": 60, "testTimeout": 10, "testObject": "/health",
                                   "testObjectPort": 80}]
              }]
            }"#,
        )
        .unwrap()
    }

    fn api() -> MockGtmApi {
        MockGtmApi {
            domain: Some(domain()),
        }
    }

    #[test]
    fn test_default_datacenters_are_not_imported() {
        let snapshot = build_snapshot(&api(), "example.akadns.net", "default").unwrap();

        let addresses: Vec<&str> = snapshot
            .imports
            .statements()
            .iter()
            .map(|s| s.address.as_str())
            .collect();
        assert_eq!(
            addresses,
            vec![
                "akamai_gtm_domain.example_akadns_net",
                "akamai_gtm_datacenter.DC_1",
                "akamai_gtm_datacenter.datacenter_3132",
                "akamai_gtm_geomap.geo",
                "akamai_gtm_property.www",
            ]
        );
        assert_eq!(snapshot.imports.statements()[1].id, "example.akadns.net:3131");
        assert_eq!(snapshot.imports.statements()[4].id, "example.akadns.net:www");
    }

    #[test]
    fn test_dependencies_skip_default_datacenters() {
        let snapshot = build_snapshot(&api(), "example.akadns.net", "default").unwrap();

        assert_eq!(
            snapshot.properties[0].depends_on,
            vec![
                "akamai_gtm_domain.example_akadns_net",
                "akamai_gtm_datacenter.DC_1"
            ]
        );
        assert_eq!(snapshot.geo_maps[0].depends_on.len(), 2);
    }

    #[test]
    fn test_missing_domain_is_not_found() {
        let err = build_snapshot(&api(), "other.akadns.net", "default").unwrap_err();
        assert!(matches!(err, ExportError::NotFound { kind: "domain", .. }));
    }

    #[test]
    fn test_rendered_domain() {
        let snapshot = build_snapshot(&api(), "example.akadns.net", "gtm").unwrap();
        let (fs, dir) = render_all(&TEMPLATES, &snapshot);

        let domain_tf = rendered(&fs, &dir, "domain");
        assert!(domain_tf.contains(r#"resource "akamai_gtm_domain" "example_akadns_net" {"#));
        assert!(domain_tf.contains(r#"type = "weighted""#));
        assert!(domain_tf.contains(r#"email_notification_list = ["ops@example.com"]"#));

        let datacenters = rendered(&fs, &dir, "datacenters");
        assert!(datacenters.contains(r#"resource "akamai_gtm_datacenter" "DC_1" {"#));
        assert!(datacenters.contains(r#"city = "Chicago""#));
        assert!(!datacenters.contains("Default Datacenter"));

        let properties = rendered(&fs, &dir, "properties");
        assert!(properties.contains(r#"resource "akamai_gtm_property" "www" {"#));
        assert!(properties.contains("datacenter_id = akamai_gtm_datacenter.DC_1.datacenter_id"));
        assert!(properties.contains("datacenter_id = 5400"));
        assert!(properties.contains(r#"servers = ["192.0.2.10"]"#));
        assert!(properties.contains(r#"test_object = "/health""#));
        assert!(properties.contains(r#"resource "akamai_gtm_geomap" "geo" {"#));
        assert!(properties.contains(r#"countries = ["US", "CA"]"#));
        let geomap = properties
            .split(r#""akamai_gtm_geomap" "geo""#)
            .nth(1)
            .and_then(|rest| rest.split("akamai_gtm_property").next())
            .unwrap();
        assert!(geomap.contains("datacenter_id = akamai_gtm_datacenter.DC_1.datacenter_id"));
        assert!(properties.contains(
            "depends_on = [akamai_gtm_domain.example_akadns_net, akamai_gtm_datacenter.DC_1]"
        ));

        let imports = rendered(&fs, &dir, "imports");
        assert!(imports.contains(
            "terraform import akamai_gtm_datacenter.DC_1 'example.akadns.net:3131'"
        ));
    }

    #[test]
    fn test_zero_values_are_rendered() {
        let mut domain = domain();
        domain.datacenters[0].latitude = Some(0.0);
        domain.datacenters[0].longitude = Some(0.0);
        domain.properties[0].liveness_tests[0].test_object_port = Some(0);
        let api = MockGtmApi {
            domain: Some(domain),
        };

        let snapshot = build_snapshot(&api, "example.akadns.net", "gtm").unwrap();
        let (fs, dir) = render_all(&TEMPLATES, &snapshot);

        let datacenters = rendered(&fs, &dir, "datacenters");
        assert!(datacenters.contains("latitude = 0.0"));
        assert!(datacenters.contains("longitude = 0.0"));
        let properties = rendered(&fs, &dir, "properties");
        assert!(properties.contains("test_object_port = 0"));
    }
}
