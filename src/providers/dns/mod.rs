//! Edge DNS zone export
//!
//! Renders the zone and, for primary zones, every record set it holds.

pub mod api;
pub mod model;

use handlebars::Handlebars;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::edgegrid::ApiError;
use crate::error::{ExportError, FetchPhase};
use crate::import_script::{ImportPhase, ImportScript};
use crate::pagination::{self, DEFAULT_PAGE_SIZE};
use crate::template::helpers::escape_name;
use crate::template::{TemplateProcessor, TemplateSet, template_data};
use crate::tfstate::TerraformState;
use api::DnsApi;
use model::{RecordSet, Soa, Zone};

pub const TEMPLATES: TemplateSet = TemplateSet {
    templates: &[
        ("zone", include_str!("templates/zone.hbs")),
        ("variables", include_str!("templates/dnsvars.hbs")),
        ("imports", include_str!("templates/imports.hbs")),
    ],
    partials: &[],
    helpers: no_extra_helpers,
};

fn no_extra_helpers(_: &mut Handlebars<'static>) {}

const ZONE_RESOURCE: &str = "akamai_dns_zone";
const RECORD_RESOURCE: &str = "akamai_dns_record";

#[derive(Debug, Serialize)]
pub struct ZoneSnapshot {
    #[serde(flatten)]
    pub zone: Zone,
    pub block_name: String,
    pub records: Vec<RecordSnapshot>,
    pub section: String,
    pub imports: ImportScript,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSnapshot {
    pub resource_name: String,
    pub name: String,
    pub record_type: String,
    pub ttl: i64,
    pub target: Vec<String>,
    pub soa: Option<Soa>,
}

/// Resource name for a record set, unique per (name, type) within a zone
pub fn record_resource_name(zone: &str, name: &str, record_type: &str) -> String {
    escape_name(&format!("{}_{}_{}", zone, name, record_type))
}

/// Output files of a zone export; the zone file is named after the zone
///
/// Path separators in the zone become `_` so the file stays in `work_dir`.
pub fn targets(work_dir: &Path, zone: &str) -> IndexMap<String, PathBuf> {
    let zone_file = format!("{}.tf", zone.replace(['/', '\\'], "_"));
    super::target_map(
        work_dir,
        &[
            ("zone", zone_file.as_str()),
            ("variables", "dnsvars.tf"),
            ("imports", "import.sh"),
        ],
    )
}

/// Fetch a zone and render it through `processor`
///
/// With `state`, resources already present in Terraform state are left out
/// of the import script.
pub fn export_zone(
    api: &dyn DnsApi,
    processor: &dyn TemplateProcessor,
    zone_name: &str,
    section: &str,
    state: Option<&TerraformState>,
) -> Result<ZoneSnapshot, ExportError> {
    let mut snapshot = build_snapshot(api, zone_name, section)?;
    if let Some(state) = state {
        snapshot.imports = std::mem::take(&mut snapshot.imports).skip_imported(state);
    }

    tracing::info!(zone = zone_name, records = snapshot.records.len(), "saving terraform configuration");
    processor.process_templates(&template_data(&snapshot)?)?;
    Ok(snapshot)
}

pub fn build_snapshot(
    api: &dyn DnsApi,
    zone_name: &str,
    section: &str,
) -> Result<ZoneSnapshot, ExportError> {
    tracing::info!(zone = zone_name, "fetching zone");
    let zone = api.get_zone(zone_name).map_err(|e| match e {
        ApiError::Status { status: 404, .. } => ExportError::NotFound {
            kind: "zone",
            name: zone_name.to_string(),
        },
        other => ExportError::fetch("zone", FetchPhase::DetailFetch, other),
    })?;

    let records = if zone.is_primary() {
        pagination::collect_all("record set", DEFAULT_PAGE_SIZE, |page| {
            api.list_recordsets(zone_name, page)
        })?
        .into_iter()
        .map(|rs| record_snapshot(zone_name, rs))
        .collect()
    } else {
        Vec::new()
    };

    let block_name = escape_name(&zone.zone);
    let mut imports = ImportScript::new();
    imports.push(
        ImportPhase::Configuration,
        ZONE_RESOURCE,
        &block_name,
        zone.zone.clone(),
    );
    for record in &records {
        imports.push(
            ImportPhase::NestedActions,
            RECORD_RESOURCE,
            &record.resource_name,
            format!("{}#{}#{}", zone.zone, record.name, record.record_type),
        );
    }

    Ok(ZoneSnapshot {
        zone,
        block_name,
        records,
        section: section.to_string(),
        imports: imports.ordered(),
    })
}

fn record_snapshot(zone: &str, rs: RecordSet) -> RecordSnapshot {
    let soa = if rs.record_type.eq_ignore_ascii_case("SOA") {
        let parsed = rs.rdata.first().and_then(|rdata| Soa::parse(rdata));
        if parsed.is_none() {
            tracing::warn!(record = %rs.name, "unparseable SOA rdata, exporting as target");
        }
        parsed
    } else {
        None
    };

    RecordSnapshot {
        resource_name: record_resource_name(zone, &rs.name, &rs.record_type),
        name: rs.name,
        record_type: rs.record_type,
        ttl: rs.ttl,
        target: rs.rdata,
        soa,
    }
}
