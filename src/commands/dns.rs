use anyhow::{Context as _, Result};

use super::ExportOptions;
use crate::context::Context;
use crate::providers::dns::{self, api::DnsApi};
use crate::tfstate::TerraformState;

pub struct ExportZoneCommand;

impl ExportZoneCommand {
    /// Export one Edge DNS zone; with `skip_imported`, resources already in
    /// the work directory's Terraform state are left out of `import.sh`
    pub fn execute(
        ctx: &Context,
        options: &ExportOptions,
        zone: &str,
        skip_imported: bool,
    ) -> Result<()> {
        super::announce(ctx, "Export DNS Zone", "Zone", zone, options);
        let client = options.client(ctx)?;
        Self::run(ctx, &client, options, zone, skip_imported)
    }

    fn run(
        ctx: &Context,
        api: &dyn DnsApi,
        options: &ExportOptions,
        zone: &str,
        skip_imported: bool,
    ) -> Result<()> {
        let targets = dns::targets(&options.work_dir, zone);
        let processor = options.processor(ctx, &dns::TEMPLATES, targets.clone())?;
        let state = skip_imported.then(|| TerraformState::in_dir(&options.work_dir));

        let snapshot = dns::export_zone(api, &processor, zone, &options.section, state.as_ref())
            .with_context(|| format!("Error exporting zone '{}'", zone))?;

        ctx.output.success(&format!(
            "Exported zone '{}' with {} record sets",
            zone,
            snapshot.records.len()
        ));
        if snapshot.imports.is_empty() {
            ctx.output.warning("Every resource is already in Terraform state; import.sh is empty");
        }
        super::report_files(ctx, &targets);
        Ok(())
    }
}
