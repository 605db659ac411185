use anyhow::{Context as _, Result};

use super::ExportOptions;
use crate::context::Context;
use crate::providers::gtm::{self, api::GtmApi};

pub struct ExportDomainCommand;

impl ExportDomainCommand {
    pub fn execute(ctx: &Context, options: &ExportOptions, domain: &str) -> Result<()> {
        super::announce(ctx, "Export GTM Domain", "Domain", domain, options);
        let client = options.client(ctx)?;
        Self::run(ctx, &client, options, domain)
    }

    fn run(ctx: &Context, api: &dyn GtmApi, options: &ExportOptions, domain: &str) -> Result<()> {
        let targets = gtm::targets(&options.work_dir);
        let processor = options.processor(ctx, &gtm::TEMPLATES, targets.clone())?;

        let snapshot = gtm::export_domain(api, &processor, domain, &options.section)
            .with_context(|| format!("Error exporting domain '{}'", domain))?;

        ctx.output.success(&format!(
            "Exported domain '{}' with {} properties",
            domain,
            snapshot.properties.len()
        ));
        super::report_files(ctx, &targets);
        Ok(())
    }
}
