use anyhow::{Context as _, Result};

use super::ExportOptions;
use crate::context::Context;
use crate::providers::property::{self, api::PropertyApi};

pub struct ExportPropertyCommand;

impl ExportPropertyCommand {
    pub fn execute(ctx: &Context, options: &ExportOptions, property_name: &str) -> Result<()> {
        super::announce(ctx, "Export Property", "Property", property_name, options);
        let client = options.client(ctx)?;
        Self::run(ctx, &client, options, property_name)
    }

    fn run(
        ctx: &Context,
        api: &dyn PropertyApi,
        options: &ExportOptions,
        property_name: &str,
    ) -> Result<()> {
        let targets = property::targets(&options.work_dir);
        let processor = options.processor(ctx, &property::TEMPLATES, targets.clone())?;

        let snapshot = property::export_property(api, &processor, property_name, &options.section)
            .with_context(|| format!("Error exporting property '{}'", property_name))?;

        ctx.output.success(&format!(
            "Exported property '{}' version {} ({} hostnames)",
            snapshot.property_name,
            snapshot.version,
            snapshot.hostnames.len()
        ));
        super::report_files(ctx, &targets);
        Ok(())
    }
}
