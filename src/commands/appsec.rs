use anyhow::{Context as _, Result};

use super::ExportOptions;
use crate::context::Context;
use crate::providers::appsec::{self, api::AppsecApi};

pub struct ExportAppsecCommand;

impl ExportAppsecCommand {
    /// Export the latest version of a security configuration
    pub fn execute(ctx: &Context, options: &ExportOptions, config_name: &str) -> Result<()> {
        super::announce(ctx, "Export Security Configuration", "Configuration", config_name, options);
        let client = options.client(ctx)?;
        Self::run(ctx, &client, options, config_name)
    }

    fn run(
        ctx: &Context,
        api: &dyn AppsecApi,
        options: &ExportOptions,
        config_name: &str,
    ) -> Result<()> {
        let targets = appsec::targets(&options.work_dir);
        let processor = options.processor(ctx, &appsec::TEMPLATES, targets.clone())?;

        let snapshot = appsec::export_config(api, &processor, config_name, &options.section)
            .with_context(|| format!("Error exporting security configuration '{}'", config_name))?;

        ctx.output.success(&format!(
            "Exported '{}' version {} with {} security policies",
            snapshot.config_name,
            snapshot.version,
            snapshot.policies.len()
        ));
        super::report_files(ctx, &targets);
        Ok(())
    }
}
