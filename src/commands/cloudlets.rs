use anyhow::{Context as _, Result};

use super::ExportOptions;
use crate::context::Context;
use crate::providers::cloudlets::{self, api::CloudletsApi};

pub struct ExportCloudletsPolicyCommand;

impl ExportCloudletsPolicyCommand {
    /// Export one cloudlets policy into `options.work_dir`
    pub fn execute(ctx: &Context, options: &ExportOptions, policy_name: &str) -> Result<()> {
        super::announce(ctx, "Export Cloudlets Policy", "Policy", policy_name, options);
        let client = options.client(ctx)?;
        Self::run(ctx, &client, options, policy_name)
    }

    fn run(
        ctx: &Context,
        api: &dyn CloudletsApi,
        options: &ExportOptions,
        policy_name: &str,
    ) -> Result<()> {
        let targets = cloudlets::targets(&options.work_dir);
        let processor = options.processor(ctx, &cloudlets::TEMPLATES, targets.clone())?;

        let snapshot = cloudlets::export_policy(api, &processor, policy_name, &options.section)
            .with_context(|| format!("Error exporting policy '{}'", policy_name))?;

        ctx.output.success(&format!(
            "Exported {} policy '{}' with {} match rules",
            snapshot.cloudlet_code,
            snapshot.name,
            snapshot.match_rules.len()
        ));
        super::report_files(ctx, &targets);
        Ok(())
    }
}
