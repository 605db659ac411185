pub mod appsec;
pub mod cloudlets;
pub mod dns;
pub mod gtm;
pub mod property;

pub use appsec::ExportAppsecCommand;
pub use cloudlets::ExportCloudletsPolicyCommand;
pub use dns::ExportZoneCommand;
pub use gtm::ExportDomainCommand;
pub use property::ExportPropertyCommand;

use anyhow::{Context as _, Result};
use indexmap::IndexMap;
use std::path::PathBuf;

use crate::context::Context;
use crate::edgegrid::{Credentials, EdgeGridClient};
use crate::error::ExportError;
use crate::template::{FsTemplateProcessor, TemplateSet};

/// Settings shared by every export command
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub edgerc: PathBuf,
    pub section: String,
    pub work_dir: PathBuf,
}

impl ExportOptions {
    /// Authenticated client for the configured `.edgerc` section
    pub fn client(&self, ctx: &Context) -> Result<EdgeGridClient> {
        let credentials = Credentials::load(&*ctx.fs, &self.edgerc, &self.section)?;
        EdgeGridClient::new(credentials).context("Failed to create API client")
    }

    /// Create the output directory and a processor writing into it
    pub fn processor(
        &self,
        ctx: &Context,
        set: &TemplateSet,
        targets: IndexMap<String, PathBuf>,
    ) -> Result<FsTemplateProcessor> {
        ctx.fs.create_dir_all(&self.work_dir).with_context(|| {
            format!("Failed to create output directory: {}", self.work_dir.display())
        })?;
        let processor =
            FsTemplateProcessor::new(set, targets, ctx.fs.clone()).map_err(ExportError::from)?;
        Ok(processor)
    }
}

/// Print the summary shown at the start of every export
fn announce(ctx: &Context, title: &str, key: &str, name: &str, options: &ExportOptions) {
    ctx.output.section(title);
    ctx.output.key_value(key, name);
    ctx.output.key_value("Section", &options.section);
    ctx.output.key_value("Output", &options.work_dir.display().to_string());
}

/// List the files an export wrote
fn report_files(ctx: &Context, targets: &IndexMap<String, PathBuf>) {
    for path in targets.values() {
        ctx.output.dimmed(&format!("  {}", path.display()));
    }
    ctx.output.info("Run import.sh to bring the existing resources under Terraform");
}
