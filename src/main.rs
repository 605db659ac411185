mod activation;
mod commands;
mod context;
mod edgegrid;
mod error;
mod import_script;
mod output;
mod pagination;
mod providers;
mod template;
mod tfstate;
mod traits;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::{
    ExportAppsecCommand, ExportCloudletsPolicyCommand, ExportDomainCommand, ExportOptions,
    ExportPropertyCommand, ExportZoneCommand,
};
use context::Context;
use traits::{Output, TerminalOutput};

#[derive(Parser)]
#[command(name = "tfexport")]
#[command(about = "Export CDN and security configuration as Terraform files", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the .edgerc credentials file
    #[arg(long, global = true, env = "EDGERC")]
    edgerc: Option<PathBuf>,

    /// Section of the .edgerc file to use
    #[arg(long, global = true, env = "EDGERC_SECTION", default_value = "default")]
    section: String,

    /// Log API calls and rendering steps
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct WorkPath {
    /// Directory the Terraform files are written to
    #[arg(long, default_value = ".")]
    tfworkpath: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a cloudlets policy
    ExportCloudletsPolicy {
        /// Policy name
        name: String,

        #[command(flatten)]
        work: WorkPath,
    },

    /// Export an Edge DNS zone with its record sets
    ExportZone {
        /// Zone name
        zone: String,

        /// Leave resources already in terraform.tfstate out of import.sh
        #[arg(long)]
        skip_imported: bool,

        #[command(flatten)]
        work: WorkPath,
    },

    /// Export an Application Security configuration
    ExportAppsec {
        /// Security configuration name
        config_name: String,

        #[command(flatten)]
        work: WorkPath,
    },

    /// Export a GTM domain
    ExportDomain {
        /// Domain name
        domain: String,

        #[command(flatten)]
        work: WorkPath,
    },

    /// Export a Property Manager property
    ExportProperty {
        /// Property name
        property_name: String,

        #[command(flatten)]
        work: WorkPath,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context::new();
    let options = |work: WorkPath| ExportOptions {
        edgerc: cli
            .edgerc
            .clone()
            .unwrap_or_else(edgegrid::config::default_edgerc_path),
        section: cli.section.clone(),
        work_dir: work.tfworkpath,
    };

    match cli.command {
        Commands::ExportCloudletsPolicy { name, work } => {
            ExportCloudletsPolicyCommand::execute(&ctx, &options(work), &name)
        }
        Commands::ExportZone {
            zone,
            skip_imported,
            work,
        } => ExportZoneCommand::execute(&ctx, &options(work), &zone, skip_imported),
        Commands::ExportAppsec { config_name, work } => {
            ExportAppsecCommand::execute(&ctx, &options(work), &config_name)
        }
        Commands::ExportDomain { domain, work } => {
            ExportDomainCommand::execute(&ctx, &options(work), &domain)
        }
        Commands::ExportProperty {
            property_name,
            work,
        } => ExportPropertyCommand::execute(&ctx, &options(work), &property_name),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        TerminalOutput.error(&format!("{:#}", err));
        std::process::exit(error::exit_code(&err));
    }
}
