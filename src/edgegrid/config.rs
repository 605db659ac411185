use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::traits::FileSystem;

const DEFAULT_MAX_BODY: usize = 131072;

/// API client credentials for one `.edgerc` section
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub host: String,
    pub client_token: String,
    pub client_secret: String,
    pub access_token: String,
    pub max_body: usize,
}

impl Credentials {
    /// Load credentials, preferring a complete set of `AKAMAI_*` environment
    /// variables over the `.edgerc` file
    pub fn load(fs: &dyn FileSystem, edgerc: &Path, section: &str) -> Result<Self> {
        if let Some(creds) = Self::from_env() {
            tracing::debug!("using credentials from environment");
            return Ok(creds);
        }

        let content = fs
            .read_to_string(edgerc)
            .with_context(|| format!("Failed to read edgerc file: {}", edgerc.display()))?;
        Self::parse_section(&content, section)
            .with_context(|| format!("Invalid edgerc file: {}", edgerc.display()))
    }

    fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Some(Self {
            host: var("AKAMAI_HOST")?,
            client_token: var("AKAMAI_CLIENT_TOKEN")?,
            client_secret: var("AKAMAI_CLIENT_SECRET")?,
            access_token: var("AKAMAI_ACCESS_TOKEN")?,
            max_body: DEFAULT_MAX_BODY,
        })
    }

    /// Parse one `[section]` of an INI-style edgerc file
    pub fn parse_section(content: &str, section: &str) -> Result<Self> {
        let mut in_section = false;
        let mut found = false;
        let mut host = None;
        let mut client_token = None;
        let mut client_secret = None;
        let mut access_token = None;
        let mut max_body = DEFAULT_MAX_BODY;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_section = name.trim() == section;
                found |= in_section;
                continue;
            }
            if !in_section {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').to_string();
            match key.trim() {
                "host" => host = Some(value),
                "client_token" => client_token = Some(value),
                "client_secret" => client_secret = Some(value),
                "access_token" => access_token = Some(value),
                "max-body" | "max_body" => {
                    max_body = value
                        .parse()
                        .with_context(|| format!("Invalid max-body value: {}", value))?;
                }
                _ => {}
            }
        }

        if !found {
            bail!("section '{}' not found", section);
        }

        let require = |field: Option<String>, name: &str| {
            field.with_context(|| format!("'{}' missing in section '{}'", name, section))
        };

        Ok(Self {
            host: require(host, "host")?
                .trim_start_matches("https://")
                .trim_end_matches('/')
                .to_string(),
            client_token: require(client_token, "client_token")?,
            client_secret: require(client_secret, "client_secret")?,
            access_token: require(access_token, "access_token")?,
            max_body,
        })
    }
}

/// Default location of the edgerc file
pub fn default_edgerc_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".edgerc"))
        .unwrap_or_else(|| PathBuf::from(".edgerc"))
}
