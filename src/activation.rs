use serde::{Deserialize, Serialize};
use std::fmt;

/// Network a resource version can be active on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[serde(alias = "STAGING")]
    Staging,
    #[serde(rename = "prod", alias = "production", alias = "PRODUCTION", alias = "PROD")]
    Production,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Staging, Network::Production];

    /// Name used in generated resource names and import IDs
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Staging => "staging",
            Network::Production => "prod",
        }
    }

    /// Parse the spellings the different APIs use
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "staging" => Some(Network::Staging),
            "prod" | "production" => Some(Network::Production),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A version of a resource being live on one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub policy_id: i64,
    pub network: Network,
    pub version: i64,
    pub properties: Vec<String>,
}

/// One raw entry of an activation history
pub trait ActivationEntry {
    fn network(&self) -> Option<Network>;
    fn version(&self) -> i64;
    fn property_name(&self) -> &str;
}

/// Fold every history entry for `network` into one activation record
///
/// Returns `None` when nothing was activated on that network.
pub fn aggregate<'a, E, I>(policy_id: i64, entries: I, network: Network) -> Option<Activation>
where
    E: ActivationEntry + 'a,
    I: IntoIterator<Item = &'a E>,
{
    let mut activation: Option<Activation> = None;
    for entry in entries {
        if entry.network() != Some(network) {
            continue;
        }
        let record = activation.get_or_insert_with(|| Activation {
            policy_id,
            network,
            version: entry.version(),
            properties: Vec::new(),
        });
        record.version = record.version.max(entry.version());
        record.properties.push(entry.property_name().to_string());
    }
    activation
}
