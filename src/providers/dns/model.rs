use serde::{Deserialize, Serialize};

use crate::providers::null_as_default;

/// Edge DNS zone settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub zone: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub masters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(default)]
    pub sign_and_serve: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_and_serve_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsig_key: Option<TsigKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_customer_id: Option<String>,
}

impl Zone {
    /// Only primary zones carry their own record sets
    pub fn is_primary(&self) -> bool {
        self.zone_type.eq_ignore_ascii_case("PRIMARY")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsigKey {
    pub name: String,
    pub algorithm: String,
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordSet {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rdata: Vec<String>,
}

/// One page of `GET .../recordsets`
#[derive(Debug, Deserialize)]
pub struct RecordSetPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recordsets: Vec<RecordSet>,
}

/// Fields of an SOA record's rdata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Soa {
    pub name_server: String,
    pub email_address: String,
    pub serial: i64,
    pub refresh: i64,
    pub retry: i64,
    pub expiry: i64,
    pub nxdomain_ttl: i64,
}

impl Soa {
    /// Parse `mname rname serial refresh retry expire minimum`
    pub fn parse(rdata: &str) -> Option<Self> {
        let fields: Vec<&str> = rdata.split_whitespace().collect();
        let [name_server, email_address, serial, refresh, retry, expiry, nxdomain_ttl] =
            fields.as_slice()
        else {
            return None;
        };

        Some(Self {
            name_server: name_server.to_string(),
            email_address: email_address.to_string(),
            serial: serial.parse().ok()?,
            refresh: refresh.parse().ok()?,
            retry: retry.parse().ok()?,
            expiry: expiry.parse().ok()?,
            nxdomain_ttl: nxdomain_ttl.parse().ok()?,
        })
    }
}
