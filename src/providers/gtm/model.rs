use serde::{Deserialize, Serialize};

use crate::providers::null_as_default;

/// GTM domain as returned by `GET /config-gtm/v1/domains/{domain}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub name: String,
    #[serde(rename = "type")]
    pub domain_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_notification_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_error_penalty: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_imbalance_percentage: Option<f64>,
    #[serde(default)]
    pub cname_coalescing_enabled: bool,
    #[serde(default)]
    pub load_feedback: bool,
    #[serde(default)]
    pub end_user_mapping_enabled: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing)]
    pub datacenters: Vec<Datacenter>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing)]
    pub properties: Vec<Property>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing)]
    pub geographic_maps: Vec<GeoMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datacenter {
    pub datacenter_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_or_province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_of: Option<i64>,
    #[serde(default)]
    pub cloud_server_targeting: bool,
    #[serde(default)]
    pub cloud_server_host_header_override: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score_aggregation_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub handout_mode: String,
    #[serde(default)]
    pub handout_limit: i64,
    #[serde(default)]
    pub ipv6: bool,
    #[serde(default, rename = "dynamicTTL", skip_serializing_if = "Option::is_none")]
    pub dynamic_ttl: Option<i64>,
    #[serde(default)]
    pub failover_delay: i64,
    #[serde(default)]
    pub failback_delay: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub traffic_targets: Vec<TrafficTarget>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub liveness_tests: Vec<LivenessTest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficTarget {
    pub datacenter_id: i64,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub weight: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub servers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handout_c_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessTest {
    pub name: String,
    pub test_object_protocol: String,
    pub test_interval: i64,
    pub test_timeout: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub test_object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_object_port: Option<i64>,
    #[serde(default)]
    pub http_error3xx: bool,
    #[serde(default)]
    pub http_error4xx: bool,
    #[serde(default)]
    pub http_error5xx: bool,
    #[serde(default)]
    pub disable_nonstandard_port_warning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoMap {
    pub name: String,
    pub default_datacenter: DatacenterRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assignments: Vec<GeoAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatacenterRef {
    pub datacenter_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoAssignment {
    pub datacenter_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub countries: Vec<String>,
}
