use serde_json::json;

use super::model::{
    Hostname, HostnameResponse, Property, PropertyResponse, PropertyVersion, RuleTree,
    SearchItem, SearchResponse, VersionResponse,
};
use crate::edgegrid::{ApiError, EdgeGridClient};
use crate::pagination::PageRequest;

const BASE: &str = "/papi/v1";

/// Read access to Property Manager
pub trait PropertyApi {
    fn search_property(&self, name: &str) -> Result<Vec<SearchItem>, ApiError>;

    fn get_property(&self, hit: &SearchItem) -> Result<Property, ApiError>;

    fn list_versions(
        &self,
        property: &Property,
        page: PageRequest,
    ) -> Result<Vec<PropertyVersion>, ApiError>;

    fn get_version(&self, property: &Property, version: i64) -> Result<PropertyVersion, ApiError>;

    fn get_rule_tree(&self, property: &Property, version: i64) -> Result<RuleTree, ApiError>;

    fn list_hostnames(&self, property: &Property, version: i64) -> Result<Vec<Hostname>, ApiError>;
}

fn scope(contract_id: &str, group_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("contractId", contract_id.to_string()),
        ("groupId", group_id.to_string()),
    ]
}

fn version_path(property: &Property, version: i64) -> String {
    format!(
        "{}/properties/{}/versions/{}",
        BASE,
        urlencoding::encode(&property.property_id),
        version
    )
}

impl PropertyApi for EdgeGridClient {
    fn search_property(&self, name: &str) -> Result<Vec<SearchItem>, ApiError> {
        let response: SearchResponse = self.post_json(
            &format!("{}/search/find-by-value", BASE),
            &[],
            &json!({ "propertyName": name }),
        )?;
        Ok(response.versions.items)
    }

    fn get_property(&self, hit: &SearchItem) -> Result<Property, ApiError> {
        let response: PropertyResponse = self.get_json(
            &format!("{}/properties/{}", BASE, urlencoding::encode(&hit.property_id)),
            &scope(&hit.contract_id, &hit.group_id),
        )?;
        response
            .properties
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Other(format!("property {} not returned", hit.property_id)))
    }

    fn list_versions(
        &self,
        property: &Property,
        page: PageRequest,
    ) -> Result<Vec<PropertyVersion>, ApiError> {
        let mut query = scope(&property.contract_id, &property.group_id);
        query.push(("offset", page.offset.to_string()));
        query.push(("limit", page.page_size.to_string()));

        let response: VersionResponse = self.get_json(
            &format!(
                "{}/properties/{}/versions",
                BASE,
                urlencoding::encode(&property.property_id)
            ),
            &query,
        )?;
        Ok(response.versions.items)
    }

    fn get_version(&self, property: &Property, version: i64) -> Result<PropertyVersion, ApiError> {
        let response: VersionResponse = self.get_json(
            &version_path(property, version),
            &scope(&property.contract_id, &property.group_id),
        )?;
        response
            .versions
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Other(format!("version {} not returned", version)))
    }

    fn get_rule_tree(&self, property: &Property, version: i64) -> Result<RuleTree, ApiError> {
        self.get_json(
            &format!("{}/rules", version_path(property, version)),
            &scope(&property.contract_id, &property.group_id),
        )
    }

    fn list_hostnames(
        &self,
        property: &Property,
        version: i64,
    ) -> Result<Vec<Hostname>, ApiError> {
        let response: HostnameResponse = self.get_json(
            &format!("{}/hostnames", version_path(property, version)),
            &scope(&property.contract_id, &property.group_id),
        )?;
        Ok(response.hostnames.items)
    }
}
