use super::model::{LoadBalancerActivation, LoadBalancerVersion, Policy, PolicyVersion};
use crate::edgegrid::{ApiError, EdgeGridClient};
use crate::pagination::PageRequest;

const BASE: &str = "/cloudlets/api/v2";

/// Read access to Cloudlets v2 policies and load balancers
pub trait CloudletsApi {
    fn list_policies(&self, page: PageRequest) -> Result<Vec<Policy>, ApiError>;

    fn list_policy_versions(
        &self,
        policy_id: i64,
        page: PageRequest,
    ) -> Result<Vec<PolicyVersion>, ApiError>;

    fn get_policy_version(&self, policy_id: i64, version: i64) -> Result<PolicyVersion, ApiError>;

    fn list_load_balancer_versions(
        &self,
        origin_id: &str,
    ) -> Result<Vec<LoadBalancerVersion>, ApiError>;

    fn list_load_balancer_activations(
        &self,
        origin_id: &str,
    ) -> Result<Vec<LoadBalancerActivation>, ApiError>;
}

impl CloudletsApi for EdgeGridClient {
    fn list_policies(&self, page: PageRequest) -> Result<Vec<Policy>, ApiError> {
        self.get_json(
            &format!("{}/policies", BASE),
            &[
                ("offset", page.offset.to_string()),
                ("pageSize", page.page_size.to_string()),
                ("includeDeleted", "false".to_string()),
            ],
        )
    }

    fn list_policy_versions(
        &self,
        policy_id: i64,
        page: PageRequest,
    ) -> Result<Vec<PolicyVersion>, ApiError> {
        self.get_json(
            &format!("{}/policies/{}/versions", BASE, policy_id),
            &[
                ("offset", page.offset.to_string()),
                ("pageSize", page.page_size.to_string()),
                ("includeRules", "false".to_string()),
            ],
        )
    }

    fn get_policy_version(&self, policy_id: i64, version: i64) -> Result<PolicyVersion, ApiError> {
        self.get_json(
            &format!("{}/policies/{}/versions/{}", BASE, policy_id, version),
            &[("omitRules", "false".to_string())],
        )
    }

    fn list_load_balancer_versions(
        &self,
        origin_id: &str,
    ) -> Result<Vec<LoadBalancerVersion>, ApiError> {
        self.get_json(
            &format!("{}/origins/{}/versions", BASE, urlencoding::encode(origin_id)),
            &[("includeModel", "true".to_string())],
        )
    }

    fn list_load_balancer_activations(
        &self,
        origin_id: &str,
    ) -> Result<Vec<LoadBalancerActivation>, ApiError> {
        self.get_json(
            &format!("{}/origins/{}/activations", BASE, urlencoding::encode(origin_id)),
            &[],
        )
    }
}
