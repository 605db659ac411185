use super::model::Domain;
use crate::edgegrid::{ApiError, EdgeGridClient};

const BASE: &str = "/config-gtm/v1/domains";

/// Read access to Global Traffic Management domains
pub trait GtmApi {
    fn get_domain(&self, domain: &str) -> Result<Domain, ApiError>;
}

impl GtmApi for EdgeGridClient {
    fn get_domain(&self, domain: &str) -> Result<Domain, ApiError> {
        self.get_json(&format!("{}/{}", BASE, urlencoding::encode(domain)), &[])
    }
}
