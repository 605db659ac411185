use super::model::{RecordSet, RecordSetPage, Zone};
use crate::edgegrid::{ApiError, EdgeGridClient};
use crate::pagination::PageRequest;

const BASE: &str = "/config-dns/v2/zones";

/// Read access to Edge DNS zones
pub trait DnsApi {
    fn get_zone(&self, zone: &str) -> Result<Zone, ApiError>;

    fn list_recordsets(&self, zone: &str, page: PageRequest) -> Result<Vec<RecordSet>, ApiError>;
}

impl DnsApi for EdgeGridClient {
    fn get_zone(&self, zone: &str) -> Result<Zone, ApiError> {
        self.get_json(&format!("{}/{}", BASE, urlencoding::encode(zone)), &[])
    }

    fn list_recordsets(&self, zone: &str, page: PageRequest) -> Result<Vec<RecordSet>, ApiError> {
        let response: RecordSetPage = self.get_json(
            &format!("{}/{}/recordsets", BASE, urlencoding::encode(zone)),
            &[
                ("page", page.page_number().to_string()),
                ("pageSize", page.page_size.to_string()),
            ],
        )?;
        Ok(response.recordsets)
    }
}
