use super::model::{ConfigExport, ConfigList, ConfigSummary, VersionList, VersionSummary};
use crate::edgegrid::{ApiError, EdgeGridClient};
use crate::pagination::PageRequest;

const BASE: &str = "/appsec/v1";

/// Read access to Application Security configurations
pub trait AppsecApi {
    fn list_configurations(&self, page: PageRequest) -> Result<Vec<ConfigSummary>, ApiError>;

    fn list_versions(
        &self,
        config_id: i64,
        page: PageRequest,
    ) -> Result<Vec<VersionSummary>, ApiError>;

    fn export_version(&self, config_id: i64, version: i64) -> Result<ConfigExport, ApiError>;
}

impl AppsecApi for EdgeGridClient {
    /// The configurations endpoint returns everything at once; later pages are empty
    fn list_configurations(&self, page: PageRequest) -> Result<Vec<ConfigSummary>, ApiError> {
        if page.offset > 0 {
            return Ok(Vec::new());
        }
        let list: ConfigList = self.get_json(&format!("{}/configs", BASE), &[])?;
        Ok(list.configurations)
    }

    fn list_versions(
        &self,
        config_id: i64,
        page: PageRequest,
    ) -> Result<Vec<VersionSummary>, ApiError> {
        let list: VersionList = self.get_json(
            &format!("{}/configs/{}/versions", BASE, config_id),
            &[
                ("page", page.page_number().to_string()),
                ("pageSize", page.page_size.to_string()),
                ("detail", "false".to_string()),
            ],
        )?;
        Ok(list.version_list)
    }

    fn export_version(&self, config_id: i64, version: i64) -> Result<ConfigExport, ApiError> {
        self.get_json(
            &format!("{}/export/configs/{}/versions/{}", BASE, config_id, version),
            &[],
        )
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;

    #[derive(Default)]
    pub struct MockAppsecApi {
        pub configs: Vec<ConfigSummary>,
        pub versions: Vec<VersionSummary>,
        pub export: ConfigExport,
    }

    impl AppsecApi for MockAppsecApi {
        fn list_configurations(
            &self,
            page: PageRequest,
        ) -> Result<Vec<ConfigSummary>, ApiError> {
            Ok(self
                .configs
                .iter()
                .skip(page.offset)
                .take(page.page_size)
                .cloned()
                .collect())
        }

        fn list_versions(
            &self,
            _config_id: i64,
            page: PageRequest,
        ) -> Result<Vec<VersionSummary>, ApiError> {
            Ok(self
                .versions
                .iter()
                .skip(page.offset)
                .take(page.page_size)
                .cloned()
                .collect())
        }

        fn export_version(&self, config_id: i64, version: i64) -> Result<ConfigExport, ApiError> {
            if config_id != self.export.config_id || version != self.export.version {
                return Err(ApiError::Other(format!(
                    "no export for {}:{}",
                    config_id, version
                )));
            }
            Ok(self.export.clone())
        }
    }
}
