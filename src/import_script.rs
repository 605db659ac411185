use serde::Serialize;

use crate::tfstate::TerraformState;

/// Dependency tier of an imported resource; statements are emitted tier by tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPhase {
    Configuration,
    GlobalSettings,
    PolicySettings,
    PolicyProtections,
    NestedActions,
    DomainSettings,
    Activation,
}

/// One `terraform import <address> <id>` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStatement {
    pub phase: ImportPhase,
    pub resource_type: String,
    pub name: String,
    pub address: String,
    pub id: String,
}

/// Import statements for one export, in dependency order
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct ImportScript {
    statements: Vec<ImportStatement>,
}

impl ImportScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement for `resource_type.name`, binding it to remote `id`
    pub fn push(
        &mut self,
        phase: ImportPhase,
        resource_type: &str,
        name: &str,
        id: impl Into<String>,
    ) -> &mut Self {
        self.statements.push(ImportStatement {
            phase,
            resource_type: resource_type.to_string(),
            name: name.to_string(),
            address: format!("{}.{}", resource_type, name),
            id: id.into(),
        });
        self
    }

    /// Drop statements for resources already present in Terraform state
    pub fn skip_imported(mut self, state: &TerraformState) -> Self {
        self.statements
            .retain(|s| !state.contains(&s.resource_type, &s.name));
        self
    }

    /// Statements ordered by phase, keeping insertion order within a phase
    pub fn ordered(mut self) -> Self {
        self.statements.sort_by_key(|s| s.phase);
        self
    }

    #[cfg(test)]
    pub fn statements(&self) -> &[ImportStatement] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfstate::STATE_FILE;
    use tempfile::TempDir;

    #[test]
    fn test_ordered_by_phase_then_insertion() {
        let mut script = ImportScript::new();
        script
            .push(ImportPhase::Activation, "akamai_appsec_activations", "staging", "1:2:STAGING")
            .push(ImportPhase::NestedActions, "akamai_appsec_rule", "p_1", "1:p:1")
            .push(ImportPhase::Configuration, "akamai_appsec_configuration", "config", "1")
            .push(ImportPhase::NestedActions, "akamai_appsec_rule", "p_2", "1:p:2")
            .push(ImportPhase::PolicySettings, "akamai_appsec_security_policy", "p", "1:p");

        let addresses: Vec<String> = script
            .ordered()
            .statements()
            .iter()
            .map(|s| s.address.clone())
            .collect();

        assert_eq!(
            addresses,
            vec![
                "akamai_appsec_configuration.config",
                "akamai_appsec_security_policy.p",
                "akamai_appsec_rule.p_1",
                "akamai_appsec_rule.p_2",
                "akamai_appsec_activations.staging",
            ]
        );
    }

    #[test]
    fn test_skip_imported_consults_state() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(STATE_FILE),
            r#"{"resources":[{"mode":"managed","type":"akamai_dns_zone","name":"example_com"}]}"#,
        )
        .unwrap();
        let state = TerraformState::in_dir(dir.path());

        let mut script = ImportScript::new();
        script
            .push(ImportPhase::Configuration, "akamai_dns_zone", "example_com", "example.com")
            .push(ImportPhase::NestedActions, "akamai_dns_record", "example_com_www_A", "example.com#www.example.com#A");

        let script = script.skip_imported(&state);
        assert_eq!(script.statements().len(), 1);
        assert_eq!(script.statements()[0].resource_type, "akamai_dns_record");
    }

    #[test]
    fn test_serializes_as_list() {
        let mut script = ImportScript::new();
        script.push(ImportPhase::Configuration, "akamai_gtm_domain", "example", "example.akadns.net");

        let value = serde_json::to_value(&script).unwrap();
        assert_eq!(value[0]["address"], "akamai_gtm_domain.example");
        assert_eq!(value[0]["id"], "example.akadns.net");
        assert_eq!(value[0]["phase"], "configuration");
    }
}
