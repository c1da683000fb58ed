//! Resource names derived from resolved context variables.
//!
//! Stacks name their resources from `context` and `stage`, so two stages of
//! the same project never collide. Shared SSM parameters published by the
//! organisation account live under `{stage}/infra-shared/`.

use serde::{Deserialize, Serialize};
use stage_resolver::{ContextError, ContextMetadata, ContextVariables};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::{ConfigError, EffectiveConfig, OrgConfig};

/// Parameter path of the organisation-wide encryption key ARN.
pub const ENCRYPTION_KEY_PARAMETER: &str = "shared/encryption/key/arn";

/// Derives names for one resolved context.
#[derive(Debug, Clone, Copy)]
pub struct ResourceNamer<'a> {
    vars: &'a ContextVariables,
}

impl<'a> ResourceNamer<'a> {
    pub fn new(vars: &'a ContextVariables) -> Self {
        Self { vars }
    }

    /// `{context}-{stack}-{stage}`
    pub fn stack_id(&self, stack: &str) -> String {
        format!("{}-{}-{}", self.vars.context, stack, self.vars.stage)
    }

    /// `{context}-{name}-{stage}`, used for registries, domains and profiles.
    pub fn scoped(&self, name: &str) -> String {
        format!("{}-{}-{}", self.vars.context, name, self.vars.stage)
    }

    /// `{context}-{name}-{region}-{account}`, used for globally unique
    /// bucket names.
    pub fn regional(&self, name: &str, region: &str, account: &str) -> String {
        format!("{}-{}-{}-{}", self.vars.context, name, region, account)
    }

    /// `{stage}/infra-shared/{path}`
    pub fn shared_parameter(&self, path: &str) -> String {
        format!("{}/infra-shared/{}", self.vars.stage, path.trim_start_matches('/'))
    }

    pub fn account_id_parameter(&self, account_name: &str) -> String {
        self.shared_parameter(&format!("{}/account/id", account_name))
    }

    pub fn encryption_key_parameter(&self) -> String {
        self.shared_parameter(ENCRYPTION_KEY_PARAMETER)
    }

    /// Context variables plus `metadata`, as resource tags.
    pub fn tags(
        &self,
        metadata: BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, ContextError> {
        Ok(ContextMetadata::new(self.vars.clone(), metadata)?.tags())
    }
}

/// What to derive names for.
#[derive(Debug, Clone, Default)]
pub struct NameRequest {
    pub stack: String,
    pub scoped: Vec<String>,
    pub regional: Vec<String>,
    pub region: Option<String>,
    pub account: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

/// Names derived for one stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameReport {
    pub stack_id: String,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub scoped: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub regional: BTreeMap<String, String>,

    pub encryption_key_parameter: String,

    /// Account-id parameter per organisation account, when the config has `orga`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub account_parameters: BTreeMap<String, String>,

    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OrgaField {
    #[serde(default)]
    orga: Option<OrgConfig>,
}

/// Derive every requested name from an effective config.
pub fn describe(
    effective: &EffectiveConfig,
    request: &NameRequest,
) -> Result<NameReport, ConfigError> {
    if request.stack.trim().is_empty() {
        return Err(ConfigError::Validation("stack name must not be empty".to_string()));
    }

    let config = effective.typed::<OrgaField>()?;
    let namer = ResourceNamer::new(&config.context_variables);

    let regional = if request.regional.is_empty() {
        BTreeMap::new()
    } else {
        let (region, account) = match (&request.region, &request.account) {
            (Some(region), Some(account)) => (region, account),
            _ => {
                return Err(ConfigError::Validation(
                    "regional names need both a region and an account".to_string(),
                ))
            }
        };
        request
            .regional
            .iter()
            .map(|name| (name.clone(), namer.regional(name, region, account)))
            .collect()
    };

    let account_parameters = config
        .extension
        .orga
        .iter()
        .flat_map(|orga| orga.accounts.iter())
        .map(|acc| (acc.account_name.clone(), namer.account_id_parameter(&acc.account_name)))
        .collect();

    let report = NameReport {
        stack_id: namer.stack_id(&request.stack),
        scoped: request
            .scoped
            .iter()
            .map(|name| (name.clone(), namer.scoped(name)))
            .collect(),
        regional,
        encryption_key_parameter: namer.encryption_key_parameter(),
        account_parameters,
        tags: namer.tags(request.metadata.clone())?,
    };

    debug!(stack_id = %report.stack_id, "names derived");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use stage_resolver::{Stage, Usage};

    fn prod_vars() -> ContextVariables {
        ContextVariables::new("data-platform", Stage::Prod, "operations", Usage::Production)
    }

    #[test]
    fn test_stack_and_scoped_names() {
        let vars = prod_vars();
        let namer = ResourceNamer::new(&vars);

        assert_eq!(namer.stack_id("RetailDataStack"), "data-platform-RetailDataStack-prod");
        assert_eq!(namer.scoped("processing-model"), "data-platform-processing-model-prod");
    }

    #[test]
    fn test_regional_name() {
        let vars = prod_vars();
        let namer = ResourceNamer::new(&vars);
        assert_eq!(
            namer.regional("source-bucket", "eu-west-1", "123456789012"),
            "data-platform-source-bucket-eu-west-1-123456789012"
        );
    }

    #[test]
    fn test_shared_parameters() {
        let vars = prod_vars();
        let namer = ResourceNamer::new(&vars);

        assert_eq!(
            namer.account_id_parameter("ml_platform_b"),
            "prod/infra-shared/ml_platform_b/account/id"
        );
        assert_eq!(
            namer.encryption_key_parameter(),
            "prod/infra-shared/shared/encryption/key/arn"
        );
        assert_eq!(namer.shared_parameter("/x/y"), "prod/infra-shared/x/y");
    }

    #[test]
    fn test_tags() {
        let vars = prod_vars();
        let namer = ResourceNamer::new(&vars);

        let tags = namer.tags(BTreeMap::new()).unwrap();
        assert_eq!(tags["stage"], "prod");
        assert_eq!(tags["usage"], "PRODUCTION");

        let mut reserved = BTreeMap::new();
        reserved.insert("stage".to_string(), "dev".to_string());
        assert!(namer.tags(reserved).is_err());
    }

    #[test]
    fn test_describe_data_platform() {
        let effective =
            EffectiveConfig::build(Some(Preset::DataPlatform), None, None, Stage::Dev).unwrap();
        let request = NameRequest {
            stack: "RetailDataStack".to_string(),
            regional: vec!["source-bucket".to_string()],
            region: Some("eu-west-1".to_string()),
            account: Some("123456789012".to_string()),
            ..Default::default()
        };

        let report = describe(&effective, &request).unwrap();
        assert_eq!(report.stack_id, "data-platform-RetailDataStack-dev");
        assert_eq!(
            report.regional["source-bucket"],
            "data-platform-source-bucket-eu-west-1-123456789012"
        );
        assert_eq!(
            report.account_parameters["ml_platform_b"],
            "dev/infra-shared/ml_platform_b/account/id"
        );
        assert_eq!(report.tags["usage"], "DEVELOPMENT");
    }

    #[test]
    fn test_describe_ml_platform_has_no_account_parameters() {
        let effective =
            EffectiveConfig::build(Some(Preset::MlPlatform), None, None, Stage::Test).unwrap();
        let request = NameRequest {
            stack: "SagemakerStudioStack".to_string(),
            scoped: vec!["full-machine-learning".to_string()],
            ..Default::default()
        };

        let report = describe(&effective, &request).unwrap();
        assert!(report.account_parameters.is_empty());
        assert_eq!(
            report.scoped["full-machine-learning"],
            "mlops-sagemaker-full-machine-learning-test"
        );

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("accountParameters").is_none());
        assert!(json.get("regional").is_none());
        assert_eq!(json["stackId"], "mlops-sagemaker-SagemakerStudioStack-test");
    }

    #[test]
    fn test_describe_regional_needs_region_and_account() {
        let effective =
            EffectiveConfig::build(Some(Preset::DataPlatform), None, None, Stage::Dev).unwrap();
        let request = NameRequest {
            stack: "RetailDataStack".to_string(),
            regional: vec!["source-bucket".to_string()],
            region: Some("eu-west-1".to_string()),
            ..Default::default()
        };

        let err = describe(&effective, &request).unwrap_err();
        assert!(err.to_string().contains("region"));
    }
}
