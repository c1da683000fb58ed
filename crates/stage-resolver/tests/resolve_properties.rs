//! Property tests for stage resolution.

use proptest::prelude::*;
use serde_json::{json, Value};
use stage_resolver::{resolve, Config, ContextVariables, Extensions, Stage, Usage};

fn any_stage() -> impl Strategy<Value = Stage> {
    prop::sample::select(Stage::ALL.to_vec())
}

fn any_usage() -> impl Strategy<Value = Usage> {
    prop::sample::select(Usage::ALL.to_vec())
}

fn any_extension() -> impl Strategy<Value = Extensions> {
    prop::collection::btree_map("[a-z]{1,8}", "[a-zA-Z0-9_-]{0,12}", 0..5).prop_map(|fields| {
        fields
            .into_iter()
            .filter(|(k, _)| k != "contextVariables")
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    })
}

fn any_config() -> impl Strategy<Value = Config> {
    (
        "[a-z][a-z-]{0,15}",
        any_stage(),
        "[a-z]{1,10}",
        any_usage(),
        any_extension(),
    )
        .prop_map(|(context, stage, owner, usage, extension)| {
            Config::new(ContextVariables::new(context, stage, owner, usage), extension)
        })
}

fn expected_usage(stage: Stage) -> Option<Usage> {
    match stage {
        Stage::Test | Stage::Prod => Some(Usage::Production),
        Stage::Dev => Some(Usage::Development),
        Stage::Sandbox => Some(Usage::Poc),
        Stage::Orga | Stage::Unknown => None,
    }
}

proptest! {
    #[test]
    fn prop_recognized_stage_sets_stage_and_usage(stage in any_stage(), config in any_config()) {
        let resolved = resolve(stage, &config);
        match expected_usage(stage) {
            Some(usage) => {
                prop_assert_eq!(resolved.context_variables.stage, stage);
                prop_assert_eq!(resolved.context_variables.usage, usage);
            }
            None => {
                prop_assert_eq!(&resolved, &config);
            }
        }
    }

    #[test]
    fn prop_context_and_owner_survive(stage in any_stage(), config in any_config()) {
        let resolved = resolve(stage, &config);
        prop_assert_eq!(&resolved.context_variables.context, &config.context_variables.context);
        prop_assert_eq!(&resolved.context_variables.owner, &config.context_variables.owner);
    }

    #[test]
    fn prop_extension_fields_pass_through(stage in any_stage(), config in any_config()) {
        let resolved = resolve(stage, &config);
        prop_assert_eq!(&resolved.extension, &config.extension);
    }

    #[test]
    fn prop_deterministic(stage in any_stage(), config in any_config()) {
        prop_assert_eq!(resolve(stage, &config), resolve(stage, &config));
    }

    #[test]
    fn prop_unrecognized_strings_are_identity(raw in "[a-z]{1,12}", config in any_config()) {
        let stage: Stage = raw.parse().unwrap();
        prop_assume!(!stage.is_recognized());
        prop_assert_eq!(resolve(stage, &config), config);
    }
}

#[test]
fn test_worked_example_dev() {
    let default = Config::bare(ContextVariables::new(
        "data-platform",
        Stage::Unknown,
        "operations",
        Usage::Ephemeral,
    ));

    let resolved = resolve(Stage::Dev, &default);
    assert_eq!(
        serde_json::to_value(&resolved).unwrap(),
        json!({
            "contextVariables": {
                "context": "data-platform",
                "stage": "dev",
                "owner": "operations",
                "usage": "DEVELOPMENT"
            }
        })
    );
}

#[test]
fn test_worked_example_prod_with_orga() {
    let raw = json!({
        "contextVariables": {
            "context": "data-platform",
            "stage": "unknown",
            "owner": "operations",
            "usage": "EPHEMERAL"
        },
        "orga": {
            "orgaAccountId": "607050363559",
            "accounts": [{"accountName": "ml_platform_b"}]
        }
    });
    let default: Config = serde_json::from_value(raw.clone()).unwrap();

    let resolved = resolve(Stage::Prod, &default);
    let value = serde_json::to_value(&resolved).unwrap();
    assert_eq!(value["orga"], raw["orga"]);
    assert_eq!(value["contextVariables"]["usage"], "PRODUCTION");
    assert_eq!(value["contextVariables"]["stage"], "prod");
}
