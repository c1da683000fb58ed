//! Command-line interface
//!
//! Argument definitions and command handlers for the `stage-config` binary.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

use crate::config::{parse_overrides, ConfigError, EffectiveConfig, Preset};
use crate::error::AppError;
use crate::naming::{describe, NameRequest};
use stage_resolver::Stage;

#[derive(Parser)]
#[command(name = "stage-config")]
#[command(about = "Resolve infrastructure configuration for a deployment stage", version)]
pub struct Cli {
    /// Log level, used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the default config comes from and which stage to resolve it for.
#[derive(Args)]
pub struct SourceArgs {
    /// Deployment stage: dev, test, prod, sandbox or orga
    #[arg(long, short = 's', env = "STAGE")]
    pub stage: Option<String>,

    /// Reject stages outside the declared set instead of passing through
    #[arg(long)]
    pub strict: bool,

    /// Built-in project preset (layer 1)
    #[arg(long, short = 'p', value_enum)]
    pub preset: Option<Preset>,

    /// Config file, TOML or JSON (layer 2)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Override a value by dot path, e.g. contextVariables.owner=data-team (layer 3)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved configuration
    Resolve {
        #[command(flatten)]
        source: SourceArgs,

        /// Print only the resolved config, without provenance
        #[arg(long)]
        config_only: bool,

        /// Also write the effective config to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the resource names a stack derives from the resolved config
    Names {
        #[command(flatten)]
        source: SourceArgs,

        /// Stack class name, e.g. RetailDataStack
        #[arg(long)]
        stack: String,

        /// Stage-scoped resource names to derive
        #[arg(long)]
        scoped: Vec<String>,

        /// Region/account-scoped resource names to derive
        #[arg(long)]
        regional: Vec<String>,

        #[arg(long, env = "CDK_DEFAULT_REGION")]
        region: Option<String>,

        #[arg(long, env = "CDK_DEFAULT_ACCOUNT")]
        account: Option<String>,

        /// Extra tag, KEY=VALUE
        #[arg(long = "tag", value_name = "KEY=VALUE")]
        tags: Vec<String>,
    },

    /// List the built-in presets
    Presets {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Verify that a config file holds a valid default config
    Verify {
        #[arg(long, short = 'c')]
        config: PathBuf,
    },
}

pub fn run(command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Resolve {
            source,
            config_only,
            output,
        } => run_resolve(source, config_only, output),
        Commands::Names {
            source,
            stack,
            scoped,
            regional,
            region,
            account,
            tags,
        } => {
            let request = NameRequest {
                stack,
                scoped,
                regional,
                region,
                account,
                metadata: parse_tags(&tags)?,
            };
            run_names(source, &request)
        }
        Commands::Presets { json } => run_presets(json),
        Commands::Verify { config } => run_verify(config),
    }
}

fn run_resolve(
    source: SourceArgs,
    config_only: bool,
    output: Option<PathBuf>,
) -> Result<(), AppError> {
    let effective = build_effective(source)?;

    if let Some(path) = output {
        effective.write_to_file(&path)?;
        eprintln!("Wrote: {}", path.display());
    }

    if config_only {
        print_json(&effective.config)
    } else {
        print_json(&effective)
    }
}

fn run_names(source: SourceArgs, request: &NameRequest) -> Result<(), AppError> {
    let effective = build_effective(source)?;
    let report = describe(&effective, request)?;
    print_json(&report)
}

fn run_presets(json: bool) -> Result<(), AppError> {
    if json {
        let mut presets = BTreeMap::new();
        for preset in Preset::ALL {
            presets.insert(preset.name(), preset.default_value()?);
        }
        return print_json(&presets);
    }

    println!("Built-in presets:\n");
    for preset in Preset::ALL {
        let value = preset.default_value()?;
        let context = value["contextVariables"]["context"].as_str().unwrap_or("-");
        println!("  {} (context: {})", preset, context);
    }
    Ok(())
}

fn run_verify(path: PathBuf) -> Result<(), AppError> {
    let effective = EffectiveConfig::build(None, Some(&path), None, Stage::Unknown)?;
    let vars = effective.context_variables()?;
    let stage = effective
        .get_str("contextVariables.stage")
        .unwrap_or(vars.stage.as_str());

    println!("Configuration valid: {}", path.display());
    println!();
    println!("  Context: {}", vars.context);
    println!("  Stage: {}", stage);
    println!("  Owner: {}", vars.owner);
    println!("  Usage: {}", vars.usage);
    if let Some(digest) = effective.sources.first().and_then(|s| s.digest.as_ref()) {
        println!("  Digest: {}", digest);
    }
    Ok(())
}

/// Turn the shared source flags into an effective config.
pub fn build_effective(source: SourceArgs) -> Result<EffectiveConfig, AppError> {
    let stage = parse_stage(source.stage.as_deref(), source.strict)?;

    let cli_overrides = if source.overrides.is_empty() {
        None
    } else {
        Some(parse_overrides(source.overrides.as_slice())?)
    };

    Ok(EffectiveConfig::build(
        source.preset,
        source.config.as_deref(),
        cli_overrides,
        stage,
    )?)
}

/// Permissive by default: anything undeclared becomes [`Stage::Unknown`].
pub fn parse_stage(raw: Option<&str>, strict: bool) -> Result<Stage, ConfigError> {
    match (raw, strict) {
        (Some(raw), true) => Ok(Stage::parse_strict(raw)?),
        (None, true) => Err(ConfigError::Validation(
            "--strict needs a stage (--stage or STAGE)".to_string(),
        )),
        (raw, false) => {
            let stage = raw.map_or(Stage::Unknown, |r| r.parse().unwrap_or_default());
            if !stage.is_recognized() {
                warn!(
                    stage = raw.unwrap_or(""),
                    "stage has no override row; default config passes through unchanged"
                );
            }
            Ok(stage)
        }
    }
}

pub fn parse_tags(pairs: &[String]) -> Result<BTreeMap<String, String>, ConfigError> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| ConfigError::Parse(format!("tag '{}' is not key=value", pair)))
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Output(format!("JSON serialization failed: {}", e)))?;
    println!("{}", json);
    Ok(())
}
