//! Configuration layering and stage resolution
//!
//! The default config is built from up to three layers before the stage
//! table is applied:
//! 1. A built-in project preset
//! 2. A config file (TOML or JSON)
//! 3. CLI `--set` overrides

mod effective;
mod merge;
mod overrides;
mod presets;

pub use effective::{load_config_file, ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig};
pub use merge::{deep_merge, merge_layers, override_layer, resolve_value};
pub use overrides::parse_overrides;
pub use presets::{
    data_platform, ml_platform, DataConfig, DataExtension, MlConfig, MlExtension, OrgAccount,
    OrgConfig, Preset, DEFAULT_OWNER, ORGA_ACCOUNT_ID,
};
