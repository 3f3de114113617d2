pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "server")]
pub mod server;

pub use adapters::{FixedClock, HttpFetcher, SystemClock};
pub use config::{toml_config::TomlConfig, CliConfig};
pub use core::{CheckSettings, UmbrellaService};
pub use domain::model::{DecisionMode, UmbrellaVerdict};
pub use utils::error::{Result, UmbrellaError};
