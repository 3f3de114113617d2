pub mod toml_config;

use crate::adapters::http::DEFAULT_TIMEOUT_SECONDS;
use crate::core::decision::parse_threshold;
use crate::domain::model::DecisionMode;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FEED_URL: &str = "http://www.bom.gov.au/fwo/IDN11060.xml";
pub const DEFAULT_AREA_CODE: &str = "NSW_PT131";

#[cfg(feature = "cli")]
use clap::Parser;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "umbrella-check"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Checks tomorrow's forecast and tells you whether to take an umbrella")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_FEED_URL))]
    pub feed_url: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_AREA_CODE))]
    pub area_code: String,

    /// Label reported in the verdict; defaults to the area code
    #[cfg_attr(feature = "cli", arg(long))]
    pub location_label: Option<String>,

    /// Decision threshold; invalid values fall back to the mode's default
    #[cfg_attr(feature = "cli", arg(long, allow_hyphen_values = true))]
    pub threshold: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value = "target-day"))]
    pub mode: DecisionMode,

    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS))]
    pub timeout_seconds: u64,

    #[cfg_attr(feature = "cli", arg(long, help = "Print the verdict as JSON"))]
    pub json: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log per-phase timing and memory"))]
    pub monitor: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            area_code: DEFAULT_AREA_CODE.to_string(),
            location_label: None,
            threshold: None,
            mode: DecisionMode::default(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            json: false,
            verbose: false,
            monitor: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn feed_url(&self) -> &str {
        &self.feed_url
    }

    fn area_code(&self) -> &str {
        &self.area_code
    }

    fn location_label(&self) -> &str {
        self.location_label.as_deref().unwrap_or(&self.area_code)
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn decision_mode(&self) -> DecisionMode {
        self.mode
    }

    fn default_threshold(&self) -> Option<f64> {
        parse_threshold(self.threshold.as_deref())
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("feed_url", &self.feed_url)?;
        validate_non_empty_string("area_code", &self.area_code)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;

        tracing::debug!("✅ CLI configuration validation passed");
        Ok(())
    }
}
