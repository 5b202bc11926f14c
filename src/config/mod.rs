pub mod toml_config;

use crate::domain::ports::SettingsProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_extension, validate_path, validate_range, validate_url, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "target-planner"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Plan monthly mobilisation and enrolment targets for a work order")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, help = "Plan draft (JSON)"))]
    pub plan: String,

    #[cfg_attr(
        feature = "cli",
        arg(long, help = "TOML settings file; replaces the API and output flags")
    )]
    pub config: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, default_value = "http://localhost:8080/api"))]
    pub api_base_url: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "30"))]
    pub request_timeout_secs: u64,

    #[cfg_attr(
        feature = "cli",
        arg(long, help = "Use built-in centres when the API cannot be reached")
    )]
    pub fallback_on_error: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Centre to plan for, overrides the draft"))]
    pub centre_id: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Store the targets when the plan is valid"))]
    pub save: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log as JSON lines"))]
    pub json_logs: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,
}

impl SettingsProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }

    fn fallback_on_error(&self) -> bool {
        self.fallback_on_error
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_extension("plan", &self.plan, &["json"])?;
        validate_url("api_base_url", &self.api_base_url)?;
        validate_path("output_path", &self.output_path)?;
        validate_range("request_timeout_secs", self.request_timeout_secs, 1, 300)
    }
}
