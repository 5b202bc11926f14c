pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{HttpCentreSource, HttpTargetStore, LocalStorage};
pub use app::runner::RunOptions;
pub use app::{PlanReport, PlanRunner};
pub use config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::gate::{can_save, SaveRejection};
pub use crate::core::session::PlanningSession;
pub use crate::core::target_list::TargetPlan;
pub use utils::error::{PlannerError, Result};
