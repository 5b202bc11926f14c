pub mod freeze;
pub mod gate;
pub mod repository;
pub mod session;
pub mod target_list;

pub use crate::domain::model::{MonthlyTarget, SaveTargetsRequest, Track};
pub use crate::domain::ports::{RemoteSource, SettingsProvider, Storage, TargetStore};
pub use crate::utils::error::Result;
