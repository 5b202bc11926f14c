pub mod report;
pub mod runner;

pub use report::PlanReport;
pub use runner::PlanRunner;
