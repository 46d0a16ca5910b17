pub mod actions;
pub mod export;
mod mutator;
pub mod orchestrator;
pub mod store;
pub mod view;

pub use actions::SummaryAction;
pub use orchestrator::SummaryOrchestrator;
pub use store::{Operation, ProgressStatus, SummaryStore, ViewType};
