pub mod actions;
mod mutator;
pub mod orchestrator;
pub mod settings;
pub mod store;
pub mod validation;
pub mod view;

pub use actions::CreationAction;
pub use orchestrator::CreationOrchestrator;
pub use store::{CreationStore, Page, PollSettings};
