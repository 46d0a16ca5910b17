pub mod config;
pub mod creation;
pub mod datetime;
pub mod error;
pub mod localization;
pub mod models;
pub mod progress;
pub mod render;
pub mod sdk;
pub mod store;
pub mod summary;
pub mod view;

pub use config::Config;
pub use error::ApiError;
pub use store::Store;
