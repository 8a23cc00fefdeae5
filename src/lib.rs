pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::dto::{CreateLogInput, LogOutput};
pub use application::services::{LogService, LogServiceError};
pub use config::*;
pub use domain::entities::Log;
pub use domain::value_objects::LogLevel;
pub use infrastructure::providers::{EventHub, Subscription};
