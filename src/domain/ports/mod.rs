pub mod log_publisher;
pub mod log_repository;

pub use log_publisher::LogPublisher;
pub use log_repository::{LogRepository, RepositoryError};
