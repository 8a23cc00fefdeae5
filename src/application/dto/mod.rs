pub mod log;

pub use log::{CreateLogInput, LogOutput};
