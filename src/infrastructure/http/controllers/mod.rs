pub mod events;
pub mod logs;
