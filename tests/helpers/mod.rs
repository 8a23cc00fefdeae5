#![allow(dead_code)]
pub mod mocks;
pub mod test_db;

pub use mocks::*;
pub use test_db::*;
