//! Core types for the planner.
//!
//! This crate is shared by `planner-server` and `planner-cli`:
//! - `date_key` and `grid` for the calendar model
//! - `task` and `note` for the records
//! - `store` for the store traits and the local (key-value) variant
//! - `client` for the remote (REST) variant
//! - `protocol` for the JSON types exchanged with the server
//! - `controller` for intent dispatch from a UI

pub mod client;
pub mod controller;
pub mod date_key;
pub mod error;
pub mod grid;
pub mod note;
pub mod planner_config;
pub mod protocol;
pub mod storage;
pub mod store;
pub mod task;

pub use date_key::DateKey;
pub use error::{PlannerError, PlannerResult};
