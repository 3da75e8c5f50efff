//! tasktrack library crate
//!
//! An in-memory project and task tracker with a keyword-based intake
//! classifier, served over HTTP.

pub mod api;
pub mod cli;
pub mod intake;
pub mod models;
pub mod store;

pub use store::{Core, Store};
