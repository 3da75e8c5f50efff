//! Client module
//!
//! This module provides clients for the tasktrack API: one over HTTP and one
//! that calls into an in-process `Core`.

mod core;
mod http;
mod trait_def;

// Re-export the trait and types
pub use self::core::CoreClient;
pub use http::{ClientConfig, ClientError, HttpClientImpl};
pub use trait_def::Client;
