//! client-core: Shared infrastructure for the Daakia mobile login clients.
pub mod config;
pub mod error;
pub mod observability;

pub use reqwest;
pub use serde;
pub use tracing;
