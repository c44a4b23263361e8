//! Backend boundary: typed bodies and the HTTP client.

mod client;
pub mod types;

pub use client::{ApiClient, Endpoint};
pub use types::*;
