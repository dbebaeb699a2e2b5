//! Dashboard API client and wire types.

pub mod client;
pub(crate) mod types;

pub use client::ApiClient;
