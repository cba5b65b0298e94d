//! Thin HTTP layer shared by both platform clients.

mod client;

pub use client::HttpClient;

/// Sent with every request; the Modrinth API rejects requests without one.
pub const USER_AGENT: &str = concat!("packpub/", env!("CARGO_PKG_VERSION"));
