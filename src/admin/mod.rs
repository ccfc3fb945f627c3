//! Kong admin API access: the workspace list and per-workspace `/meta` counts.

pub mod client;
pub mod types;

pub use client::AdminClient;
