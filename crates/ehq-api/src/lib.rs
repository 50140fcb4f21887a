//! Client for the EngagementHQ v2 API: token authentication and project listing.

pub mod client;
pub mod types;

pub use client::{EhqClient, DEFAULT_TIMEOUT};
pub use types::*;
