//! GitHub REST client and Actions cache endpoints for ghcache.

pub mod client;
pub mod errors;
pub mod http;
pub mod queries;
