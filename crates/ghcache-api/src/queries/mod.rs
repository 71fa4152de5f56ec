//! Typed REST endpoints.

pub mod cache;
