//! Core types and utilities for the ghcache Actions cache cleaner.
//!
//! This crate provides the foundational pieces shared by the API and command crates:
//! - [`IOStreams`] for terminal I/O with capturable output
//! - [`Repo`] and organization name parsing
//! - Text utilities, table formatting, and color schemes

pub mod cmdutil;
pub mod instance;
pub mod iostreams;
pub mod repo;
pub mod table;
pub mod text;

pub use iostreams::IOStreams;
pub use repo::Repo;
