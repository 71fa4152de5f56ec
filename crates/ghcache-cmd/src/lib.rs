//! Command implementations for the ghcache Actions cache cleaner.

pub mod clean;
pub mod factory;

#[cfg(test)]
pub mod test_helpers;
