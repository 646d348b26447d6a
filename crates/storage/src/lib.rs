//! Storage layer for the lost & found client
//!
//! This crate provides the versioned, checksummed JSON documents the
//! client persists between runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod persistence;

pub use persistence::{PersistedState, PersistenceConfig, PersistenceError};
