//! # ItemTrack Shared Library
//!
//! This crate contains the data layer shared by the ItemTrack API server:
//! connection pooling, migrations, and the database models.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `db`: Connection pool and migration runner

pub mod db;
pub mod models;

/// Current version of the ItemTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
