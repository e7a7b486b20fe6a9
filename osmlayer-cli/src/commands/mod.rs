//! CLI command implementations.

pub mod common;
pub mod config;
pub mod parse;
pub mod query;
pub mod tiles;
