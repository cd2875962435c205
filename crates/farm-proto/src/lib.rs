//! Shared wire types, HTTP client and configuration for the farm dashboard.

pub mod client;
pub mod config;
pub mod platform;
pub mod protocol;
