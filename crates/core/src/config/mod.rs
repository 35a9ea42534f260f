//! Page configuration loading and validation.
//!
//! This module replaces the constants a host page used to inject (status
//! URLs, CSRF token, element ids) with an explicit, validated configuration.

pub mod error;
pub mod loader;
pub mod models;
