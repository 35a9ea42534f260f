//! # pw-core
//!
//! Status polling engine for procwatch.
//!
//! This crate provides:
//! - Page configuration loading from TOML or YAML files
//! - Decoding of raw status codes into canonical statuses
//! - Projection of statuses onto the UI surface
//! - Console tailing in entries and file mode
//! - The non-overlapping poll loop
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`codec`]: Status code dialects and default messages
//! - [`registry`]: The set of tracked processes
//! - [`reconciler`]: Status to control visibility
//! - [`tailer`]: Console output
//! - [`transport`]: HTTP and scripted transports
//! - [`surface`]: The UI surface abstraction
//! - [`scheduler`]: The poll loop

pub mod codec;
pub mod config;
pub mod reconciler;
pub mod registry;
pub mod scheduler;
pub mod surface;
pub mod tailer;
pub mod transport;
