//! # pw-protocol
//!
//! Protocol definitions and data models for procwatch.
//!
//! This crate defines all shared data structures used for:
//! - Decoding status endpoint responses
//! - Addressing elements of the UI surface
//! - Communication between the engine and a UI front-end
//!
//! ## Modules
//!
//! - [`status_models`]: Status responses, log entries and canonical statuses
//! - [`ui_models`]: Element ids and per-process element sets
//! - [`ipc`]: Operations and Events for engine-UI communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde and ts-rs
//! - TypeScript generation: Types the host page consumes derive `TS`
//! - Independent compilation: No dependencies on other procwatch crates

pub mod ipc;
pub mod status_models;
pub mod ui_models;

// Re-export all public types for convenience
pub use ipc::*;
pub use status_models::*;
pub use ui_models::*;
