//! Common test utilities shared by the integration tests.
//!
//! - Fixtures: page configurations, status responses, schedulers
//! - Assertions: control visibility checks against a [`MemorySurface`]
//!
//! [`MemorySurface`]: pw_core::surface::MemorySurface

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
