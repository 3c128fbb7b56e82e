//! Configuration module for VinDash
//!
//! Provides configuration management including CLI arguments
//! and the client settings injected into the API layer.

mod settings;

pub use settings::*;
