//! Core module - engine configuration
//!
//! - [`EngineConfig`] - engine configuration

pub mod config;

pub use config::EngineConfig;
