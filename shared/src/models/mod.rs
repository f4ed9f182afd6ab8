//! Data models
//!
//! Supplied by collaborators (catalog, policy admin, customer settings) and
//! read, never mutated, by the scheduling engine.

pub mod customer;
pub mod notification;
pub mod policy;
pub mod service;
pub mod staff;

// Re-exports
pub use customer::*;
pub use notification::*;
pub use policy::*;
pub use service::*;
pub use staff::*;
