//! Domain layer for Screen Timer.
//!
//! This crate contains:
//! - Usage models (raw intervals and the three aggregated result shapes)
//! - Collaborator seams for the platform usage service, package catalog and access gate
//! - The usage aggregation engine
//! - Domain error types

pub mod error;
pub mod metrics;
pub mod models;
pub mod services;

pub use error::EngineError;
