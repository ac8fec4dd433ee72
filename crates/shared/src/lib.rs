//! Shared utilities and common types for Screen Timer.
//!
//! This crate provides common functionality used across all other crates:
//! - Calendar-day bucketing and window arithmetic
//! - Icon payload encoding
//! - Common validation logic

pub mod calendar;
pub mod encoding;
pub mod validation;
