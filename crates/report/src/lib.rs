pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod logging;
