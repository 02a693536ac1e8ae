//! Internal modules for the table client.
//!
//! This library provides command parsing, logging setup and text rendering
//! used by the sp_client binary.

pub mod commands;
pub mod logging;
pub mod view;
