//! CLI library components for the layout inspector.

#![deny(unsafe_code)]

pub mod commands;
pub mod logging;
pub mod summary;
