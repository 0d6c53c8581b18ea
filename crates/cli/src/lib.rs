//! Operator tool over a host snapshot export.

pub mod commands;
pub mod settings;
