//! Command implementations

pub mod config;
pub mod doctor;
pub mod prompt;
pub mod publish;
