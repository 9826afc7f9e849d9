//! postbridge domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `prompts`: Content-length configuration and LLM prompt assembly
//! - `usecases`: Application use cases / business logic

pub mod model;
pub mod ports;
pub mod prompts;
pub mod usecases;

pub use model::*;
pub use ports::*;
pub use prompts::{ArticleBrief, ContentLength, ContentLengthConfig};
