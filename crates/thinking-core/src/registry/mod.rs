//! Registries.

pub mod base;
mod tool;

pub use base::{BaseRegistry, Registerable};
pub use tool::ToolRegistry;
