//! # Thinking Protocols
//!
//! Interface definitions shared by the tool layer and the workflow engine.
//! Contains only traits and plain data types - no implementations.
//!
//! ## Core Traits
//!
//! - [`Tool`] - A single named reasoning operation
//! - [`ToolExecutor`] - "Execute a named tool with named inputs", the only
//!   capability the orchestration engine consumes

pub mod error;
pub mod tool;
pub mod types;

pub use error::ToolError;
pub use tool::{Tool, ToolContext, ToolDefinition, ToolExecutor};
pub use types::*;
