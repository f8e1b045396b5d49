//! # Unified Thinking Core
//!
//! Tool catalogue for the unified-thinking server.
//!
//! ## Components
//!
//! - [`ToolRegistry`] - Name to tool lookup; the default [`ToolExecutor`]
//!   handed to the workflow engine
//! - [`EchoTool`] - Built-in tool that returns its input
//! - [`HttpTool`] - Forwards a tool call to a remote JSON endpoint
//!
//! [`ToolExecutor`]: thinking_protocols::ToolExecutor

pub mod error;
pub mod registry;
pub mod tools;

pub use error::RegistryError;
pub use registry::ToolRegistry;
pub use tools::{EchoTool, HttpTool, HttpToolOptions};
