//! # Unified Thinking API
//!
//! HTTP surface of the workflow engine.
//!
//! ## Components
//!
//! - [`create_router`] - All routes over a shared [`AppState`]
//! - [`ApiServer`] - Binds, serves and shuts down on Ctrl-C
//! - [`ApiError`] - Error type rendered as `{"error": ...}`

pub mod error;
pub mod http;
pub mod server;
pub mod state;
pub mod workflow;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::{ApiConfig, ApiServer};
pub use state::AppState;
