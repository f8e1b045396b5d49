//! Built-in tools.

mod echo;
mod http;

pub use echo::EchoTool;
pub use http::{HttpTool, HttpToolOptions};
