//! Tool protocol definitions.
//!
//! Tools are the reasoning operations a workflow step invokes by name.

mod context;
mod definition;
mod executor;
mod traits;

pub use context::*;
pub use definition::*;
pub use executor::*;
pub use traits::*;
