//! Router assembly and service endpoints.

pub mod monitoring;
pub mod routes;
pub mod tools;
