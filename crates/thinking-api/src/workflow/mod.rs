//! Workflow registration and execution endpoints.

pub mod routes;
