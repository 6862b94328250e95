//! HTTP API: configuration, the authentication pipeline, and member routes.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
