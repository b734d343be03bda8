//! API Middleware
//!
//! Middleware layers that run before the GraphQL handler.

pub mod auth;

pub use auth::attach_identity;
