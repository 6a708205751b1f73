//! Middleware Module
//!
//! Request middleware for the collaboration server.
//!
//! - **`auth`** - JWT check for the socket and room endpoints

pub mod auth;

pub use auth::{auth_middleware, AuthenticatedUser};
