//! Common test utilities and helpers
//!
//! - `server` - a real server on an ephemeral port
//! - `socket` - a raw protocol client for driving the `/ws` endpoint
//! - `auth_helpers` - JWT minting for secured servers

#![allow(dead_code)]

#[cfg(feature = "ssr")]
pub mod auth_helpers;
#[cfg(feature = "ssr")]
pub mod server;

#[cfg(feature = "ssr")]
pub use auth_helpers::*;
#[cfg(feature = "ssr")]
pub use server::*;
#[cfg(feature = "ssr")]
pub use socket::*;
