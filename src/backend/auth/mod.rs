//! Authentication
//!
//! Bearer-token verification for the socket and room endpoints. Users log
//! in elsewhere; this module only checks the JWTs that login hands out.

pub mod sessions;

pub use sessions::{Claims, TokenVerifier};
