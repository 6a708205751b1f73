//! Backend Error Module
//!
//! Error types used by the server's HTTP handlers, socket handler and
//! middleware.
//!
//! - **`types`** - `BackendError` definition and constructors
//! - **`conversion`** - `IntoResponse` implementation (JSON error bodies)

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
