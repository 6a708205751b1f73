//! Route Configuration Module
//!
//! - **`router`** - Main router creation, CORS and tracing layers
//! - **`collab_routes`** - Socket and room endpoints behind the auth middleware
//!
//! # Routes
//!
//! - `GET /ws` - WebSocket upgrade for the collaboration protocol
//! - `GET /api/rooms/{note_id}` - Room subscriber count
//! - `GET /api/rooms/{note_id}/events` - SSE feed of a room
//! - `GET /health` - Liveness probe, never authenticated

/// Main router creation
pub mod router;

/// Collaboration route handlers
pub mod collab_routes;

pub use router::create_router;
