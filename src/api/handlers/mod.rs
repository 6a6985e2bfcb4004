//! API request handlers.

/// Liveness and health handlers.
pub mod health;
/// Company research handlers (JSON and markdown).
pub mod research;
