//! API endpoint handlers.
//!
//! Handlers are thin: validate the request, then hand off to `TriageService`
//! on the blocking pool, since the remote clients perform blocking I/O.

pub mod analyze;
pub mod health;
pub mod image;
