//! HTTP boundary.
//!
//! JSON endpoints under `/api/`, the static frontend at `/`, and the server
//! lifecycle. Handlers validate input and delegate to `TriageService`.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::triage_router;
pub use server::{start_server, ServerError, ServerSession, TriageServer};
pub use types::ApiContext;
