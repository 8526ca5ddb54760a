//! isgpt Server
//!
//! HTTP front end for the perplexity-based detector.
//!
//! - `POST /infer` scores a text and answers in plain text, or JSON when
//!   `verbose` is set
//! - `GET /health`, `GET /` and `GET /metrics` for operations

pub mod config;
pub mod routes;
pub mod state;

pub use config::{Overrides, ServerConfig};
pub use routes::{create_router, AppError, InferRequest};
pub use state::AppState;
