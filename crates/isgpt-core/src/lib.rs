//! isgpt Core
//!
//! Types and utilities shared across the isgpt crates.
//!
//! This crate provides:
//! - Error types and result handling
//! - The detection response model (labels, per-sentence details, overall result)
//! - Plain-text rendering of a detection result

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    need_more_text_status, DetectionResult, Label, SentenceDetail, NO_VALID_SENTENCES,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{DetectionResult, Label, SentenceDetail};
}
