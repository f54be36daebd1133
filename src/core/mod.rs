//! Core ingestion logic.
//!
//! This module contains:
//! - Error: Request-level failure taxonomy
//! - Limits: Input size and provider timeout
//! - Normalize: Candidate extraction, validation and defaulting
//! - Service: The parse operation tying it together

pub mod error;
pub mod fingerprint;
pub mod limits;
pub mod normalize;
pub mod service;

// Re-export commonly used types
pub use error::IngestError;
pub use fingerprint::fingerprint;
pub use limits::IngestLimits;
pub use normalize::{extract_candidates, normalize_candidate, normalize_response, DropReason, Normalized};
pub use service::NoteIngestService;
