//! quicknote - Quick-note transaction ingestion
//!
//! Turns free-text money notes ("cafe 50k tiền mặt") into validated
//! transactions by way of an external extraction provider (an LLM worker).
//!
//! # Architecture
//!
//! The provider's output is untrusted:
//! - Each candidate is decoded field by field into typed optionals
//! - Candidates with an unusable amount are dropped, never raised
//! - Defaults fill the rest (unknown type → expense, no category → "Khác")
//!
//! # Modules
//!
//! - `adapters`: External collaborators (extraction worker, identity service)
//! - `core`: Ingestion logic (NoteIngestService, normalization, limits, errors)
//! - `domain`: Data structures (ParseRequest, RawCandidate, NormalizedTransaction)
//! - `server`: HTTP endpoint
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Parse one note
//! quicknote parse "ăn sáng 30k, đổ xăng 50k" --account Cash
//!
//! # Run the HTTP endpoint
//! quicknote serve --bind 0.0.0.0:3000
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;

// Re-export main types at crate root for convenience
pub use adapters::{ExtractionProvider, IdentityVerifier, UserIdentity};
pub use crate::core::{IngestError, IngestLimits, NoteIngestService};
pub use domain::{NormalizedTransaction, ParseRequest, ParseResult, TransactionKind};
