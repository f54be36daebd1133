//! Domain types for quick-note ingestion.
//!
//! This module contains the core data structures:
//! - Request: What the caller asks to parse, plus its hints
//! - Candidate: Untrusted records as returned by the extraction provider
//! - Transaction: Trusted, normalized output

pub mod candidate;
pub mod request;
pub mod transaction;

// Re-export commonly used types
pub use candidate::{AmountField, RawCandidate};
pub use request::{ParseRequest, ProviderPayload};
pub use transaction::{NormalizedTransaction, ParseResult, TransactionKind, DEFAULT_CATEGORY_LABEL};
