//! Candidate extraction and normalization.
//!
//! Turns a provider response body into trusted transactions. Invalid
//! candidates are dropped with a reason; nothing in here returns an error
//! to the caller.

use serde_json::Value;
use thiserror::Error;

use crate::domain::{AmountField, NormalizedTransaction, RawCandidate, TransactionKind};

/// Field holding the candidate list in an object-shaped response
pub const CANDIDATES_FIELD: &str = "transactions";

/// Why a candidate was not accepted
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DropReason {
    #[error("amount missing")]
    AmountMissing,

    #[error("amount not numeric: {0}")]
    AmountNotNumeric(String),

    #[error("amount not finite")]
    AmountNotFinite,

    #[error("amount not positive: {0}")]
    AmountNotPositive(f64),
}

/// A candidate that failed validation, with its provider index
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedCandidate {
    pub index: usize,
    pub reason: DropReason,
}

/// Accepted transactions plus the candidates that were filtered out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub accepted: Vec<NormalizedTransaction>,
    pub dropped: Vec<DroppedCandidate>,
}

impl Normalized {
    pub fn candidate_count(&self) -> usize {
        self.accepted.len() + self.dropped.len()
    }
}

/// Locate the candidate list in a response body.
///
/// Accepts `{ "transactions": [..] }` or a bare array. Any other shape
/// yields no candidates.
pub fn extract_candidates(body: &Value) -> &[Value] {
    if let Some(list) = body.get(CANDIDATES_FIELD).and_then(Value::as_array) {
        return list;
    }
    body.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Validate and default one decoded candidate
pub fn normalize_candidate(
    raw: RawCandidate,
    default_category: &str,
) -> Result<NormalizedTransaction, DropReason> {
    let amount = match raw.amount {
        AmountField::Missing => return Err(DropReason::AmountMissing),
        AmountField::Unparseable(text) => return Err(DropReason::AmountNotNumeric(text)),
        AmountField::Value(v) if !v.is_finite() => return Err(DropReason::AmountNotFinite),
        AmountField::Value(v) if v <= 0.0 => return Err(DropReason::AmountNotPositive(v)),
        AmountField::Value(v) => v,
    };

    let category_label = raw
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| default_category.to_string());

    Ok(NormalizedTransaction {
        kind: TransactionKind::from_label(raw.kind_label.as_deref()),
        amount,
        category_label,
        account_label: raw.account.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        occurred_at: raw.datetime,
        transfer_to_account_label: raw.to_account,
    })
}

/// Extract, decode and normalize every candidate in a response body.
///
/// Order of accepted transactions follows the provider's order. Duplicates
/// are kept.
pub fn normalize_response(body: &Value, default_category: &str) -> Normalized {
    let mut out = Normalized::default();

    for (index, value) in extract_candidates(body).iter().enumerate() {
        match normalize_candidate(RawCandidate::decode(value), default_category) {
            Ok(tx) => out.accepted.push(tx),
            Err(reason) => out.dropped.push(DroppedCandidate { index, reason }),
        }
    }

    out
}
