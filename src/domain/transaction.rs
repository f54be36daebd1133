//! Trusted transaction output.
//!
//! Everything in here has already passed validation; callers can show or
//! persist it without further checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category label used when the provider did not name one ("Other")
pub const DEFAULT_CATEGORY_LABEL: &str = "Khác";

/// Direction of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl Default for TransactionKind {
    /// Ambiguous notes are assumed to be spending
    fn default() -> Self {
        Self::Expense
    }
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }

    /// Map a provider-supplied type label, falling back to `Expense`
    pub fn from_label(label: Option<&str>) -> Self {
        label
            .and_then(|l| l.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for TransactionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated transaction ready to hand to persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Always finite and strictly positive
    pub amount: f64,

    #[serde(rename = "category")]
    pub category_label: String,

    /// Empty when the provider could not resolve an account
    #[serde(rename = "account")]
    pub account_label: String,

    pub description: String,

    #[serde(rename = "datetime")]
    pub occurred_at: Option<String>,

    #[serde(rename = "toAccount")]
    pub transfer_to_account_label: Option<String>,
}

/// Outcome of one parse call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Accepted transactions, in provider order
    pub accepted: Vec<NormalizedTransaction>,

    /// The note that produced them
    pub source_text: String,
}
