//! Parse requests and the payload forwarded to the extraction provider.

use serde::{Deserialize, Deserializer, Serialize};

/// A request to turn a free-text note into transactions.
///
/// The wire form is `{ "text", "incomeCategories", "expenseCategories", "accounts" }`.
/// Hint lists keep the caller's order; repeated names are collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    /// The note exactly as the user typed it
    #[serde(rename = "text")]
    pub raw_text: String,

    /// Known income category names
    #[serde(
        rename = "incomeCategories",
        default,
        deserialize_with = "deserialize_hints"
    )]
    pub income_category_names: Vec<String>,

    /// Known expense category names
    #[serde(
        rename = "expenseCategories",
        default,
        deserialize_with = "deserialize_hints"
    )]
    pub expense_category_names: Vec<String>,

    /// Known account names
    #[serde(rename = "accounts", default, deserialize_with = "deserialize_hints")]
    pub account_names: Vec<String>,
}

impl ParseRequest {
    /// Create a request with no hints
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            income_category_names: Vec::new(),
            expense_category_names: Vec::new(),
            account_names: Vec::new(),
        }
    }

    pub fn with_income_categories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.income_category_names = dedup_hints(names.into_iter().map(Into::into));
        self
    }

    pub fn with_expense_categories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expense_category_names = dedup_hints(names.into_iter().map(Into::into));
        self
    }

    pub fn with_accounts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.account_names = dedup_hints(names.into_iter().map(Into::into));
        self
    }

    /// Borrow the request as the provider's wire payload
    pub fn payload(&self) -> ProviderPayload<'_> {
        ProviderPayload {
            text: &self.raw_text,
            income_categories: &self.income_category_names,
            expense_categories: &self.expense_category_names,
            accounts: &self.account_names,
        }
    }
}

/// Body POSTed to the extraction provider
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPayload<'a> {
    pub text: &'a str,
    pub income_categories: &'a [String],
    pub expense_categories: &'a [String],
    pub accounts: &'a [String],
}

/// Keep first occurrence of each name, skipping blanks
fn dedup_hints(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() || out.iter().any(|n| n == name) {
            continue;
        }
        out.push(name.to_string());
    }
    out
}

fn deserialize_hints<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(dedup_hints(names.unwrap_or_default().into_iter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_deduplicated_in_order() {
        let request = ParseRequest::new("x").with_accounts(["Cash", "MoMo", "Cash", " ", "VCB"]);
        assert_eq!(request.account_names, vec!["Cash", "MoMo", "VCB"]);
    }

    #[test]
    fn test_wire_deserialization() {
        let json = r#"{
            "text": "ăn sáng 30k",
            "incomeCategories": ["Lương"],
            "expenseCategories": ["Ăn uống", "Ăn uống"],
            "accounts": null
        }"#;
        let request: ParseRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.raw_text, "ăn sáng 30k");
        assert_eq!(request.income_category_names, vec!["Lương"]);
        assert_eq!(request.expense_category_names, vec!["Ăn uống"]);
        assert!(request.account_names.is_empty());
    }

    #[test]
    fn test_missing_hints_default_empty() {
        let request: ParseRequest = serde_json::from_str(r#"{"text": "x"}"#).unwrap();
        assert!(request.income_category_names.is_empty());
        assert!(request.expense_category_names.is_empty());
    }

    #[test]
    fn test_payload_shape() {
        let request = ParseRequest::new("cafe 50k")
            .with_income_categories(["Lương"])
            .with_expense_categories(["Ăn uống"])
            .with_accounts(["Cash"]);

        let value = serde_json::to_value(request.payload()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "text": "cafe 50k",
                "incomeCategories": ["Lương"],
                "expenseCategories": ["Ăn uống"],
                "accounts": ["Cash"],
            })
        );
    }
}
