//! Domain models for transactions, import candidates and partial updates.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::common::Language;

/// A stored money movement. Dates serialize as `YYYY-MM-DD` so the persisted
/// form never depends on a timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: f64,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Amount with the sign it contributes to a balance.
    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }

    pub fn duplicate_key(&self) -> DuplicateKey {
        DuplicateKey::new(self.date, &self.description, self.amount, self.kind)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
/// Direction of a transaction.
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Localized label, as written in CSV files.
    pub fn label(self, language: Language) -> &'static str {
        match self {
            TransactionKind::Income => language.income_label(),
            TransactionKind::Expense => language.expense_label(),
        }
    }

    /// Maps a localized label back to a kind, ignoring case and padding.
    pub fn from_label(raw: &str, language: Language) -> Option<Self> {
        let needle = raw.trim().to_lowercase();
        if needle == language.income_label().to_lowercase() {
            Some(TransactionKind::Income)
        } else if needle == language.expense_label().to_lowercase() {
            Some(TransactionKind::Expense)
        } else {
            None
        }
    }

    pub fn signed(self, amount: f64) -> f64 {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction type `{other}`")),
        }
    }
}

/// Invariant violations for transaction data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("amount must be a positive number (got {0})")]
    NonPositiveAmount(f64),
    #[error("description is required")]
    MissingDescription,
    #[error("category is required")]
    MissingCategory,
}

/// A candidate transaction: every field of [`Transaction`] except the id,
/// which the store assigns on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl NewTransaction {
    pub fn new(
        date: NaiveDate,
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            date,
            amount,
            description: description.into(),
            category: category.into(),
            kind,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        Ok(())
    }

    /// Returns the candidate with surrounding whitespace removed from text fields.
    pub fn normalized(mut self) -> Self {
        self.description = self.description.trim().to_string();
        self.category = self.category.trim().to_string();
        self
    }

    pub fn into_transaction(self, id: Uuid) -> Transaction {
        Transaction {
            id,
            date: self.date,
            amount: self.amount,
            description: self.description,
            category: self.category,
            kind: self.kind,
        }
    }

    pub fn duplicate_key(&self) -> DuplicateKey {
        DuplicateKey::new(self.date, &self.description, self.amount, self.kind)
    }
}

impl From<&Transaction> for NewTransaction {
    fn from(txn: &Transaction) -> Self {
        Self {
            date: txn.date,
            amount: txn.amount,
            description: txn.description.clone(),
            category: txn.category.clone(),
            kind: txn.kind,
        }
    }
}

/// Identity used to detect repeated imports: date, description, amount and type.
/// Category is deliberately not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    date: NaiveDate,
    description: String,
    amount_bits: u64,
    kind: TransactionKind,
}

impl DuplicateKey {
    pub fn new(date: NaiveDate, description: &str, amount: f64, kind: TransactionKind) -> Self {
        Self {
            date,
            description: description.to_string(),
            amount_bits: amount.to_bits(),
            kind,
        }
    }
}

/// Partial update merged into an existing transaction. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.kind.is_none()
    }

    pub fn apply_to(&self, txn: &mut Transaction) {
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(amount) = self.amount {
            txn.amount = amount;
        }
        if let Some(description) = &self.description {
            txn.description = description.trim().to_string();
        }
        if let Some(category) = &self.category {
            txn.category = category.trim().to_string();
        }
        if let Some(kind) = self.kind {
            txn.kind = kind;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candidate(amount: f64) -> NewTransaction {
        NewTransaction::new(
            date(2025, 1, 1),
            amount,
            "Rent",
            "Casa",
            TransactionKind::Expense,
        )
    }

    #[test]
    fn validate_rejects_non_positive_and_non_finite_amounts() {
        assert!(candidate(10.0).validate().is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                candidate(bad).validate(),
                Err(ValidationError::NonPositiveAmount(_))
            ));
        }
    }

    #[test]
    fn validate_requires_text_fields_after_trim() {
        let mut txn = candidate(1.0);
        txn.description = "   ".into();
        assert_eq!(txn.validate(), Err(ValidationError::MissingDescription));
        let mut txn = candidate(1.0);
        txn.category = "\t".into();
        assert_eq!(txn.validate(), Err(ValidationError::MissingCategory));
    }

    #[test]
    fn serializes_with_type_field_and_iso_date() {
        let txn = candidate(500.0).into_transaction(Uuid::nil());
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["date"], "2025-01-01");
        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }

    #[test]
    fn kind_labels_are_case_insensitive() {
        let pt = Language::Portuguese;
        assert_eq!(
            TransactionKind::from_label("GANHO", pt),
            Some(TransactionKind::Income)
        );
        assert_eq!(
            TransactionKind::from_label(" gasto ", pt),
            Some(TransactionKind::Expense)
        );
        assert_eq!(TransactionKind::from_label("Income", pt), None);
        assert_eq!(
            TransactionKind::from_label("income", Language::English),
            Some(TransactionKind::Income)
        );
    }

    #[test]
    fn duplicate_key_ignores_category() {
        let a = candidate(12.5);
        let mut b = candidate(12.5);
        b.category = "Outros".into();
        assert_eq!(a.duplicate_key(), b.duplicate_key());
        assert_ne!(a.duplicate_key(), candidate(12.51).duplicate_key());
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut txn = candidate(10.0).into_transaction(Uuid::new_v4());
        let patch = TransactionPatch {
            amount: Some(20.0),
            category: Some("  Lazer ".into()),
            ..TransactionPatch::default()
        };
        patch.apply_to(&mut txn);
        assert_eq!(txn.amount, 20.0);
        assert_eq!(txn.category, "Lazer");
        assert_eq!(txn.description, "Rent");
        assert!(TransactionPatch::default().is_empty());
    }
}
