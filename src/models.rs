//! Core data models for KeuanganKu

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

//
// ================= Entries =================
//

/// A single income or expense record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub date: NaiveDate,
    pub amount: f64,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Entry payload before an id is assigned (create / edit form)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub date: NaiveDate,
    pub amount: f64,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl EntryDraft {
    pub fn into_entry(self, id: String) -> FinancialEntry {
        FinancialEntry {
            id,
            entry_type: self.entry_type,
            date: self.date,
            amount: self.amount,
            notes: self.notes,
            category: self.category,
        }
    }
}

//
// ================= Flow Outputs =================
//

/// Receipt fields extracted by the model. All four are required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OcrData {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub merchant: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTipsOutput {
    pub summary: String,
    pub potential_issues: Vec<String>,
    pub advice: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

//
// ================= Session =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

//
// ================= Market =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CryptoAsset {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub mock_price: String,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        };
        write!(f, "{}", s)
    }
}
