//! Dashboard figures derived from the entry list

use crate::error::KeuanganError;
use crate::models::{EntryType, FinancialEntry};
use crate::Result;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    /// Parse `YYYY-MM`
    pub fn parse(raw: &str) -> Result<Self> {
        NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
            .map(|d| Month {
                year: d.year(),
                month: d.month(),
            })
            .map_err(|_| KeuanganError::Validation(format!("Invalid month '{}', expected YYYY-MM", raw)))
    }

    fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_balance: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    /// Percentage of income left after expenses
    pub savings_rate: f64,
    pub entry_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
}

pub fn summarize(entries: &[FinancialEntry], month: Option<Month>) -> DashboardSummary {
    let in_scope = entries
        .iter()
        .filter(|e| month.map_or(true, |m| m.contains(e.date)));

    let mut income = 0.0;
    let mut expenses = 0.0;
    let mut count = 0;

    for entry in in_scope {
        match entry.entry_type {
            EntryType::Income => income += entry.amount,
            EntryType::Expense => expenses += entry.amount,
        }
        count += 1;
    }

    let balance = income - expenses;
    let savings_rate = if income > 0.0 {
        balance / income * 100.0
    } else {
        0.0
    };

    DashboardSummary {
        total_balance: balance,
        total_income: income,
        total_expenses: expenses,
        savings_rate,
        entry_count: count,
        month,
    }
}

/// Format an amount as Indonesian Rupiah: `Rp 1.200`, `Rp 45,5`
pub fn format_idr(amount: f64) -> String {
    let negative = amount < 0.0;
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    let dec = dec_part.trim_end_matches('0');
    let body = if dec.is_empty() {
        grouped
    } else {
        format!("{},{}", grouped, dec)
    };

    if negative {
        format!("-Rp {}", body)
    } else {
        format!("Rp {}", body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::sample_entries;

    #[test]
    fn test_summary_over_samples() {
        let summary = summarize(&sample_entries(), None);
        assert_eq!(summary.total_income, 1200.0);
        assert_eq!(summary.total_expenses, 165.5);
        assert_eq!(summary.total_balance, 1034.5);
        assert!((summary.savings_rate - 86.208333).abs() < 1e-4);
        assert_eq!(summary.entry_count, 3);
    }

    #[test]
    fn test_month_filter() {
        let july = Month::parse("2024-07").unwrap();
        assert_eq!(summarize(&sample_entries(), Some(july)).entry_count, 3);

        let june = Month::parse("2024-06").unwrap();
        let empty = summarize(&sample_entries(), Some(june));
        assert_eq!(empty.entry_count, 0);
        assert_eq!(empty.savings_rate, 0.0);

        assert!(Month::parse("2024-13").is_err());
        assert!(Month::parse("July").is_err());
    }

    #[test]
    fn test_idr_formatting() {
        assert_eq!(format_idr(1200.0), "Rp 1.200");
        assert_eq!(format_idr(45.5), "Rp 45,5");
        assert_eq!(format_idr(1_050_250_000.0), "Rp 1.050.250.000");
        assert_eq!(format_idr(0.0), "Rp 0");
        assert_eq!(format_idr(-16_250.0), "-Rp 16.250");
    }
}
