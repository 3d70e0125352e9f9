//! Financial entry store
//!
//! Entries live in memory for the lifetime of the process. New entries are
//! prepended, so listing returns newest-first.

pub mod export;
pub mod validation;

pub use export::{export_csv, CsvOptions, ExportLanguage, EXPORT_FILE_NAME};
pub use validation::validate_draft;

use crate::error::KeuanganError;
use crate::models::{EntryDraft, EntryType, FinancialEntry};
use crate::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Trait for entry persistence
#[async_trait::async_trait]
pub trait EntryStore: Send + Sync {
    async fn list(&self) -> Result<Vec<FinancialEntry>>;
    async fn get(&self, id: &str) -> Result<Option<FinancialEntry>>;
    async fn add(&self, draft: EntryDraft) -> Result<FinancialEntry>;
    async fn update(&self, id: &str, draft: EntryDraft) -> Result<FinancialEntry>;
    async fn delete(&self, id: &str) -> Result<FinancialEntry>;
}

/// In-memory entry store
pub struct InMemoryEntryStore {
    entries: Arc<RwLock<Vec<FinancialEntry>>>,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    pub fn with_entries(entries: Vec<FinancialEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Store pre-filled with the sample entries shown on first visit
    pub fn seeded() -> Self {
        Self::with_entries(sample_entries())
    }

    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

impl Default for InMemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn list(&self) -> Result<Vec<FinancialEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<FinancialEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    async fn add(&self, draft: EntryDraft) -> Result<FinancialEntry> {
        let draft = validate_draft(draft, Self::today())?;

        let mut entries = self.entries.write().await;

        let mut id = Uuid::new_v4().to_string();
        while entries.iter().any(|e| e.id == id) {
            id = Uuid::new_v4().to_string();
        }

        let entry = draft.into_entry(id);
        entries.insert(0, entry.clone());

        info!(entry_id = %entry.id, entry_type = %entry.entry_type, "Entry added");
        Ok(entry)
    }

    async fn update(&self, id: &str, draft: EntryDraft) -> Result<FinancialEntry> {
        let draft = validate_draft(draft, Self::today())?;

        let mut entries = self.entries.write().await;
        let slot = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| KeuanganError::EntryNotFound(id.to_string()))?;

        *slot = draft.into_entry(id.to_string());

        info!(entry_id = %id, "Entry updated");
        Ok(slot.clone())
    }

    async fn delete(&self, id: &str) -> Result<FinancialEntry> {
        let mut entries = self.entries.write().await;
        let index = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| KeuanganError::EntryNotFound(id.to_string()))?;

        let removed = entries.remove(index);

        info!(entry_id = %id, "Entry deleted");
        Ok(removed)
    }
}

fn sample_entry(
    id: &str,
    entry_type: EntryType,
    (y, m, d): (i32, u32, u32),
    amount: f64,
    notes: &str,
    category: &str,
) -> Option<FinancialEntry> {
    Some(FinancialEntry {
        id: id.to_string(),
        entry_type,
        date: NaiveDate::from_ymd_opt(y, m, d)?,
        amount,
        notes: notes.to_string(),
        category: Some(category.to_string()),
    })
}

/// The three entries a fresh session starts with
pub fn sample_entries() -> Vec<FinancialEntry> {
    [
        sample_entry("1", EntryType::Income, (2024, 7, 15), 1200.0, "Freelance Project A", "Work"),
        sample_entry("2", EntryType::Expense, (2024, 7, 16), 45.50, "Groceries", "Food"),
        sample_entry("3", EntryType::Expense, (2024, 7, 18), 120.0, "Electricity Bill", "Utilities"),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(notes: &str) -> EntryDraft {
        EntryDraft {
            entry_type: EntryType::Expense,
            date: NaiveDate::from_ymd_opt(2024, 7, 20).unwrap(),
            amount: 80.0,
            notes: notes.to_string(),
            category: Some("Entertainment".to_string()),
        }
    }

    fn ids(entries: &[FinancialEntry]) -> Vec<String> {
        entries.iter().map(|e| e.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_seeded_store() {
        let store = InMemoryEntryStore::seeded();
        let entries = store.list().await.unwrap();
        assert_eq!(ids(&entries), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = InMemoryEntryStore::seeded();

        let found = store.get("3").await.unwrap().unwrap();
        assert_eq!(found.notes, "Electricity Bill");
        assert_eq!(found.category.as_deref(), Some("Utilities"));

        assert!(store.get("404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_prepends_and_keeps_existing_ids() {
        let store = InMemoryEntryStore::seeded();
        let before = store.list().await.unwrap();

        let added = store.add(draft("Subscription Services")).await.unwrap();
        let after = store.list().await.unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[0], added);
        assert_eq!(&after[1..], &before[..]);
        assert!(!before.iter().any(|e| e.id == added.id));
    }

    #[tokio::test]
    async fn test_added_ids_are_unique() {
        let store = InMemoryEntryStore::new();
        let a = store.add(draft("one")).await.unwrap();
        let b = store.add(draft("two")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_invalid_draft_not_stored() {
        let store = InMemoryEntryStore::seeded();
        let mut bad = draft("x");
        bad.amount = -5.0;

        assert!(store.add(bad).await.is_err());
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_position() {
        let store = InMemoryEntryStore::seeded();
        let updated = store.update("2", draft("Weekly groceries")).await.unwrap();

        assert_eq!(updated.id, "2");
        let entries = store.list().await.unwrap();
        assert_eq!(ids(&entries), vec!["1", "2", "3"]);
        assert_eq!(entries[1].notes, "Weekly groceries");
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = InMemoryEntryStore::seeded();
        let result = store.update("404", draft("nope")).await;
        assert!(matches!(result, Err(KeuanganError::EntryNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let store = InMemoryEntryStore::seeded();
        let removed = store.delete("2").await.unwrap();

        assert_eq!(removed.id, "2");
        let entries = store.list().await.unwrap();
        assert_eq!(ids(&entries), vec!["1", "3"]);

        assert!(matches!(
            store.delete("2").await,
            Err(KeuanganError::EntryNotFound(_))
        ));
        assert_eq!(store.list().await.unwrap().len(), 2);
    }
}
