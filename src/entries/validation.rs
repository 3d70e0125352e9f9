//! Entry form validation

use crate::error::KeuanganError;
use crate::models::EntryDraft;
use crate::Result;
use chrono::NaiveDate;

pub const MAX_NOTES_LEN: usize = 200;

/// Oldest date the entry form accepts
pub fn earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Check a draft against the form rules and normalize it.
///
/// A blank category is dropped. `today` bounds the date from above.
pub fn validate_draft(mut draft: EntryDraft, today: NaiveDate) -> Result<EntryDraft> {
    if draft.date > today {
        return Err(KeuanganError::Validation(format!(
            "Tanggal tidak boleh di masa depan ({})",
            draft.date
        )));
    }
    if draft.date < earliest_date() {
        return Err(KeuanganError::Validation(format!(
            "Tanggal terlalu lampau ({})",
            draft.date
        )));
    }

    if !draft.amount.is_finite() || draft.amount <= 0.0 {
        return Err(KeuanganError::Validation(
            "Jumlah harus berupa angka positif.".to_string(),
        ));
    }

    if draft.notes.trim().is_empty() {
        return Err(KeuanganError::Validation(
            "Catatan tidak boleh kosong.".to_string(),
        ));
    }
    if draft.notes.chars().count() > MAX_NOTES_LEN {
        return Err(KeuanganError::Validation(format!(
            "Catatan terlalu panjang (maks {} karakter).",
            MAX_NOTES_LEN
        )));
    }

    draft.category = draft
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(draft)
}
