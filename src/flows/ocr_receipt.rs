//! Receipt OCR flow: extracts date, amount, category and merchant from an
//! uploaded receipt image.

use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{run_flow, Flow};
use crate::error::KeuanganError;
use crate::gemini::{InlineMedia, LanguageModel, ModelRequest};
use crate::models::{EntryDraft, EntryType, OcrData};
use crate::Result;

/// Largest decoded receipt image accepted
pub const MAX_RECEIPT_BYTES: usize = 5 * 1024 * 1024;

/// Image types accepted by the receipt upload
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrReceiptInput {
    /// `data:<mimetype>;base64,<encoded_data>`
    pub receipt_data_uri: String,
}

pub struct OcrReceiptFlow;

impl Flow for OcrReceiptFlow {
    const NAME: &'static str = "ocrReceiptFlow";

    type Input = OcrReceiptInput;
    type Output = OcrData;

    fn validate(input: &Self::Input) -> Result<()> {
        parse_data_uri(&input.receipt_data_uri).map(|_| ())
    }

    fn render(input: &Self::Input) -> Result<ModelRequest> {
        let media = parse_data_uri(&input.receipt_data_uri)?;

        let prompt = r#"You are an expert in extracting data from receipts. Given a receipt image, extract the date, amount, category, and merchant.

Return ONLY valid JSON in this exact format:
{
  "date": "<date on the receipt, YYYY-MM-DD>",
  "amount": <total amount on the receipt as a number>,
  "category": "<expense category of the receipt>",
  "merchant": "<name of the merchant on the receipt>"
}"#;

        Ok(ModelRequest::text(prompt).with_media(media))
    }
}

pub async fn ocr_receipt(model: &dyn LanguageModel, input: &OcrReceiptInput) -> Result<OcrData> {
    run_flow::<OcrReceiptFlow>(model, input).await
}

/// Split and check a base64 data URI
pub fn parse_data_uri(uri: &str) -> Result<InlineMedia> {
    let invalid = |why: &str| KeuanganError::Validation(format!("Invalid receipt data URI: {}", why));

    let rest = uri.trim().strip_prefix("data:").ok_or_else(|| invalid("missing data: prefix"))?;
    let (meta, payload) = rest.split_once(',').ok_or_else(|| invalid("missing payload"))?;
    let mime_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| invalid("payload must be base64 encoded"))?;

    if !ACCEPTED_MIME_TYPES.contains(&mime_type) {
        return Err(invalid("image must be PNG, JPG or WEBP"));
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| invalid(&e.to_string()))?;

    if decoded.is_empty() {
        return Err(invalid("empty image"));
    }
    if decoded.len() > MAX_RECEIPT_BYTES {
        return Err(invalid("image larger than 5MB"));
    }

    Ok(InlineMedia {
        mime_type: mime_type.to_string(),
        data: payload.to_string(),
    })
}

/// Pre-fill an expense entry from extracted receipt data
pub fn entry_draft_from_ocr(ocr: &OcrData) -> Result<EntryDraft> {
    let date = NaiveDate::parse_from_str(ocr.date.trim(), "%Y-%m-%d").map_err(|e| {
        KeuanganError::Validation(format!("Receipt date '{}' is not YYYY-MM-DD: {}", ocr.date, e))
    })?;

    Ok(EntryDraft {
        entry_type: EntryType::Expense,
        date,
        amount: ocr.amount,
        notes: format!("Purchase at {}", ocr.merchant),
        category: Some(ocr.category.clone()).filter(|c| !c.trim().is_empty()),
    })
}
