//! CSV export of financial entries

use crate::error::KeuanganError;
use crate::models::FinancialEntry;
use crate::Result;
use serde::Deserialize;

pub const EXPORT_FILE_NAME: &str = "financial_entries.csv";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header language for the exported file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ExportLanguage {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "id")]
    Indonesian,
}

impl ExportLanguage {
    pub fn header(self) -> [&'static str; 6] {
        match self {
            ExportLanguage::English => ["ID", "Type", "Date", "Amount", "Notes", "Category"],
            ExportLanguage::Indonesian => {
                ["ID", "Jenis", "Tanggal", "Jumlah", "Catatan", "Kategori"]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvOptions {
    pub language: ExportLanguage,
    /// Prefix a UTF-8 byte-order mark so spreadsheet apps detect the encoding
    pub byte_order_mark: bool,
}

/// Render entries as CSV: one header row plus one row per entry.
///
/// Fields containing a delimiter, quote or newline are quoted.
pub fn export_csv(entries: &[FinancialEntry], options: CsvOptions) -> Result<Vec<u8>> {
    if entries.is_empty() {
        return Err(KeuanganError::NothingToExport);
    }

    let mut buffer = Vec::new();
    if options.byte_order_mark {
        buffer.extend_from_slice(UTF8_BOM);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer);

    writer.write_record(options.language.header())?;

    for entry in entries {
        let date = entry.date.format("%Y-%m-%d").to_string();
        let amount = entry.amount.to_string();
        writer.write_record([
            entry.id.as_str(),
            entry.entry_type.to_string().as_str(),
            date.as_str(),
            amount.as_str(),
            entry.notes.as_str(),
            entry.category.as_deref().unwrap_or(""),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| KeuanganError::IoError(e.into_error()))
}
