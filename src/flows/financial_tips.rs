//! Personalized budgeting tips derived from the user's income and expenses.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::{run_flow, Flow};
use crate::error::KeuanganError;
use crate::gemini::{LanguageModel, ModelRequest};
use crate::models::{EntryType, FinancialEntry, FinancialTipsOutput};
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntrySnapshot {
    pub date: String,
    pub amount: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDataInput {
    pub income_entries: Vec<EntrySnapshot>,
    pub expense_entries: Vec<EntrySnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_question: Option<String>,
}

impl FinancialDataInput {
    /// Split entries by type into the shape the prompt expects
    pub fn from_entries(entries: &[FinancialEntry], user_question: Option<String>) -> Self {
        let snapshot = |e: &FinancialEntry| EntrySnapshot {
            date: e.date.format("%Y-%m-%d").to_string(),
            amount: e.amount,
            notes: e.notes.clone(),
        };

        Self {
            income_entries: entries
                .iter()
                .filter(|e| e.entry_type == EntryType::Income)
                .map(snapshot)
                .collect(),
            expense_entries: entries
                .iter()
                .filter(|e| e.entry_type == EntryType::Expense)
                .map(snapshot)
                .collect(),
            user_question: user_question.filter(|q| !q.trim().is_empty()),
        }
    }
}

pub struct PersonalizedFinancialTipsFlow;

impl Flow for PersonalizedFinancialTipsFlow {
    const NAME: &'static str = "personalizedFinancialTipsFlow";

    type Input = FinancialDataInput;
    type Output = FinancialTipsOutput;

    fn validate(input: &Self::Input) -> Result<()> {
        let all = input.income_entries.iter().chain(&input.expense_entries);
        if let Some(bad) = all.into_iter().find(|e| !e.amount.is_finite()) {
            return Err(KeuanganError::Validation(format!(
                "Jumlah tidak valid pada entri {}",
                bad.date
            )));
        }
        Ok(())
    }

    fn render(input: &Self::Input) -> Result<ModelRequest> {
        let mut prompt = String::from(
            "Anda adalah penasihat keuangan pribadi. Analisis data pendapatan dan pengeluaran pengguna untuk mengidentifikasi potensi masalah keuangan dan memberikan saran yang dapat ditindaklanjuti. Selalu berikan respons dalam Bahasa Indonesia.\n\n",
        );

        prompt.push_str("Entri Pendapatan:\n");
        push_entries(&mut prompt, &input.income_entries);

        prompt.push_str("\nEntri Pengeluaran:\n");
        push_entries(&mut prompt, &input.expense_entries);

        if let Some(question) = &input.user_question {
            let _ = write!(prompt, "\nPertanyaan Pengguna: {}\n", question);
        }

        prompt.push_str(
            r#"
Berdasarkan data ini, berikan ringkasan situasi keuangan pengguna, identifikasi potensi masalah, dan sarankan tindakan yang dapat diambil. Jika pengguna memiliki pertanyaan, jawablah berdasarkan analisis Anda.

Pastikan keluarannya terstruktur dengan baik dan mudah dipahami, dan seluruhnya dalam Bahasa Indonesia.

Kembalikan HANYA JSON valid dengan format:
{
  "summary": "<ringkasan situasi keuangan pengguna>",
  "potentialIssues": ["<potensi masalah>", "..."],
  "advice": ["<saran yang dapat ditindaklanjuti>", "..."],
  "answer": "<jawaban atas pertanyaan pengguna, hilangkan kolom ini jika tidak ada pertanyaan>"
}"#,
        );

        Ok(ModelRequest::text(prompt))
    }
}

fn push_entries(prompt: &mut String, entries: &[EntrySnapshot]) {
    if entries.is_empty() {
        prompt.push_str("- (tidak ada)\n");
        return;
    }
    for e in entries {
        let _ = writeln!(
            prompt,
            "- Tanggal: {}, Jumlah: {}, Catatan: {}",
            e.date, e.amount, e.notes
        );
    }
}

pub async fn get_personalized_financial_tips(
    model: &dyn LanguageModel,
    input: &FinancialDataInput,
) -> Result<FinancialTipsOutput> {
    run_flow::<PersonalizedFinancialTipsFlow>(model, input).await
}
