//! Follow-up questions about previously generated tips.

use serde::{Deserialize, Serialize};

use super::{require_text, run_flow, Flow};
use crate::error::KeuanganError;
use crate::gemini::{LanguageModel, ModelRequest};
use crate::models::FinancialTipsOutput;
use crate::Result;

pub const MIN_QUESTION_LEN: usize = 5;
pub const MAX_QUESTION_LEN: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskFinancialQuestionInput {
    pub question: String,
    pub financial_tips: String,
}

impl AskFinancialQuestionInput {
    pub fn from_tips(question: String, tips: &FinancialTipsOutput) -> Self {
        Self {
            question,
            financial_tips: tips_context(tips),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskFinancialQuestionOutput {
    pub answer: String,
}

/// Flatten tips into the single context line handed to the model
pub fn tips_context(tips: &FinancialTipsOutput) -> String {
    format!(
        "Summary: {}. Issues: {}. Advice: {}.",
        tips.summary,
        tips.potential_issues.join(", "),
        tips.advice.join(", ")
    )
}

pub struct AskFinancialQuestionFlow;

impl Flow for AskFinancialQuestionFlow {
    const NAME: &'static str = "askFinancialQuestionFlow";

    type Input = AskFinancialQuestionInput;
    type Output = AskFinancialQuestionOutput;

    fn validate(input: &Self::Input) -> Result<()> {
        let len = input.question.trim().chars().count();
        if len < MIN_QUESTION_LEN {
            return Err(KeuanganError::Validation(format!(
                "Pertanyaan minimal {} karakter.",
                MIN_QUESTION_LEN
            )));
        }
        if len > MAX_QUESTION_LEN {
            return Err(KeuanganError::Validation(format!(
                "Pertanyaan terlalu panjang (maks {} karakter).",
                MAX_QUESTION_LEN
            )));
        }
        require_text("financialTips", &input.financial_tips)
    }

    fn render(input: &Self::Input) -> Result<ModelRequest> {
        let prompt = format!(
            r#"Anda adalah seorang penasihat keuangan. Seorang pengguna telah menerima tips dan kesimpulan keuangan berikut:

{}

Pengguna menanyakan pertanyaan berikut tentang tips ini:

{}

Jawab pertanyaan pengguna dengan jelas dan ringkas, menggunakan informasi yang diberikan dalam tips dan kesimpulan keuangan sebagai konteks. Jangan memberikan nasihat keuangan apa pun di luar cakupan tips dan kesimpulan yang diberikan. Selalu jawab dalam Bahasa Indonesia.

Kembalikan HANYA JSON valid dengan format: {{"answer": "<jawaban>"}}"#,
            input.financial_tips,
            input.question.trim()
        );
        Ok(ModelRequest::text(prompt))
    }
}

pub async fn ask_financial_question(
    model: &dyn LanguageModel,
    input: &AskFinancialQuestionInput,
) -> Result<AskFinancialQuestionOutput> {
    run_flow::<AskFinancialQuestionFlow>(model, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::ScriptedModel;

    fn tips() -> FinancialTipsOutput {
        FinancialTipsOutput {
            summary: "Pendapatan melebihi pengeluaran".to_string(),
            potential_issues: vec!["Sewa tinggi".to_string(), "Makan di luar".to_string()],
            advice: vec!["Buat anggaran".to_string()],
            answer: None,
        }
    }

    #[test]
    fn test_tips_context_format() {
        assert_eq!(
            tips_context(&tips()),
            "Summary: Pendapatan melebihi pengeluaran. Issues: Sewa tinggi, Makan di luar. Advice: Buat anggaran."
        );
    }

    #[tokio::test]
    async fn test_question_length_bounds() {
        let model = ScriptedModel::replying(r#"{"answer":"ok"}"#);

        let short = AskFinancialQuestionInput::from_tips("Apa?".to_string(), &tips());
        assert!(ask_financial_question(&model, &short).await.is_err());

        let long = AskFinancialQuestionInput::from_tips("a".repeat(501), &tips());
        assert!(ask_financial_question(&model, &long).await.is_err());

        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_answer_returned_with_context_in_prompt() {
        let model = ScriptedModel::replying(r#"{"answer":"Kurangi makan di luar."}"#);
        let input =
            AskFinancialQuestionInput::from_tips("Bagaimana cara berhemat?".to_string(), &tips());

        let output = ask_financial_question(&model, &input).await.unwrap();
        assert_eq!(output.answer, "Kurangi makan di luar.");

        let prompt = &model.requests()[0].prompt;
        assert!(prompt.contains("Issues: Sewa tinggi, Makan di luar"));
        assert!(prompt.contains("Bagaimana cara berhemat?"));
    }
}
