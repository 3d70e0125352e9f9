//! Finance-support chatbot. Single turn, general information only.

use serde::{Deserialize, Serialize};

use super::{require_text, run_flow, Flow};
use crate::gemini::{LanguageModel, ModelRequest};
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAgentChatInput {
    pub user_input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAgentChatOutput {
    pub bot_response: String,
}

pub struct FinancialChatbotFlow;

impl Flow for FinancialChatbotFlow {
    const NAME: &'static str = "financialChatbotFlow";

    type Input = FinancialAgentChatInput;
    type Output = FinancialAgentChatOutput;

    fn validate(input: &Self::Input) -> Result<()> {
        require_text("userInput", &input.user_input)
    }

    fn render(input: &Self::Input) -> Result<ModelRequest> {
        let prompt = format!(
            r#"Anda adalah Asisten Dukungan Keuangan AI yang ramah dan membantu. Tujuan Anda adalah memberikan informasi umum dan penjelasan tentang topik keuangan pribadi dalam Bahasa Indonesia.

Anda dapat membahas topik seperti:
- Strategi penganggaran dan tabungan
- Memahami istilah keuangan umum (misalnya, inflasi, suku bunga, skor kredit)
- Kiat umum untuk mengelola utang
- Penjelasan berbagai jenis rekening bank atau asuransi (secara umum)

BATASAN PENTING:
- Anda BUKAN penasihat keuangan. JANGAN memberikan nasihat keuangan, investasi, pajak, atau hukum tertentu.
- JANGAN meminta atau menyimpan informasi identitas pribadi (PII) atau detail keuangan sensitif (misalnya, nomor rekening bank, jumlah investasi tertentu).
- Jika pengguna meminta saran atau rekomendasi yang dipersonalisasi, Anda HARUS menolak dan menyarankan mereka untuk berkonsultasi dengan profesional keuangan yang berkualifikasi.
- Jaga agar respons Anda informatif, mudah dipahami, dan suportif.
- Semua respons HARUS dalam Bahasa Indonesia.

Pesan pengguna: {}

Kembalikan HANYA JSON valid dengan format: {{"botResponse": "<respons Anda dalam Bahasa Indonesia>"}}"#,
            input.user_input
        );
        Ok(ModelRequest::text(prompt))
    }
}

pub async fn chat_with_financial_agent(
    model: &dyn LanguageModel,
    input: &FinancialAgentChatInput,
) -> Result<FinancialAgentChatOutput> {
    run_flow::<FinancialChatbotFlow>(model, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeuanganError;
    use crate::flows::testing::ScriptedModel;

    #[tokio::test]
    async fn test_chat_reply() {
        let model = ScriptedModel::replying(r#"{"botResponse":"Inflasi adalah kenaikan harga."}"#);
        let input = FinancialAgentChatInput {
            user_input: "Apa itu inflasi?".to_string(),
        };

        let output = chat_with_financial_agent(&model, &input).await.unwrap();
        assert_eq!(output.bot_response, "Inflasi adalah kenaikan harga.");
        assert!(model.requests()[0].prompt.contains("Pesan pengguna: Apa itu inflasi?"));
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let model = ScriptedModel::replying(r#"{"botResponse":"x"}"#);
        let input = FinancialAgentChatInput {
            user_input: "   ".to_string(),
        };
        let result = chat_with_financial_agent(&model, &input).await;
        assert!(matches!(result, Err(KeuanganError::Validation(_))));
    }
}
