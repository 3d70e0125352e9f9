//! Short AI write-up of a cryptocurrency, in Bahasa Indonesia.

use serde::{Deserialize, Serialize};

use super::{require_text, run_flow, Flow};
use crate::gemini::{LanguageModel, ModelRequest};
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCryptocurrencyInput {
    pub cryptocurrency_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeCryptocurrencyOutput {
    pub analysis: String,
}

pub struct AnalyzeCryptocurrencyFlow;

impl Flow for AnalyzeCryptocurrencyFlow {
    const NAME: &'static str = "analyzeCryptocurrencyFlow";

    type Input = AnalyzeCryptocurrencyInput;
    type Output = AnalyzeCryptocurrencyOutput;

    fn validate(input: &Self::Input) -> Result<()> {
        require_text("Nama mata uang kripto", &input.cryptocurrency_name)
    }

    fn render(input: &Self::Input) -> Result<ModelRequest> {
        let name = input.cryptocurrency_name.trim();
        let prompt = format!(
            r#"Anda adalah seorang analis mata uang kripto AI yang berpengalaman.
Tugas Anda adalah memberikan analisis ringkas mengenai mata uang kripto bernama: {name}.

Analisis Anda harus mencakup (jika informasi tersedia dan relevan):
1. Deskripsi singkat tentang mata uang kripto tersebut dan tujuannya.
2. Sentimen pasar umum saat ini (berdasarkan pengetahuan Anda hingga pembaruan terakhir).
3. Potensi kasus penggunaan atau perkembangan penting terbaru.
4. Beberapa pertimbangan atau risiko umum yang terkait dengannya.

PENTING:
- Selalu berikan respons dalam Bahasa Indonesia yang formal dan jelas.
- Nyatakan dengan jelas bahwa ini BUKAN nasihat keuangan dan pengguna harus melakukan riset sendiri (DYOR) dan/atau berkonsultasi dengan penasihat keuangan profesional sebelum membuat keputusan investasi.
- Jaga agar analisis tetap objektif dan informatif.
- Jika Anda tidak memiliki informasi yang cukup tentang {name}, sebutkan hal tersebut.

Kembalikan HANYA JSON valid dengan format: {{"analysis": "<analisis Anda dalam Bahasa Indonesia>"}}"#
        );
        Ok(ModelRequest::text(prompt))
    }
}

pub async fn analyze_cryptocurrency(
    model: &dyn LanguageModel,
    input: &AnalyzeCryptocurrencyInput,
) -> Result<AnalyzeCryptocurrencyOutput> {
    run_flow::<AnalyzeCryptocurrencyFlow>(model, input).await
}
