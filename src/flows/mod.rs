//! Prompt flows
//!
//! A flow is a typed wrapper around exactly one model call:
//! validate input → render prompt → call model → parse output.
//! Model failures propagate unchanged; there is no retry and no partial
//! result.

pub mod ask_question;
pub mod chatbot;
pub mod crypto_analysis;
pub mod financial_tips;
pub mod ocr_receipt;

pub use ask_question::{ask_financial_question, AskFinancialQuestionInput, AskFinancialQuestionOutput};
pub use chatbot::{chat_with_financial_agent, FinancialAgentChatInput, FinancialAgentChatOutput};
pub use crypto_analysis::{analyze_cryptocurrency, AnalyzeCryptocurrencyInput, AnalyzeCryptocurrencyOutput};
pub use financial_tips::{get_personalized_financial_tips, EntrySnapshot, FinancialDataInput};
pub use ocr_receipt::{entry_draft_from_ocr, ocr_receipt, OcrReceiptInput};

use crate::error::KeuanganError;
use crate::gemini::{LanguageModel, ModelRequest};
use crate::Result;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

/// Static description of one flow
pub trait Flow {
    const NAME: &'static str;

    type Input;
    type Output: DeserializeOwned;

    /// Reject input the schema does not allow
    fn validate(input: &Self::Input) -> Result<()>;

    /// Fill the prompt template
    fn render(input: &Self::Input) -> Result<ModelRequest>;
}

/// Run a flow against a model
pub async fn run_flow<F: Flow>(model: &dyn LanguageModel, input: &F::Input) -> Result<F::Output> {
    F::validate(input)?;
    let request = F::render(input)?;

    info!(flow = F::NAME, model = model.name(), "Running flow");

    let raw = model.generate(&request).await.map_err(|e| {
        warn!(flow = F::NAME, "Model call failed: {}", e);
        e
    })?;

    parse_structured(F::NAME, &raw)
}

/// Parse a model reply into the output type, tolerating a ```json fence
pub(crate) fn parse_structured<T: DeserializeOwned>(flow: &str, raw: &str) -> Result<T> {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(cleaned).map_err(|e| {
        warn!(flow = flow, "Model output rejected: {}", e);
        KeuanganError::MalformedOutput(format!("{}: {} | raw={}", flow, e, raw))
    })
}

/// Fail when a required text field is blank
pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KeuanganError::Validation(format!("{} tidak boleh kosong", field)));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Model that answers every request with a canned reply
    pub struct ScriptedModel {
        reply: std::result::Result<String, String>,
        seen: Mutex<Vec<ModelRequest>>,
    }

    impl ScriptedModel {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<ModelRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: &ModelRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply
                .clone()
                .map_err(KeuanganError::LlmError)
        }
    }
}
