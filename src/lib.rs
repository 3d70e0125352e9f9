//! KeuanganKu
//!
//! A personal-finance backend:
//! - Mock login with a local session record
//! - Income/expense entries with form validation and CSV export
//! - Receipt OCR, budgeting tips, Q&A and a support chatbot via Gemini
//! - Mock crypto price charts with AI analysis
//!
//! FLOW:
//! INPUT → VALIDATE → PROMPT → MODEL → PARSE → RESPONSE

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod entries;
pub mod error;
pub mod flows;
pub mod gemini;
pub mod market;
pub mod models;
pub mod state;

pub use error::{KeuanganError, Result};

// Re-export common types
pub use models::*;
pub use config::AppConfig;
