//! REST API server for KeuanganKu
//!
//! Every route except login and health requires a stored session.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::AuthService;
use crate::dashboard::{self, Month};
use crate::entries::{export_csv, CsvOptions, EntryStore, ExportLanguage, EXPORT_FILE_NAME};
use crate::error::KeuanganError;
use crate::flows::{
    self, AnalyzeCryptocurrencyInput, AskFinancialQuestionInput, FinancialAgentChatInput,
    FinancialDataInput, OcrReceiptInput,
};
use crate::gemini::LanguageModel;
use crate::market::{self, PriceSource};
use crate::models::{EntryDraft, FinancialTipsOutput, OcrData};
use crate::Result;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipsRequest {
    #[serde(default)]
    pub user_question: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Tips to ask about; defaults to the last tips generated in this session
    #[serde(default)]
    pub tips: Option<FinancialTipsOutput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub lang: Option<ExportLanguage>,
    #[serde(default)]
    pub bom: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    pub ocr: OcrData,
    /// Pre-filled expense entry; absent when the receipt date is unusable
    pub entry_draft: Option<EntryDraft>,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

type ApiResult = (StatusCode, Json<ApiResponse>);

fn respond<T: Serialize>(result: Result<T>) -> ApiResult {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                warn!("Request failed: {}", e);
            }
            (status, Json(ApiResponse::error(e.to_string())))
        }
    }
}

/// Body and query rejections are reported through the envelope as validation errors
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| KeuanganError::Validation(rejection.body_text()))
}

fn query_params<T>(query: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| KeuanganError::Validation(rejection.body_text()))
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<AuthService>,
    pub entries: Arc<dyn EntryStore>,
    pub model: Arc<dyn LanguageModel>,
    pub prices: Arc<dyn PriceSource>,
    last_tips: Arc<RwLock<Option<FinancialTipsOutput>>>,
}

impl ApiState {
    pub fn new(
        auth: Arc<AuthService>,
        entries: Arc<dyn EntryStore>,
        model: Arc<dyn LanguageModel>,
        prices: Arc<dyn PriceSource>,
    ) -> Self {
        Self {
            auth,
            entries,
            model,
            prices,
            last_tips: Arc::new(RwLock::new(None)),
        }
    }
}

/// =============================
/// Health & Auth
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn login(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult {
    let result = async {
        let req = json_body(payload)?;
        state.auth.login(&req.email, &req.password).await
    }
    .await;
    respond(result)
}

async fn logout(State(state): State<ApiState>) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        state.auth.logout().await?;
        *state.last_tips.write().await = None;
        Ok::<_, KeuanganError>(serde_json::json!({ "loggedOut": true }))
    }
    .await;
    respond(result)
}

async fn me(State(state): State<ApiState>) -> ApiResult {
    respond(state.auth.require_user().await)
}

/// =============================
/// Entries
/// =============================

async fn list_entries(State(state): State<ApiState>) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        state.entries.list().await
    }
    .await;
    respond(result)
}

async fn get_entry(State(state): State<ApiState>, Path(id): Path<String>) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        state
            .entries
            .get(&id)
            .await?
            .ok_or(KeuanganError::EntryNotFound(id))
    }
    .await;
    respond(result)
}

async fn add_entry(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<EntryDraft>, JsonRejection>,
) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        let draft = json_body(payload)?;
        state.entries.add(draft).await
    }
    .await;
    respond(result)
}

async fn update_entry(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<EntryDraft>, JsonRejection>,
) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        let draft = json_body(payload)?;
        state.entries.update(&id, draft).await
    }
    .await;
    respond(result)
}

async fn delete_entry(State(state): State<ApiState>, Path(id): Path<String>) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        state.entries.delete(&id).await
    }
    .await;
    respond(result)
}

async fn export_entries(
    State(state): State<ApiState>,
    query: std::result::Result<Query<ExportQuery>, QueryRejection>,
) -> Response {
    let result = async {
        state.auth.require_user().await?;
        let query = query_params(query)?;
        let entries = state.entries.list().await?;
        let options = CsvOptions {
            language: query.lang.unwrap_or_default(),
            byte_order_mark: query.bom.unwrap_or(false),
        };
        let bytes = export_csv(&entries, options)?;
        info!(rows = entries.len(), "Exported entries to CSV");
        Ok::<_, KeuanganError>(bytes)
    }
    .await;

    match result {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => respond::<()>(Err(e)).into_response(),
    }
}

async fn dashboard_summary(
    State(state): State<ApiState>,
    query: std::result::Result<Query<DashboardQuery>, QueryRejection>,
) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        let query = query_params(query)?;
        let month = query.month.as_deref().map(Month::parse).transpose()?;
        let entries = state.entries.list().await?;
        Ok::<_, KeuanganError>(dashboard::summarize(&entries, month))
    }
    .await;
    respond(result)
}

/// =============================
/// AI Flows
/// =============================

async fn receipt_ocr(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<OcrReceiptInput>, JsonRejection>,
) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        let input = json_body(payload)?;
        let ocr = flows::ocr_receipt(state.model.as_ref(), &input).await?;
        let entry_draft = flows::entry_draft_from_ocr(&ocr).ok();
        Ok::<_, KeuanganError>(OcrResponse { ocr, entry_draft })
    }
    .await;
    respond(result)
}

async fn financial_tips(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<TipsRequest>, JsonRejection>,
) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        let req = json_body(payload)?;
        let entries = state.entries.list().await?;
        let input = FinancialDataInput::from_entries(&entries, req.user_question);
        let tips = flows::get_personalized_financial_tips(state.model.as_ref(), &input).await?;
        *state.last_tips.write().await = Some(tips.clone());
        Ok::<_, KeuanganError>(tips)
    }
    .await;
    respond(result)
}

async fn ask_question(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<AskRequest>, JsonRejection>,
) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        let req = json_body(payload)?;
        let tips = match req.tips {
            Some(tips) => tips,
            None => state.last_tips.read().await.clone().ok_or_else(|| {
                KeuanganError::Validation("Please generate tips first.".to_string())
            })?,
        };
        let input = AskFinancialQuestionInput::from_tips(req.question, &tips);
        flows::ask_financial_question(state.model.as_ref(), &input).await
    }
    .await;
    respond(result)
}

async fn chat(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<FinancialAgentChatInput>, JsonRejection>,
) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        let input = json_body(payload)?;
        flows::chat_with_financial_agent(state.model.as_ref(), &input).await
    }
    .await;
    respond(result)
}

/// =============================
/// Crypto
/// =============================

async fn crypto_list(State(state): State<ApiState>) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        Ok::<_, KeuanganError>(market::crypto_catalog())
    }
    .await;
    respond(result)
}

async fn crypto_chart(State(state): State<ApiState>, Path(symbol): Path<String>) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        let symbol = market::normalize_symbol(&symbol)?;
        let points = state.prices.chart(&symbol).await?;
        Ok::<_, KeuanganError>(serde_json::json!({ "symbol": symbol, "points": points }))
    }
    .await;
    respond(result)
}

async fn crypto_analyze(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<AnalyzeCryptocurrencyInput>, JsonRejection>,
) -> ApiResult {
    let result = async {
        state.auth.require_user().await?;
        let input = json_body(payload)?;
        flows::analyze_cryptocurrency(state.model.as_ref(), &input).await
    }
    .await;
    respond(result)
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/entries", get(list_entries).post(add_entry))
        .route("/api/entries/export", get(export_entries))
        .route(
            "/api/entries/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .route("/api/dashboard", get(dashboard_summary))
        .route("/api/receipts/ocr", post(receipt_ocr))
        .route("/api/tips", post(financial_tips))
        .route("/api/tips/ask", post(ask_question))
        .route("/api/chat", post(chat))
        .route("/api/crypto", get(crypto_list))
        .route("/api/crypto/:symbol/chart", get(crypto_chart))
        .route("/api/crypto/analyze", post(crypto_analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
