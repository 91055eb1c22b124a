//! REST API for the ESG orchestrator
//!
//! Thin transport over `Orchestrator`: request decoding, status mapping and
//! role-based masking. No scoring logic lives here.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{ErrorKind, OrchestrationError};
use crate::models::{AnalysisRequest, PortfolioRequest, UserRole};
use crate::orchestrator::Orchestrator;

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
    pub code: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            code: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(err: &OrchestrationError) -> Self {
        Self::failure(err.to_string(), err.code())
    }

    pub fn failure(message: String, code: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            code: Some(code.to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

type ApiResult = (StatusCode, Json<ApiResponse>);

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(err: OrchestrationError) -> ApiResult {
    let status = status_for(err.kind());
    warn!(code = err.code(), status = status.as_u16(), error = %err, "Request failed");
    (status, Json(ApiResponse::error(&err)))
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
}

/// =============================
/// Masking
/// =============================

/// Stars over the first half, rest kept.
pub fn mask_details(details: &str) -> String {
    let chars: Vec<char> = details.chars().collect();
    let hidden = chars.len() / 2;
    let mut masked = "*".repeat(hidden);
    masked.extend(&chars[hidden..]);
    masked
}

fn mask_field(object: &mut Value, field: &str) {
    if let Some(slot) = object.get_mut(field) {
        if let Some(raw) = slot.as_str() {
            *slot = Value::String(mask_details(raw));
        }
    }
}

/// Masks audit identifiers for roles without audit access and flags the payload.
fn apply_role_masking(data: &mut Value, role: UserRole) {
    if role.is_privileged() {
        return;
    }

    mask_field(data, "audit_transaction_id");
    if let Some(companies) = data.get_mut("companies").and_then(Value::as_array_mut) {
        for company in companies {
            mask_field(company, "audit_transaction_id");
        }
    }
    mask_field(data, "serialized_analysis");

    if let Some(object) = data.as_object_mut() {
        object.insert("masked_data".to_string(), Value::Bool(true));
    }
}

fn respond<T: Serialize>(payload: T, role: UserRole) -> ApiResult {
    let mut response = ApiResponse::success(payload);
    if let Some(data) = response.data.as_mut() {
        apply_role_masking(data, role);
    }
    (StatusCode::OK, Json(response))
}

/// =============================
/// Handlers
/// =============================

async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "esg-agent-orchestrator",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn analyze(
    State(state): State<ApiState>,
    Json(req): Json<AnalysisRequest>,
) -> ApiResult {
    info!(company = %req.company_name, role = ?req.user_role, "Received analysis request");

    let role = req.user_role;
    match state.orchestrator.analyze(req).await {
        Ok(result) => respond(result, role),
        Err(e) => failure(e),
    }
}

async fn compare_portfolio(
    State(state): State<ApiState>,
    Json(req): Json<PortfolioRequest>,
) -> ApiResult {
    info!(
        companies = req.companies.len(),
        role = ?req.user_role,
        "Received portfolio comparison request"
    );

    let role = req.user_role;
    match state.orchestrator.compare_portfolio(req).await {
        Ok(result) => respond(result, role),
        Err(e) => failure(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub role: Option<String>,
}

async fn verify_audit(
    State(state): State<ApiState>,
    Path(transaction_id): Path<String>,
    Query(query): Query<AuditQuery>,
) -> ApiResult {
    let role = query
        .role
        .and_then(|r| r.parse::<UserRole>().ok())
        .unwrap_or_default();

    let verification = state.orchestrator.verify_audit(&transaction_id).await;
    info!(
        transaction_id = %transaction_id,
        found = verification.found,
        "Audit verification requested"
    );

    if !verification.found {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(
                format!("No audit record for transaction {}", transaction_id),
                "ESG_AUDIT_NOT_FOUND",
            )),
        );
    }

    respond(verification, role)
}

/// =============================
/// Router
/// =============================

pub fn create_router(orchestrator: Arc<Orchestrator>) -> Router {
    let state = ApiState { orchestrator };

    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/api/portfolio/compare", post(compare_portfolio))
        .route("/api/audit/:transaction_id", get(verify_audit))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    orchestrator: Arc<Orchestrator>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(orchestrator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLedger;
    use crate::orchestrator::SystemClock;
    use crate::test_support::MarketFixture;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> Router {
        let acquirer = MarketFixture::default()
            .with_price("SOLARTECHRENEWABLES.NS", 100.0, vec![98.0, 100.0])
            .with_sentiment("SolarTech Renewables", 0.8)
            .with_sentiment("Plain Widgets", 0.5)
            .into_acquirer();
        let orchestrator = Orchestrator::new(acquirer, AuditLedger::new(), Arc::new(SystemClock));
        create_router(Arc::new(orchestrator))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, ApiResponse) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_mask_details() {
        assert_eq!(mask_details("0xabcdef"), "****cdef");
        assert_eq!(mask_details("abc"), "*bc");
        assert_eq!(mask_details(""), "");
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analyze_masks_for_trader() {
        let (status, body) = call(
            router(),
            post_json(
                "/api/analyze",
                serde_json::json!({ "company_name": "SolarTech Renewables" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        let data = body.data.unwrap();
        assert_eq!(data["masked_data"], Value::Bool(true));
        assert!(data["audit_transaction_id"].as_str().unwrap().starts_with("***"));
        assert_eq!(data["trading_signal"]["action"], "BUY");
    }

    #[tokio::test]
    async fn test_analyze_unmasked_for_compliance_and_verifiable() {
        let app = router();
        let (status, body) = call(
            app.clone(),
            post_json(
                "/api/analyze",
                serde_json::json!({
                    "company_name": "SolarTech Renewables",
                    "user_role": "COMPLIANCE"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = body.data.unwrap();
        assert!(data.get("masked_data").is_none());
        let id = data["audit_transaction_id"].as_str().unwrap().to_string();
        assert!(id.starts_with("0x"));

        let request = Request::builder()
            .uri(format!("/api/audit/{}?role=admin", id))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.data.unwrap()["found"], Value::Bool(true));
    }

    #[tokio::test]
    async fn test_unknown_company_is_404() {
        let (status, body) = call(
            router(),
            post_json(
                "/api/analyze",
                serde_json::json!({ "company_name": "Nonexistent Corp 12345" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!body.success);
        assert_eq!(body.code.as_deref(), Some("ESG_NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_portfolio_errors_map_to_statuses() {
        let (status, body) = call(
            router(),
            post_json(
                "/api/portfolio/compare",
                serde_json::json!({ "companies": ["Only One"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code.as_deref(), Some("ESG_INVALID_INPUT"));

        let (status, body) = call(
            router(),
            post_json(
                "/api/portfolio/compare",
                serde_json::json!({ "companies": ["Ghost One", "Ghost Two"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code.as_deref(), Some("ESG_NO_VALID_COMPANIES"));
    }

    #[tokio::test]
    async fn test_portfolio_success_masks_each_company() {
        let (status, body) = call(
            router(),
            post_json(
                "/api/portfolio/compare",
                serde_json::json!({
                    "companies": ["SolarTech Renewables", "Plain Widgets"],
                    "risk_tolerance": 0.4
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = body.data.unwrap();
        let companies = data["companies"].as_array().unwrap();
        assert_eq!(companies.len(), 2);
        for company in companies {
            assert!(company["audit_transaction_id"].as_str().unwrap().starts_with("***"));
        }
        assert_eq!(data["best_esg_company"], "SolarTech Renewables");
    }

    #[tokio::test]
    async fn test_unknown_audit_id_is_404() {
        let request = Request::builder()
            .uri("/api/audit/0xmissing")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(router(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code.as_deref(), Some("ESG_AUDIT_NOT_FOUND"));
    }
}
