//! HTTP/JSON API for the math engine.
//!
//! | Method | Path | Body | Success |
//! |--------|------|------|---------|
//! | GET | `/health` | | `{status, version}` |
//! | POST | `/api/v1/math/task` | `MathTask` | `{ok: true, result: MathTaskResult}` |
//! | POST | `/api/v1/math/parse` | `{text}` | `{ok: true, result: ParseOutcome}` |
//!
//! Failures use [`HttpErrorResponse`] with the status from [`ErrorCode::http_status`].
//! A body that is not JSON, or names an unknown task type, is
//! `INVALID_REQUEST`; a well-formed body with a missing or mistyped field is
//! `INVALID_INPUT` naming that field.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::error::Category;
use serde_path_to_error::Segment;

use crate::error::{ErrorCode, HttpErrorResponse, MathError};
use crate::parse::ParseOutcome;
use crate::task::{MathEngine, MathTask, MathTaskResult};

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Engine shared by every handler.
    pub engine: Arc<MathEngine>,
    /// Version reported by `/health`.
    pub version: String,
}

impl AppState {
    /// State for `engine`, reporting this crate's version.
    #[must_use]
    pub fn new(engine: MathEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Create the Axum router with all endpoints.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/math/task", post(run_task))
        .route("/api/v1/math/parse", post(parse_question))
        .with_state(state)
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: String,
    /// Crate version.
    pub version: String,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version,
    })
}

/// Successful task response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Always `true`.
    pub ok: bool,
    /// Tagged result.
    pub result: MathTaskResult,
}

async fn run_task(
    State(state): State<AppState>,
    InputJson(task): InputJson<MathTask>,
) -> Result<Json<TaskResponse>, ApiError> {
    tracing::info!(task = task.kind(), "Running math task");

    let result = state.engine.run(&task)?;
    Ok(Json(TaskResponse { ok: true, result }))
}

/// Free-text question.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParseRequest {
    /// Question text.
    pub text: String,
}

/// Successful parse response.
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    /// Always `true`, including for a declined question.
    pub ok: bool,
    /// Answer or decline.
    pub result: ParseOutcome,
}

async fn parse_question(
    State(state): State<AppState>,
    InputJson(request): InputJson<ParseRequest>,
) -> Result<Json<ParseResponse>, ApiError> {
    tracing::info!(length = request.text.len(), "Parsing math question");

    let result = state.engine.parse_question(&request.text)?;
    Ok(Json(ParseResponse { ok: true, result }))
}

/// JSON request body that reports which field failed to decode.
#[derive(Debug)]
pub struct InputJson<T>(pub T);

impl<S, T> FromRequest<S> for InputJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        decode_body(&bytes).map(Self)
    }
}

/// Decode a request body, tracking the path of the value being read.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value: T =
        serde_path_to_error::deserialize(&mut deserializer).map_err(ApiError::from_decode_error)?;
    deserializer
        .end()
        .map_err(|error| ApiError::bad_request(error.to_string()))?;
    Ok(value)
}

/// Field a data error is about: the name serde reports as missing, else the
/// innermost object key on the path. Unknown variants name no field.
fn offending_field(error: &serde_path_to_error::Error<serde_json::Error>) -> Option<String> {
    let message = error.inner().to_string();
    if message.starts_with("unknown variant") {
        return None;
    }
    if let Some(rest) = message.strip_prefix("missing field `") {
        return rest.split_once('`').map(|(field, _)| field.to_string());
    }
    error.path().iter().rev().find_map(|segment| match segment {
        Segment::Map { key } => Some(key.clone()),
        _ => None,
    })
}

/// API error wrapper for HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    body: HttpErrorResponse,
}

impl ApiError {
    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        let code = ErrorCode::InvalidRequest;
        Self {
            code,
            body: HttpErrorResponse::new(code, message, Vec::new()),
        }
    }

    /// Create an invalid-input error naming `field`.
    #[must_use]
    pub fn invalid_input(field: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let code = ErrorCode::InvalidInput;
        let field = field.into();
        Self {
            code,
            body: HttpErrorResponse::new(
                code,
                format!("invalid input for '{field}': {reason}"),
                vec![("field".to_string(), field)],
            ),
        }
    }

    fn from_decode_error(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        if error.inner().classify() != Category::Data {
            return Self::bad_request(error.inner().to_string());
        }
        match offending_field(&error) {
            Some(field) => Self::invalid_input(field, error.inner()),
            None => Self::bad_request(error.inner().to_string()),
        }
    }

    /// Error code carried by this response.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }
}

impl From<MathError> for ApiError {
    fn from(error: MathError) -> Self {
        tracing::debug!(code = %error.code(), error = %error, "Request failed");
        Self {
            code: error.code(),
            body: error.to_http_response(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::task::EngineLimits;

    fn make_app() -> Router {
        create_router(AppState::new(MathEngine::default()))
    }

    async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = make_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_position_size_task() {
        let body = json!({
            "type": "position-size",
            "input": {
                "accountSize": 100000,
                "riskPercent": 1,
                "stopLossDistance": 50,
                "valuePerUnit": 10
            }
        });

        let (status, json) = post_json(make_app(), "/api/v1/math/task", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert_eq!(json["result"]["type"], "position-size");
        assert_eq!(json["result"]["output"]["riskAmount"], 1000.0);
        assert_eq!(json["result"]["output"]["positionSize"], 2.0);
    }

    #[tokio::test]
    async fn test_invalid_input_is_unprocessable() {
        let body = json!({
            "type": "position-size",
            "input": {
                "accountSize": 0,
                "riskPercent": 1,
                "stopLossDistance": 50,
                "valuePerUnit": 10
            }
        });

        let (status, json) = post_json(make_app(), "/api/v1/math/task", body.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["ok"], false);
        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(json["details"]["field"], "accountSize");
    }

    #[tokio::test]
    async fn test_missing_field_is_invalid_input() {
        let body = json!({
            "type": "position-size",
            "input": {
                "accountSize": 100000,
                "riskPercent": 1,
                "stopLossDistance": 50
            }
        });

        let (status, json) = post_json(make_app(), "/api/v1/math/task", body.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(json["details"]["field"], "valuePerUnit");
    }

    #[tokio::test]
    async fn test_missing_field_before_tag_is_invalid_input() {
        let body = r#"{"input": {"accountSize": 100000, "riskPercent": 1, "valuePerUnit": 10}, "type": "position-size"}"#;

        let (status, json) = post_json(make_app(), "/api/v1/math/task", body.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["details"]["field"], "stopLossDistance");
    }

    #[tokio::test]
    async fn test_negative_trades_per_day_is_invalid_input() {
        let body = json!({
            "type": "prop-firm-plan",
            "input": {
                "config": {
                    "accountSize": 100000,
                    "currency": "USD",
                    "targetReturnPct": 10,
                    "maxDailyDrawdownPct": 5,
                    "maxTotalDrawdownPct": 10
                },
                "riskPerTradePct": 1,
                "expectedRR": 2,
                "expectedWinratePct": 40,
                "maxTradesPerDay": -1
            }
        });

        let (status, json) = post_json(make_app(), "/api/v1/math/task", body.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(json["details"]["field"], "maxTradesPerDay");
    }

    #[tokio::test]
    async fn test_negative_trade_count_is_invalid_input() {
        let body = json!({
            "type": "compounding-plan",
            "input": {
                "startingBalance": 10000,
                "riskPerTradePct": 1,
                "expectedRR": 2,
                "expectedWinratePct": 45,
                "numberOfTrades": -3
            }
        });

        let (status, json) = post_json(make_app(), "/api/v1/math/task", body.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(json["details"]["field"], "numberOfTrades");
    }

    #[tokio::test]
    async fn test_mistyped_field_is_invalid_input() {
        let body = r#"{"type": "position-size", "input": {"accountSize": "lots", "riskPercent": 1, "stopLossDistance": 50, "valuePerUnit": 10}}"#;

        let (status, json) = post_json(make_app(), "/api/v1/math/task", body.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["details"]["field"], "accountSize");
    }

    #[tokio::test]
    async fn test_missing_question_text_is_invalid_input() {
        let (status, json) =
            post_json(make_app(), "/api/v1/math/parse", json!({}).to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["details"]["field"], "text");
    }

    #[tokio::test]
    async fn test_unknown_task_type_is_bad_request() {
        let body = json!({ "type": "martingale", "input": {} });

        let (status, json) = post_json(make_app(), "/api/v1/math/task", body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_trailing_garbage_is_bad_request() {
        let body = format!("{} extra", json!({ "text": "15% of 200" }));

        let (status, json) = post_json(make_app(), "/api/v1/math/parse", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (status, json) =
            post_json(make_app(), "/api/v1/math/task", "{not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["ok"], false);
        assert_eq!(json["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_compounding_cap_from_limits() {
        let app = create_router(AppState::new(MathEngine::new(EngineLimits {
            max_compounding_trades: 2,
            ..EngineLimits::default()
        })));
        let body = json!({
            "type": "compounding-plan",
            "input": {
                "startingBalance": 10000,
                "riskPerTradePct": 1,
                "expectedRR": 2,
                "expectedWinratePct": 45,
                "numberOfTrades": 3
            }
        });

        let (status, json) = post_json(app, "/api/v1/math/task", body.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["details"]["field"], "numberOfTrades");
    }

    #[tokio::test]
    async fn test_parse_answered() {
        let body = json!({ "text": "What is 15% of 200?" });

        let (status, json) = post_json(make_app(), "/api/v1/math/parse", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"]["status"], "answered");
        assert_eq!(json["result"]["value"], "30");
        assert_eq!(json["result"]["display"], "15% of 200 = 30");
    }

    #[tokio::test]
    async fn test_parse_declined_is_ok() {
        let body = json!({ "text": "should I buy gold today?" });

        let (status, json) = post_json(make_app(), "/api/v1/math/parse", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert_eq!(json["result"]["status"], "declined");
    }

    #[tokio::test]
    async fn test_parse_division_by_zero() {
        let body = json!({ "text": "what percent is 5 of 0" });

        let (status, json) = post_json(make_app(), "/api/v1/math/parse", body.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "DIVISION_BY_ZERO");
        assert_eq!(json["details"]["context"], "what_percent_is");
    }

    #[tokio::test]
    async fn test_parse_unsafe_expression_is_not_executed() {
        let body = json!({ "text": "calculate 2+alert(1)" });

        let (status, json) = post_json(make_app(), "/api/v1/math/parse", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"]["status"], "declined");
    }

    #[test]
    fn test_bad_request_code() {
        assert_eq!(ApiError::bad_request("nope").code(), ErrorCode::InvalidRequest);
    }
}
