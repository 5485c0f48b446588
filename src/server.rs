//! Inbound HTTP boundary for campaign launches

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::facebook::AdPlatform;
use crate::launch::{launch_campaign, LaunchError};
use crate::models::{LaunchCampaignRequest, LaunchCampaignResponse};

/// Shared application state
pub struct AppState {
    pub platform: Arc<dyn AdPlatform>,
}

impl AppState {
    pub fn new(platform: Arc<dyn AdPlatform>) -> Self {
        Self { platform }
    }
}

impl LaunchError {
    pub fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for LaunchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = LaunchCampaignResponse::failure(
            self.to_string(),
            self.fbtrace_id().map(str::to_string),
        );

        (status, Json(body)).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/meta/launch",
            post(launch_handler).fallback(method_not_allowed_handler),
        )
        .with_state(shared_state)
        .layer(TraceLayer::new_for_http())
}

pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "marketing-campaign-launcher"
    }))
}

pub async fn launch_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LaunchCampaignRequest>, JsonRejection>,
) -> Result<Json<LaunchCampaignResponse>, LaunchError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected launch body: {}", rejection.body_text());
        LaunchError::InvalidBody(rejection.body_text())
    })?;

    match launch_campaign(state.platform.as_ref(), &request).await {
        Ok(launched) => {
            info!("Launched campaign {}", launched.campaign_id);
            Ok(Json(launched.into()))
        }
        Err(err) => {
            match &err {
                LaunchError::StepFailed { step, created, .. } => error!(
                    %step,
                    ?created,
                    fbtrace_id = err.fbtrace_id().unwrap_or_default(),
                    "Meta launch error: {}",
                    err
                ),
                _ => warn!("Launch request rejected: {}", err),
            }
            Err(err)
        }
    }
}

async fn method_not_allowed_handler() -> (StatusCode, Json<LaunchCampaignResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(LaunchCampaignResponse::failure("Method Not Allowed", None)),
    )
}
