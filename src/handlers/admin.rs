use crate::{
    errors::ServiceError,
    services::auth::AdminSession,
    services::shipments::DashboardStats,
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, response::Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AdminSession>),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<AdminSession> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let session = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;
    Ok(Json(ApiResponse::success(session)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = ApiResponse<DashboardStats>)
    ),
    tag = "admin"
)]
pub async fn stats(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    let stats = state.shipment_service().dashboard_stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}
