use crate::{
    errors::ServiceError,
    handlers::shipments::{ShipmentSummary, TrackingUpdateView},
    lifecycle::Timeline,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Everything the public tracking page needs for one lookup.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackResponse {
    pub shipment: ShipmentSummary,
    /// History, newest first
    pub tracking_updates: Vec<TrackingUpdateView>,
    /// Derived progress view: classified steps, progress fraction,
    /// current location, and the active exception state if any
    pub timeline: Timeline,
}

#[utoipa::path(
    get,
    path = "/api/v1/track/{tracking_number}",
    params(
        ("tracking_number" = String, Path, description = "SmartShip tracking number, e.g. SS000001000")
    ),
    responses(
        (status = 200, description = "Shipment found", body = ApiResponse<TrackResponse>),
        (status = 404, description = "Tracking number not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn track_by_number(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> ApiResult<TrackResponse> {
    let tracking_number = tracking_number.trim().to_string();
    if tracking_number.is_empty() {
        return Err(ServiceError::ValidationError(
            "Tracking number is required".to_string(),
        ));
    }

    let view = state.shipment_service().track(&tracking_number).await?;

    Ok(Json(ApiResponse::success(TrackResponse {
        shipment: ShipmentSummary::from(view.shipment),
        tracking_updates: view
            .updates
            .into_iter()
            .map(TrackingUpdateView::from)
            .collect(),
        timeline: view.timeline,
    })))
}
