use crate::{
    entities::shipment::{self, ServiceType},
    entities::tracking_update,
    errors::ServiceError,
    lifecycle::ShipmentStatus,
    services::shipments::NewShipment,
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShipmentListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": "990e8400-e29b-41d4-a716-446655440000",
    "tracking_number": "SS000001000",
    "sender_name": "Acme Exports Ltd",
    "recipient_name": "John Doe",
    "service_type": "air",
    "status": "in_transit",
    "estimated_delivery": "2024-03-12T18:00:00Z",
    "created_at": "2024-03-01T10:30:00Z"
}))]
pub struct ShipmentSummary {
    pub id: Uuid,
    /// SmartShip tracking number (SS prefix + digits)
    pub tracking_number: String,
    pub sender_name: String,
    pub sender_address: String,
    pub sender_phone: Option<String>,
    pub sender_email: Option<String>,
    pub recipient_name: String,
    pub recipient_address: String,
    pub recipient_phone: Option<String>,
    pub recipient_email: Option<String>,
    pub service_type: ServiceType,
    pub package_type: Option<String>,
    pub weight: Option<Decimal>,
    pub dimensions: Option<String>,
    pub description: Option<String>,
    pub status: ShipmentStatus,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub actual_delivery: Option<DateTime<Utc>>,
    pub cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<shipment::Model> for ShipmentSummary {
    fn from(model: shipment::Model) -> Self {
        Self {
            id: model.id,
            tracking_number: model.tracking_number,
            sender_name: model.sender_name,
            sender_address: model.sender_address,
            sender_phone: model.sender_phone,
            sender_email: model.sender_email,
            recipient_name: model.recipient_name,
            recipient_address: model.recipient_address,
            recipient_phone: model.recipient_phone,
            recipient_email: model.recipient_email,
            service_type: model.service_type,
            package_type: model.package_type,
            weight: model.weight,
            dimensions: model.dimensions,
            description: model.description,
            status: model.status,
            estimated_delivery: model.estimated_delivery,
            actual_delivery: model.actual_delivery,
            cost: model.cost,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackingUpdateView {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub status: ShipmentStatus,
    pub location: String,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<tracking_update::Model> for TrackingUpdateView {
    fn from(model: tracking_update::Model) -> Self {
        Self {
            id: model.id,
            shipment_id: model.shipment_id,
            status: model.status,
            location: model.location,
            description: model.description,
            timestamp: model.timestamp,
            updated_by: model.updated_by,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "sender_name": "Acme Exports Ltd",
    "sender_address": "12 Harbour Road, Rotterdam, NL",
    "recipient_name": "John Doe",
    "recipient_address": "123 Main Street, Chicago, IL",
    "service_type": "air",
    "package_type": "package",
    "weight": "12.50"
}))]
pub struct CreateShipmentRequest {
    #[validate(length(min = 1, message = "Sender name is required"))]
    pub sender_name: String,
    #[validate(length(min = 1, message = "Sender address is required"))]
    pub sender_address: String,
    pub sender_phone: Option<String>,
    #[validate(email(message = "Invalid sender email"))]
    pub sender_email: Option<String>,
    #[validate(length(min = 1, message = "Recipient name is required"))]
    pub recipient_name: String,
    #[validate(length(min = 1, message = "Recipient address is required"))]
    pub recipient_address: String,
    pub recipient_phone: Option<String>,
    #[validate(email(message = "Invalid recipient email"))]
    pub recipient_email: Option<String>,
    /// Service type (air, sea, road, express)
    #[validate(length(min = 1))]
    pub service_type: String,
    pub package_type: Option<String>,
    pub weight: Option<Decimal>,
    pub dimensions: Option<String>,
    pub description: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub cost: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "shipment_id": "990e8400-e29b-41d4-a716-446655440000",
    "status": "picked_up",
    "location": "Distribution Center, Chicago",
    "description": "Package collected by courier"
}))]
pub struct CreateTrackingUpdateRequest {
    pub shipment_id: Uuid,
    /// One of the nine recognized shipment statuses
    #[validate(length(min = 1))]
    pub status: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub description: Option<String>,
    pub updated_by: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments",
    params(ShipmentListQuery),
    responses(
        (status = 200, description = "Shipments listed", body = ApiResponse<PaginatedResponse<ShipmentSummary>>)
    ),
    tag = "shipments"
)]
pub async fn list_shipments(
    State(state): State<AppState>,
    Query(query): Query<ShipmentListQuery>,
) -> ApiResult<PaginatedResponse<ShipmentSummary>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (records, total) = state
        .shipment_service()
        .list_shipments(page, limit, query.status)
        .await?;

    let items: Vec<ShipmentSummary> = records.into_iter().map(ShipmentSummary::from).collect();
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/{id}",
    params(
        ("id" = Uuid, Path, description = "Shipment ID")
    ),
    responses(
        (status = 200, description = "Shipment fetched", body = ApiResponse<ShipmentSummary>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ShipmentSummary> {
    match state.shipment_service().get_shipment(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(ShipmentSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!("Shipment {} not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 200, description = "Shipment created", body = ApiResponse<ShipmentSummary>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    Json(payload): Json<CreateShipmentRequest>,
) -> ApiResult<ShipmentSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let service_type: ServiceType = payload
        .service_type
        .parse()
        .map_err(ServiceError::ValidationError)?;

    let input = NewShipment {
        sender_name: payload.sender_name,
        sender_address: payload.sender_address,
        sender_phone: payload.sender_phone,
        sender_email: payload.sender_email,
        recipient_name: payload.recipient_name,
        recipient_address: payload.recipient_address,
        recipient_phone: payload.recipient_phone,
        recipient_email: payload.recipient_email,
        service_type,
        package_type: payload.package_type,
        weight: payload.weight,
        dimensions: payload.dimensions,
        description: payload.description,
        estimated_delivery: payload.estimated_delivery,
        cost: payload.cost,
    };

    let created = state.shipment_service().create_shipment(input).await?;
    Ok(Json(ApiResponse::success(ShipmentSummary::from(created))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/shipments/{id}",
    params(
        ("id" = Uuid, Path, description = "Shipment ID")
    ),
    responses(
        (status = 200, description = "Shipment deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn delete_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.shipment_service().delete_shipment(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/{id}/tracking",
    params(
        ("id" = Uuid, Path, description = "Shipment ID")
    ),
    responses(
        (status = 200, description = "Tracking history, newest first", body = ApiResponse<Vec<TrackingUpdateView>>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn get_tracking_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<TrackingUpdateView>> {
    let updates = state.shipment_service().get_tracking_updates(id).await?;
    let views: Vec<TrackingUpdateView> =
        updates.into_iter().map(TrackingUpdateView::from).collect();
    Ok(Json(ApiResponse::success(views)))
}

#[utoipa::path(
    post,
    path = "/api/v1/tracking-updates",
    request_body = CreateTrackingUpdateRequest,
    responses(
        (status = 200, description = "Tracking update recorded", body = ApiResponse<TrackingUpdateView>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn create_tracking_update(
    State(state): State<AppState>,
    Json(payload): Json<CreateTrackingUpdateRequest>,
) -> ApiResult<TrackingUpdateView> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let status: ShipmentStatus = payload.status.parse()?;

    let recorded = state
        .shipment_service()
        .record_tracking_update(
            payload.shipment_id,
            status,
            &payload.location,
            payload.description,
            payload.updated_by,
        )
        .await?;

    Ok(Json(ApiResponse::success(TrackingUpdateView::from(
        recorded,
    ))))
}
