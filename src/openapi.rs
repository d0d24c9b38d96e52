use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SmartShip API",
        version = "0.1.0",
        description = r#"
# SmartShip Logistics API

Backend for the SmartShip logistics site: public shipment tracking and
the admin shipment dashboard.

## Tracking

Anyone can look up a shipment by its tracking number (`SS` followed by
nine digits) via `GET /api/v1/track/{tracking_number}`. The response
bundles the shipment, its full update history (newest first), and a
derived timeline: the six canonical delivery steps classified as
completed / active / pending, a progress fraction, and the current
location taken from the newest update.

## Admin

The admin endpoints manage shipments and record tracking updates.
Recording an update also moves the shipment's cached status in the same
transaction, so the two never diverge.

## Errors

Errors use a consistent JSON shape with appropriate HTTP status codes:

```json
{
  "error": "Not Found",
  "message": "Shipment with tracking number SS000000000 not found",
  "timestamp": "2024-03-01T00:00:00Z"
}
```
        "#,
        contact(
            name = "SmartShip Support",
            email = "support@smartship.example",
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "tracking", description = "Public shipment tracking"),
        (name = "shipments", description = "Shipment management"),
        (name = "admin", description = "Admin login and dashboard statistics")
    ),
    paths(
        crate::handlers::tracking::track_by_number,
        crate::handlers::shipments::list_shipments,
        crate::handlers::shipments::get_shipment,
        crate::handlers::shipments::create_shipment,
        crate::handlers::shipments::delete_shipment,
        crate::handlers::shipments::get_tracking_history,
        crate::handlers::shipments::create_tracking_update,
        crate::handlers::admin::login,
        crate::handlers::admin::stats,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::PaginatedResponse<serde_json::Value>,

            crate::lifecycle::ShipmentStatus,
            crate::lifecycle::StepState,
            crate::lifecycle::TimelineStep,
            crate::lifecycle::Timeline,

            crate::entities::shipment::ServiceType,

            crate::handlers::shipments::ShipmentSummary,
            crate::handlers::shipments::TrackingUpdateView,
            crate::handlers::shipments::CreateShipmentRequest,
            crate::handlers::shipments::CreateTrackingUpdateRequest,
            crate::handlers::tracking::TrackResponse,
            crate::handlers::admin::LoginRequest,
            crate::services::auth::AdminSession,
            crate::services::shipments::DashboardStats,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("SmartShip API"));
        assert!(json.contains("/api/v1/track/{tracking_number}"));
        assert!(json.contains("/api/v1/shipments"));
    }
}
