use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::shipment::{self, ServiceType};
use crate::entities::tracking_update;
use crate::errors::ServiceError;
use crate::lifecycle::{ShipmentStatus, Timeline, TrackingEvent};

/// Tracking numbers carry the SmartShip prefix followed by digits.
const TRACKING_PREFIX: &str = "SS";
const TRACKING_DIGITS: u32 = 9;
const TRACKING_GENERATION_ATTEMPTS: u32 = 5;

/// Input for creating a shipment. Status is not accepted here: every
/// shipment starts as `pending` and advances only through tracking updates.
#[derive(Debug, Clone)]
pub struct NewShipment {
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
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub cost: Option<Decimal>,
}

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_shipments: u64,
    pub pending_shipments: u64,
    pub in_transit_shipments: u64,
    pub delivered_shipments: u64,
}

/// Composite view served to the public tracking page.
#[derive(Debug, Clone)]
pub struct TrackingView {
    pub shipment: shipment::Model,
    pub updates: Vec<tracking_update::Model>,
    pub timeline: Timeline,
}

/// Service for managing shipments and their tracking history.
#[derive(Clone)]
pub struct ShipmentService {
    db_pool: Arc<DbPool>,
}

impl ShipmentService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a new shipment with a freshly generated tracking number and
    /// `pending` status.
    #[instrument(skip(self, input))]
    pub async fn create_shipment(
        &self,
        input: NewShipment,
    ) -> Result<shipment::Model, ServiceError> {
        validate_required("sender_name", &input.sender_name)?;
        validate_required("sender_address", &input.sender_address)?;
        validate_required("recipient_name", &input.recipient_name)?;
        validate_required("recipient_address", &input.recipient_address)?;

        let tracking_number = self.generate_tracking_number().await?;
        let now = Utc::now();

        let active = shipment::ActiveModel {
            tracking_number: Set(tracking_number.clone()),
            sender_name: Set(input.sender_name),
            sender_address: Set(input.sender_address),
            sender_phone: Set(input.sender_phone),
            sender_email: Set(input.sender_email),
            recipient_name: Set(input.recipient_name),
            recipient_address: Set(input.recipient_address),
            recipient_phone: Set(input.recipient_phone),
            recipient_email: Set(input.recipient_email),
            service_type: Set(input.service_type),
            package_type: Set(input.package_type),
            weight: Set(input.weight),
            dimensions: Set(input.dimensions),
            description: Set(input.description),
            status: Set(ShipmentStatus::Pending),
            estimated_delivery: Set(input.estimated_delivery),
            actual_delivery: Set(None),
            cost: Set(input.cost),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = active.insert(&*self.db_pool).await?;
        info!(tracking_number = %tracking_number, "Created shipment");
        Ok(created)
    }

    /// Finds a shipment by tracking number.
    #[instrument(skip(self))]
    pub async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<shipment::Model>, ServiceError> {
        let found = shipment::Entity::find()
            .filter(shipment::Column::TrackingNumber.eq(tracking_number))
            .one(&*self.db_pool)
            .await?;
        Ok(found)
    }

    /// Gets a shipment by ID.
    #[instrument(skip(self))]
    pub async fn get_shipment(&self, id: Uuid) -> Result<Option<shipment::Model>, ServiceError> {
        let found = shipment::Entity::find_by_id(id).one(&*self.db_pool).await?;
        Ok(found)
    }

    /// Lists shipments with pagination and an optional status filter.
    /// An unrecognized status filter yields an empty result set.
    #[instrument(skip(self))]
    pub async fn list_shipments(
        &self,
        page: u64,
        limit: u64,
        status: Option<String>,
    ) -> Result<(Vec<shipment::Model>, u64), ServiceError> {
        let mut query = shipment::Entity::find();

        if let Some(status_filter) = status {
            match status_filter.parse::<ShipmentStatus>() {
                Ok(parsed) => query = query.filter(shipment::Column::Status.eq(parsed)),
                Err(_) => return Ok((vec![], 0)),
            }
        }

        let paginator = query
            .order_by_desc(shipment::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);

        let total = paginator.num_items().await?;
        let shipments = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((shipments, total))
    }

    /// Returns a shipment's tracking history, newest first.
    #[instrument(skip(self))]
    pub async fn get_tracking_updates(
        &self,
        shipment_id: Uuid,
    ) -> Result<Vec<tracking_update::Model>, ServiceError> {
        self.get_shipment(shipment_id).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Shipment {} not found", shipment_id))
        })?;

        let updates = tracking_update::Entity::find()
            .filter(tracking_update::Column::ShipmentId.eq(shipment_id))
            .order_by_desc(tracking_update::Column::Timestamp)
            .all(&*self.db_pool)
            .await?;
        Ok(updates)
    }

    /// Records a tracking update and advances the shipment's cached status
    /// in the same transaction, so a lookup can never observe the two out
    /// of sync. A `delivered` update also stamps `actual_delivery`.
    #[instrument(skip(self, description))]
    pub async fn record_tracking_update(
        &self,
        shipment_id: Uuid,
        status: ShipmentStatus,
        location: &str,
        description: Option<String>,
        updated_by: Option<Uuid>,
    ) -> Result<tracking_update::Model, ServiceError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(ServiceError::ValidationError(
                "Location is required".to_string(),
            ));
        }

        let txn = self.db_pool.begin().await?;

        let existing = shipment::Entity::find_by_id(shipment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Shipment {} not found", shipment_id)))?;

        let now = Utc::now();
        let update = tracking_update::ActiveModel {
            shipment_id: Set(shipment_id),
            status: Set(status),
            location: Set(location.to_string()),
            description: Set(description.filter(|d| !d.trim().is_empty())),
            timestamp: Set(now),
            updated_by: Set(updated_by),
            ..Default::default()
        };
        let inserted = update.insert(&txn).await?;

        let mut active: shipment::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(now);
        if status == ShipmentStatus::Delivered {
            active.actual_delivery = Set(Some(now));
        }
        active.update(&txn).await?;

        txn.commit().await?;

        info!(
            shipment_id = %shipment_id,
            status = %status.as_str(),
            location = %location,
            "Recorded tracking update"
        );
        Ok(inserted)
    }

    /// Deletes a shipment together with its tracking history.
    #[instrument(skip(self))]
    pub async fn delete_shipment(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;

        // Explicit cleanup covers engines that are run without foreign key
        // enforcement; with it enabled the FK cascade does the same thing.
        tracking_update::Entity::delete_many()
            .filter(tracking_update::Column::ShipmentId.eq(id))
            .exec(&txn)
            .await?;

        let result = shipment::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Shipment {} not found", id)));
        }

        txn.commit().await?;
        info!(shipment_id = %id, "Deleted shipment");
        Ok(())
    }

    /// Counts shown on the admin dashboard.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        let db = &*self.db_pool;

        let total_shipments = shipment::Entity::find().count(db).await?;
        let pending_shipments = shipment::Entity::find()
            .filter(shipment::Column::Status.eq(ShipmentStatus::Pending))
            .count(db)
            .await?;
        let in_transit_shipments = shipment::Entity::find()
            .filter(shipment::Column::Status.eq(ShipmentStatus::InTransit))
            .count(db)
            .await?;
        let delivered_shipments = shipment::Entity::find()
            .filter(shipment::Column::Status.eq(ShipmentStatus::Delivered))
            .count(db)
            .await?;

        Ok(DashboardStats {
            total_shipments,
            pending_shipments,
            in_transit_shipments,
            delivered_shipments,
        })
    }

    /// Resolves a tracking number to the composite view the tracking page
    /// renders: the shipment, its history newest first, and the derived
    /// timeline.
    #[instrument(skip(self))]
    pub async fn track(&self, tracking_number: &str) -> Result<TrackingView, ServiceError> {
        let shipment = self
            .find_by_tracking_number(tracking_number)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Tracking number {} not found", tracking_number))
            })?;

        let updates = tracking_update::Entity::find()
            .filter(tracking_update::Column::ShipmentId.eq(shipment.id))
            .order_by_desc(tracking_update::Column::Timestamp)
            .all(&*self.db_pool)
            .await?;

        let events: Vec<TrackingEvent> = updates
            .iter()
            .map(|u| TrackingEvent {
                status: u.status,
                location: u.location.clone(),
                timestamp: u.timestamp,
            })
            .collect();
        let timeline = Timeline::derive(shipment.status, &events);

        Ok(TrackingView {
            shipment,
            updates,
            timeline,
        })
    }

    /// Generates a unique `SS`-prefixed tracking number. Collisions are
    /// retried a few times; the unique index backstops the race with a
    /// concurrent insert.
    async fn generate_tracking_number(&self) -> Result<String, ServiceError> {
        for _ in 0..TRACKING_GENERATION_ATTEMPTS {
            let digits: u32 = rand::thread_rng().gen_range(0..10u32.pow(TRACKING_DIGITS));
            let candidate = format!(
                "{}{:0width$}",
                TRACKING_PREFIX,
                digits,
                width = TRACKING_DIGITS as usize
            );
            if self.find_by_tracking_number(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(ServiceError::InternalError(
            "Unable to allocate a unique tracking number".to_string(),
        ))
    }
}

fn validate_required(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::ValidationError(format!(
            "Field '{}' is required",
            field
        )));
    }
    Ok(())
}
