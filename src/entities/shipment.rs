use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::lifecycle::ShipmentStatus;

/// Freight service offered on the quote and booking forms.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    #[sea_orm(string_value = "air")]
    Air,
    #[sea_orm(string_value = "sea")]
    Sea,
    #[sea_orm(string_value = "road")]
    Road,
    #[sea_orm(string_value = "express")]
    Express,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::Air => write!(f, "Air Freight"),
            ServiceType::Sea => write!(f, "Sea Freight"),
            ServiceType::Road => write!(f, "Road Transportation"),
            ServiceType::Express => write!(f, "Express Delivery"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "air" => Ok(Self::Air),
            "sea" => Ok(Self::Sea),
            "road" => Ok(Self::Road),
            "express" => Ok(Self::Express),
            other => Err(format!("unsupported service type '{}'", other)),
        }
    }
}

/// Shipment entity model.
///
/// `tracking_number` is assigned once at creation and never rewritten;
/// `status` is a cached projection of the newest tracking update, written
/// only by the creation path and the tracking-update transaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "shipments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    #[validate(length(min = 3, max = 32))]
    pub tracking_number: String,

    #[validate(length(min = 1, max = 255, message = "Sender name is required"))]
    pub sender_name: String,

    #[validate(length(min = 1, max = 500, message = "Sender address is required"))]
    pub sender_address: String,

    pub sender_phone: Option<String>,

    #[validate(email(message = "Invalid sender email"))]
    pub sender_email: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Recipient name is required"))]
    pub recipient_name: String,

    #[validate(length(min = 1, max = 500, message = "Recipient address is required"))]
    pub recipient_address: String,

    pub recipient_phone: Option<String>,

    #[validate(email(message = "Invalid recipient email"))]
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tracking_update::Entity")]
    TrackingUpdates,
}

impl Related<super::tracking_update::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackingUpdates.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        if insert {
            active_model.id = Set(Uuid::new_v4());
        }
        Ok(active_model)
    }
}
