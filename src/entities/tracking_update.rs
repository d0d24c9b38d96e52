use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::lifecycle::ShipmentStatus;

/// Tracking update entity model. One row per recorded event; ordered by
/// `timestamp` descending the rows form the shipment's history, and the
/// newest row's `location` is the shipment's current location.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "tracking_updates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub shipment_id: Uuid,

    pub status: ShipmentStatus,

    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,

    pub description: Option<String>,

    pub timestamp: DateTime<Utc>,

    pub updated_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shipment::Entity",
        from = "Column::ShipmentId",
        to = "super::shipment::Column::Id",
        on_delete = "Cascade"
    )]
    Shipment,

    #[sea_orm(
        belongs_to = "super::admin_user::Entity",
        from = "Column::UpdatedBy",
        to = "super::admin_user::Column::Id"
    )]
    AdminUser,
}

impl Related<super::shipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipment.def()
    }
}

impl Related<super::admin_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdminUser.def()
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
