//! HTTP handlers and the service aggregate they share.

pub mod admin;
pub mod shipments;
pub mod tracking;

use std::sync::Arc;

use crate::db::DbPool;
use crate::services::auth::AuthService;
use crate::services::shipments::ShipmentService;

/// Services shared by the HTTP handlers through [`crate::AppState`].
#[derive(Clone)]
pub struct AppServices {
    pub shipments: Arc<ShipmentService>,
    pub auth: Arc<AuthService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            shipments: Arc::new(ShipmentService::new(db_pool.clone())),
            auth: Arc::new(AuthService::new(db_pool)),
        }
    }
}
