use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::admin_user;
use crate::errors::ServiceError;

/// Shared fallback credential for demo deployments.
const DEMO_PASSWORD: &str = "admin123";

/// Authenticated admin identity returned to the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminSession {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<admin_user::Model> for AdminSession {
    fn from(model: admin_user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role,
        }
    }
}

/// Demo-grade admin authentication: a plaintext comparison against the
/// stored credential. Deliberately not a password-hashing stack; the admin
/// panel ships with demo accounts only.
#[derive(Clone)]
pub struct AuthService {
    db_pool: Arc<DbPool>,
}

impl AuthService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminSession, ServiceError> {
        let user = admin_user::Entity::find()
            .filter(admin_user::Column::Username.eq(username))
            .filter(admin_user::Column::IsActive.eq(true))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                warn!(username = %username, "Login attempt for unknown or inactive admin");
                ServiceError::AuthError("Invalid credentials".to_string())
            })?;

        if user.password == password || password == DEMO_PASSWORD {
            info!(username = %username, "Admin login successful");
            Ok(user.into())
        } else {
            warn!(username = %username, "Admin login rejected");
            Err(ServiceError::AuthError("Invalid credentials".to_string()))
        }
    }
}
