//! Service-level integration tests for the shipment tracking flow,
//! running against an in-memory SQLite database.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;

use smartship_api::db::DbPool;
use smartship_api::entities::{admin_user, shipment::ServiceType, tracking_update};
use smartship_api::errors::ServiceError;
use smartship_api::lifecycle::{ShipmentStatus, StepState};
use smartship_api::migrator::Migrator;
use smartship_api::services::auth::AuthService;
use smartship_api::services::shipments::{NewShipment, ShipmentService};

/// Fresh in-memory database with the schema applied. A single pooled
/// connection keeps every query on the same in-memory instance.
async fn setup_db() -> Arc<DbPool> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt)
        .await
        .expect("in-memory database should connect");
    Migrator::up(&db, None)
        .await
        .expect("migrations should apply");
    Arc::new(db)
}

fn sample_shipment() -> NewShipment {
    NewShipment {
        sender_name: "Acme Exports Ltd".into(),
        sender_address: "12 Harbour Road, Rotterdam, NL".into(),
        sender_phone: None,
        sender_email: Some("ops@acme-exports.example".into()),
        recipient_name: "John Doe".into(),
        recipient_address: "123 Main Street, Chicago, IL".into(),
        recipient_phone: Some("+1-312-555-0133".into()),
        recipient_email: None,
        service_type: ServiceType::Air,
        package_type: Some("package".into()),
        weight: Some("12.50".parse().unwrap()),
        dimensions: Some("40x30x20 cm".into()),
        description: Some("Machine parts".into()),
        estimated_delivery: None,
        cost: Some("249.00".parse().unwrap()),
    }
}

// Sequential updates land within the same millisecond occasionally; a
// short pause keeps timestamp ordering deterministic.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

#[tokio::test]
async fn created_shipment_round_trips_with_pending_status() {
    let db = setup_db().await;
    let service = ShipmentService::new(db);

    let created = service.create_shipment(sample_shipment()).await.unwrap();

    assert_eq!(created.status, ShipmentStatus::Pending);
    assert!(created.tracking_number.starts_with("SS"));
    assert_eq!(created.tracking_number.len(), 11);
    assert!(created.tracking_number[2..].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(created.actual_delivery, None);

    let by_number = service
        .find_by_tracking_number(&created.tracking_number)
        .await
        .unwrap()
        .expect("shipment should be found by tracking number");
    assert_eq!(by_number.id, created.id);

    let by_id = service.get_shipment(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.tracking_number, created.tracking_number);
}

#[tokio::test]
async fn tracking_numbers_are_distinct() {
    let db = setup_db().await;
    let service = ShipmentService::new(db);

    let first = service.create_shipment(sample_shipment()).await.unwrap();
    let second = service.create_shipment(sample_shipment()).await.unwrap();

    assert_ne!(first.tracking_number, second.tracking_number);
}

#[tokio::test]
async fn blank_required_field_is_rejected() {
    let db = setup_db().await;
    let service = ShipmentService::new(db);

    let mut input = sample_shipment();
    input.recipient_address = "   ".into();

    let err = service.create_shipment(input).await.unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn empty_location_update_is_rejected_without_side_effects() {
    let db = setup_db().await;
    let service = ShipmentService::new(db.clone());

    let created = service.create_shipment(sample_shipment()).await.unwrap();

    let err = service
        .record_tracking_update(created.id, ShipmentStatus::PickedUp, "   ", None, None)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    // Nothing was written: no update row, status untouched.
    let update_count = tracking_update::Entity::find()
        .filter(tracking_update::Column::ShipmentId.eq(created.id))
        .count(&*db)
        .await
        .unwrap();
    assert_eq!(update_count, 0);

    let reloaded = service.get_shipment(created.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, ShipmentStatus::Pending);
}

#[tokio::test]
async fn update_for_unknown_shipment_is_not_found() {
    let db = setup_db().await;
    let service = ShipmentService::new(db);

    let err = service
        .record_tracking_update(
            uuid::Uuid::new_v4(),
            ShipmentStatus::InTransit,
            "Hub B",
            None,
            None,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let err = service
        .get_tracking_updates(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn delivery_scenario_advances_status_and_timeline() {
    let db = setup_db().await;
    let service = ShipmentService::new(db);

    let created = service.create_shipment(sample_shipment()).await.unwrap();

    service
        .record_tracking_update(
            created.id,
            ShipmentStatus::PickedUp,
            "Depot A",
            Some("Package collected by courier".into()),
            None,
        )
        .await
        .unwrap();

    let view = service.track(&created.tracking_number).await.unwrap();
    assert_eq!(view.shipment.status, ShipmentStatus::PickedUp);
    assert_eq!(view.timeline.progress, 2.0 / 6.0);
    assert_eq!(view.timeline.current_location.as_deref(), Some("Depot A"));
    assert_eq!(view.timeline.exception, None);

    tick().await;
    service
        .record_tracking_update(created.id, ShipmentStatus::InTransit, "Hub B", None, None)
        .await
        .unwrap();
    tick().await;
    service
        .record_tracking_update(
            created.id,
            ShipmentStatus::Delivered,
            "Recipient Door",
            None,
            None,
        )
        .await
        .unwrap();

    let view = service.track(&created.tracking_number).await.unwrap();
    assert_eq!(view.shipment.status, ShipmentStatus::Delivered);
    assert!(view.shipment.actual_delivery.is_some());
    assert_eq!(view.timeline.progress, 1.0);
    assert_eq!(
        view.timeline.current_location.as_deref(),
        Some("Recipient Door")
    );

    // History is newest first.
    assert_eq!(view.updates.len(), 3);
    assert_eq!(view.updates[0].status, ShipmentStatus::Delivered);
    assert_eq!(view.updates[2].status, ShipmentStatus::PickedUp);

    // Every prior step shows completed, the final step active.
    for step in &view.timeline.steps[..5] {
        assert_eq!(step.state, StepState::Completed);
    }
    assert_eq!(view.timeline.steps[5].state, StepState::Active);
}

#[tokio::test]
async fn exception_update_freezes_progress_and_flags_timeline() {
    let db = setup_db().await;
    let service = ShipmentService::new(db);

    let created = service.create_shipment(sample_shipment()).await.unwrap();
    service
        .record_tracking_update(created.id, ShipmentStatus::PickedUp, "Depot A", None, None)
        .await
        .unwrap();
    tick().await;
    service
        .record_tracking_update(
            created.id,
            ShipmentStatus::Delayed,
            "Customs Warehouse",
            Some("Held pending paperwork".into()),
            None,
        )
        .await
        .unwrap();

    let view = service.track(&created.tracking_number).await.unwrap();
    assert_eq!(view.shipment.status, ShipmentStatus::Delayed);
    assert_eq!(view.timeline.exception, Some(ShipmentStatus::Delayed));
    // Bar stays at the picked-up position.
    assert_eq!(view.timeline.progress, 2.0 / 6.0);
    assert_eq!(view.timeline.steps[1].state, StepState::Active);
    assert_eq!(
        view.timeline.current_location.as_deref(),
        Some("Customs Warehouse")
    );
    assert_eq!(view.shipment.actual_delivery, None);
}

#[tokio::test]
async fn unknown_tracking_number_is_not_found() {
    let db = setup_db().await;
    let service = ShipmentService::new(db);

    let err = service.track("SS000000000").await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn deleting_a_shipment_removes_its_history() {
    let db = setup_db().await;
    let service = ShipmentService::new(db.clone());

    let created = service.create_shipment(sample_shipment()).await.unwrap();
    service
        .record_tracking_update(created.id, ShipmentStatus::PickedUp, "Depot A", None, None)
        .await
        .unwrap();

    service.delete_shipment(created.id).await.unwrap();

    assert!(service.get_shipment(created.id).await.unwrap().is_none());
    let orphaned = tracking_update::Entity::find()
        .filter(tracking_update::Column::ShipmentId.eq(created.id))
        .count(&*db)
        .await
        .unwrap();
    assert_eq!(orphaned, 0);

    let err = service.delete_shipment(created.id).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn list_filters_by_status_and_rejects_nothing() {
    let db = setup_db().await;
    let service = ShipmentService::new(db);

    let first = service.create_shipment(sample_shipment()).await.unwrap();
    let _second = service.create_shipment(sample_shipment()).await.unwrap();
    service
        .record_tracking_update(first.id, ShipmentStatus::InTransit, "Hub B", None, None)
        .await
        .unwrap();

    let (all, total) = service.list_shipments(1, 20, None).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(all.len(), 2);

    let (in_transit, total) = service
        .list_shipments(1, 20, Some("in_transit".into()))
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(in_transit[0].id, first.id);

    // An unrecognized filter value yields an empty page, not an error.
    let (none, total) = service
        .list_shipments(1, 20, Some("teleported".into()))
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert!(none.is_empty());
}

#[tokio::test]
async fn dashboard_stats_count_by_status() {
    let db = setup_db().await;
    let service = ShipmentService::new(db);

    let a = service.create_shipment(sample_shipment()).await.unwrap();
    let b = service.create_shipment(sample_shipment()).await.unwrap();
    let _c = service.create_shipment(sample_shipment()).await.unwrap();

    service
        .record_tracking_update(a.id, ShipmentStatus::InTransit, "Hub B", None, None)
        .await
        .unwrap();
    service
        .record_tracking_update(b.id, ShipmentStatus::Delivered, "Door", None, None)
        .await
        .unwrap();

    let stats = service.dashboard_stats().await.unwrap();
    assert_eq!(stats.total_shipments, 3);
    assert_eq!(stats.pending_shipments, 1);
    assert_eq!(stats.in_transit_shipments, 1);
    assert_eq!(stats.delivered_shipments, 1);
}

async fn seed_admin(db: &DbPool, username: &str, password: &str, active: bool) {
    let admin = admin_user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@smartship.example", username)),
        password: Set(password.to_string()),
        role: Set("admin".to_string()),
        is_active: Set(active),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    admin.insert(db).await.expect("admin seed should insert");
}

#[tokio::test]
async fn admin_login_accepts_stored_and_demo_credentials() {
    let db = setup_db().await;
    seed_admin(&db, "ops", "s3cret", true).await;
    let auth = AuthService::new(db);

    let session = auth.login("ops", "s3cret").await.unwrap();
    assert_eq!(session.username, "ops");
    assert_eq!(session.role, "admin");

    // The demo fallback credential also works.
    let session = auth.login("ops", "admin123").await.unwrap();
    assert_eq!(session.username, "ops");
}

#[tokio::test]
async fn admin_login_rejects_bad_password_and_inactive_accounts() {
    let db = setup_db().await;
    seed_admin(&db, "ops", "s3cret", true).await;
    seed_admin(&db, "retired", "s3cret", false).await;
    let auth = AuthService::new(db);

    let err = auth.login("ops", "wrong").await.unwrap_err();
    assert_matches!(err, ServiceError::AuthError(_));

    let err = auth.login("retired", "s3cret").await.unwrap_err();
    assert_matches!(err, ServiceError::AuthError(_));

    let err = auth.login("ghost", "s3cret").await.unwrap_err();
    assert_matches!(err, ServiceError::AuthError(_));
}
