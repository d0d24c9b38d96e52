//! Database entity definitions (sea-orm).

pub mod admin_user;
pub mod shipment;
pub mod tracking_update;
