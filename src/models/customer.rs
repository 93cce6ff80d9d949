//! Customer model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A customer, keyed by phone number
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub total_bookings: i32,
    pub created_at: DateTime<Utc>,
}
