//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bloomery_core::CartItemId;

use super::product::ProductSummary;

/// A cart line: one product pending checkout, with its current catalog
/// price attached. At most one line exists per (user, product) pair;
/// adding the same product again merges into the existing line.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub id: CartItemId,
    pub product: ProductSummary,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}
