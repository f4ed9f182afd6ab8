//! Service Model (bookable treatment)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bookable service, owned by catalog management
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Duration in minutes (> 0)
    pub duration_minutes: u32,
    pub price: Decimal,
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    /// Staff members able to perform this service
    #[serde(default)]
    pub staff_ids: Vec<String>,
}

impl Service {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_minutes: u32, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_minutes,
            price,
            is_active: true,
            is_featured: false,
            staff_ids: Vec::new(),
        }
    }

    pub fn with_staff(mut self, staff_id: impl Into<String>) -> Self {
        self.staff_ids.push(staff_id.into());
        self
    }

    pub fn is_offered_by(&self, staff_id: &str) -> bool {
        self.staff_ids.iter().any(|id| id == staff_id)
    }
}
