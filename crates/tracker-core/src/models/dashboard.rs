//! Virtual dashboard models

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single rendered dashboard value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardValue {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Rendering state of the virtual dashboard at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub captured_at: DateTime<Utc>,
    /// Parameter id -> latest value
    #[serde(default)]
    pub values: BTreeMap<i32, DashboardValue>,
}

impl DashboardSnapshot {
    pub fn new(captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, parameter_id: i32) -> Option<&DashboardValue> {
        self.values.get(&parameter_id)
    }
}
