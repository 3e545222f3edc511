use serde::{Deserialize, Serialize};

use super::models::FireData;

/// Comparison window between two snapshots.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ChangeDetectionPeriod {
    pub label: String,
    pub days: u32,
}

impl ChangeDetectionPeriod {
    pub fn from_days(days: u32) -> Self {
        let label = if days == 1 {
            "Last 24 hours".to_string()
        } else {
            format!("Last {} days", days)
        };
        ChangeDetectionPeriod { label, days }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    New,
    Extinguished,
    Growing,
    Diminishing,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireChange {
    #[serde(flatten)]
    pub fire: FireData,
    pub change_type: ChangeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness_change: Option<f64>,
}

impl FireChange {
    pub fn new(fire: FireData, change_type: ChangeType) -> Self {
        FireChange {
            fire,
            change_type,
            previous_brightness: None,
            brightness_change: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub total_new: usize,
    pub total_extinguished: usize,
    pub total_growing: usize,
    pub total_diminishing: usize,
    pub change_percentage: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDetectionResult {
    pub new_fires: Vec<FireChange>,
    pub extinguished_fires: Vec<FireChange>,
    pub growing_fires: Vec<FireChange>,
    pub diminishing_fires: Vec<FireChange>,
    pub summary: ChangeSummary,
}

impl ChangeDetectionResult {
    pub fn total_changes(&self) -> usize {
        self.new_fires.len()
            + self.extinguished_fires.len()
            + self.growing_fires.len()
            + self.diminishing_fires.len()
    }
}
