use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::LatLng;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeSettings {
    pub enabled: bool,
    /// Polling interval in minutes.
    pub interval: u64,
    pub notifications: bool,
    pub auto_refresh_on_focus: bool,
    pub background_sync: bool,
}

impl Default for RealTimeSettings {
    fn default() -> Self {
        RealTimeSettings {
            enabled: true,
            interval: 10,
            notifications: true,
            auto_refresh_on_focus: true,
            background_sync: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    NewFire,
    FireGrowth,
    FireExtinguished,
    System,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NotificationData {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
    pub severity: Severity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
    Connected,
    Disconnected,
    Error,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub status: Connection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_sync: Option<DateTime<Utc>>,
    pub update_count: u64,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        ConnectionStatus {
            status: Connection::Disconnected,
            last_sync: None,
            next_sync: None,
            update_count: 0,
        }
    }
}
