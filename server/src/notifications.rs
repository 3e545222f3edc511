use chrono::Utc;
use shared::changes::{ChangeDetectionResult, FireChange};
use shared::models::{FireData, LatLng};
use shared::realtime::{NotificationData, NotificationType, Severity};

pub fn severity_for(fire: &FireData) -> Severity {
    if fire.frp >= 100.0 {
        Severity::High
    } else if fire.frp >= 20.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn notification(
    kind: NotificationType,
    title: &str,
    message: String,
    location: Option<LatLng>,
    severity: Severity,
) -> NotificationData {
    NotificationData {
        id: uuid::Uuid::new_v4().to_string(),
        kind,
        title: title.to_string(),
        message,
        timestamp: Utc::now(),
        location,
        severity,
    }
}

fn position(change: &FireChange) -> String {
    format!("{:.4}, {:.4}", change.fire.latitude, change.fire.longitude)
}

/// Diminishing fires are left out.
pub fn from_changes(result: &ChangeDetectionResult) -> Vec<NotificationData> {
    let new_fires = result.new_fires.iter().map(|change| {
        notification(
            NotificationType::NewFire,
            "New fire detected",
            format!(
                "New hotspot at {} ({:.1} MW)",
                position(change),
                change.fire.frp
            ),
            Some(LatLng::from(&change.fire)),
            severity_for(&change.fire),
        )
    });

    let growing = result.growing_fires.iter().map(|change| {
        notification(
            NotificationType::FireGrowth,
            "Fire intensifying",
            format!(
                "Hotspot at {} brightened by {:.1} K",
                position(change),
                change.brightness_change.unwrap_or_default()
            ),
            Some(LatLng::from(&change.fire)),
            severity_for(&change.fire),
        )
    });

    let extinguished = result.extinguished_fires.iter().map(|change| {
        notification(
            NotificationType::FireExtinguished,
            "Fire no longer detected",
            format!("Hotspot at {} is no longer reported", position(change)),
            Some(LatLng::from(&change.fire)),
            Severity::Low,
        )
    });

    new_fires.chain(growing).chain(extinguished).collect()
}

pub fn system(message: String) -> NotificationData {
    notification(
        NotificationType::System,
        "Fire feed unavailable",
        message,
        None,
        Severity::Medium,
    )
}
