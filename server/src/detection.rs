//! Hotspot change detection between two snapshots of the same area.

use shared::changes::{ChangeDetectionResult, ChangeSummary, ChangeType, FireChange};
use shared::models::FireData;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, Debug)]
pub struct DetectionParams {
    /// Maximum distance between two detections of the same fire.
    pub match_radius_km: f64,
    /// Brightness delta (Kelvin) above which a fire counts as growing or diminishing.
    pub brightness_threshold: f64,
}

impl Default for DetectionParams {
    fn default() -> Self {
        DetectionParams {
            match_radius_km: 1.0,
            brightness_threshold: 10.0,
        }
    }
}

/// Great-circle distance in kilometers.
pub fn haversine_km(a: &FireData, b: &FireData) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Classify `current` against `previous`.
///
/// Each current hotspot is paired with the nearest previous hotspot within the match radius
/// that has not been paired yet. Output lists keep the order of their input snapshot.
pub fn detect_changes(
    previous: &[FireData],
    current: &[FireData],
    params: &DetectionParams,
) -> ChangeDetectionResult {
    let mut matched = vec![false; previous.len()];
    let mut result = ChangeDetectionResult::default();

    for fire in current {
        let nearest = previous
            .iter()
            .enumerate()
            .filter(|(idx, _)| !matched[*idx])
            .map(|(idx, prev)| (idx, haversine_km(prev, fire)))
            .filter(|(_, dist)| *dist <= params.match_radius_km)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match nearest {
            None => result
                .new_fires
                .push(FireChange::new(fire.clone(), ChangeType::New)),
            Some((idx, _)) => {
                matched[idx] = true;
                let prev = &previous[idx];
                let delta = fire.brightness - prev.brightness;

                let change_type = if delta > params.brightness_threshold {
                    ChangeType::Growing
                } else if delta < -params.brightness_threshold {
                    ChangeType::Diminishing
                } else {
                    continue;
                };

                let change = FireChange {
                    fire: fire.clone(),
                    change_type,
                    previous_brightness: Some(prev.brightness),
                    brightness_change: Some(delta),
                };
                match change_type {
                    ChangeType::Growing => result.growing_fires.push(change),
                    _ => result.diminishing_fires.push(change),
                }
            }
        }
    }

    result.extinguished_fires = previous
        .iter()
        .zip(matched)
        .filter(|(_, was_matched)| !was_matched)
        .map(|(fire, _)| FireChange::new(fire.clone(), ChangeType::Extinguished))
        .collect();

    result.summary = summarize(&result, previous.len());
    result
}

fn summarize(result: &ChangeDetectionResult, previous_count: usize) -> ChangeSummary {
    let changed = result.total_changes();
    let change_percentage = if previous_count == 0 {
        if changed > 0 {
            100.0
        } else {
            0.0
        }
    } else {
        (changed as f64 / previous_count as f64 * 100.0 * 100.0).round() / 100.0
    };

    ChangeSummary {
        total_new: result.new_fires.len(),
        total_extinguished: result.extinguished_fires.len(),
        total_growing: result.growing_fires.len(),
        total_diminishing: result.diminishing_fires.len(),
        change_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(lat: f64, lon: f64, brightness: f64) -> FireData {
        FireData {
            latitude: lat,
            longitude: lon,
            brightness,
            ..Default::default()
        }
    }

    #[test]
    fn test_haversine() {
        let a = fire(0.0, 0.0, 0.0);
        let b = fire(0.0, 1.0, 0.0);
        // one degree of longitude at the equator
        assert!((haversine_km(&a, &b) - 111.19).abs() < 0.01);
        assert_eq!(haversine_km(&a, &a), 0.0);
    }

    #[test]
    fn test_empty_snapshots() {
        let result = detect_changes(&[], &[], &DetectionParams::default());
        assert_eq!(result.total_changes(), 0);
        assert_eq!(result.summary.change_percentage, 0.0);
    }

    #[test]
    fn test_new_and_extinguished() {
        let previous = vec![fire(34.0, -118.0, 320.0)];
        let current = vec![fire(36.0, -120.0, 330.0)];

        let result = detect_changes(&previous, &current, &DetectionParams::default());

        assert_eq!(result.summary.total_new, 1);
        assert_eq!(result.summary.total_extinguished, 1);
        assert_eq!(result.new_fires[0].fire.latitude, 36.0);
        assert_eq!(result.new_fires[0].change_type, ChangeType::New);
        assert_eq!(result.extinguished_fires[0].fire.latitude, 34.0);
        assert_eq!(result.summary.change_percentage, 200.0);
    }

    #[test]
    fn test_growing_and_diminishing() {
        let previous = vec![fire(34.0, -118.0, 320.0), fire(35.0, -119.0, 340.0)];
        let current = vec![fire(34.001, -118.001, 345.0), fire(35.0, -119.0, 300.0)];

        let result = detect_changes(&previous, &current, &DetectionParams::default());

        assert_eq!(result.summary.total_growing, 1);
        assert_eq!(result.summary.total_diminishing, 1);
        assert_eq!(result.summary.total_new, 0);
        assert_eq!(result.summary.total_extinguished, 0);

        let growing = &result.growing_fires[0];
        assert_eq!(growing.previous_brightness, Some(320.0));
        assert_eq!(growing.brightness_change, Some(25.0));

        let diminishing = &result.diminishing_fires[0];
        assert_eq!(diminishing.brightness_change, Some(-40.0));
        assert_eq!(result.summary.change_percentage, 100.0);
    }

    #[test]
    fn test_small_change_is_not_reported() {
        let previous = vec![fire(34.0, -118.0, 320.0)];
        let current = vec![fire(34.0, -118.0, 325.0)];

        let result = detect_changes(&previous, &current, &DetectionParams::default());

        assert_eq!(result.total_changes(), 0);
        assert_eq!(result.summary.change_percentage, 0.0);
    }

    #[test]
    fn test_previous_fire_matched_once() {
        let previous = vec![fire(34.0, -118.0, 320.0)];
        let current = vec![fire(34.0, -118.0, 320.0), fire(34.0001, -118.0001, 320.0)];

        let result = detect_changes(&previous, &current, &DetectionParams::default());

        assert_eq!(result.summary.total_new, 1);
        assert_eq!(result.summary.total_extinguished, 0);
        assert_eq!(result.new_fires[0].fire.latitude, 34.0001);
    }

    #[test]
    fn test_nearest_previous_wins() {
        let previous = vec![fire(34.005, -118.0, 300.0), fire(34.0, -118.0, 400.0)];
        let current = vec![fire(34.0, -118.0, 400.0)];

        let result = detect_changes(&previous, &current, &DetectionParams::default());

        // pairs with the co-located fire, leaving the other one extinguished
        assert_eq!(result.summary.total_growing, 0);
        assert_eq!(result.summary.total_extinguished, 1);
        assert_eq!(result.extinguished_fires[0].fire.latitude, 34.005);
    }

    #[test]
    fn test_everything_new_from_empty_baseline() {
        let current = vec![fire(1.0, 1.0, 300.0), fire(2.0, 2.0, 300.0)];
        let result = detect_changes(&[], &current, &DetectionParams::default());
        assert_eq!(result.summary.total_new, 2);
        assert_eq!(result.summary.change_percentage, 100.0);
    }

    #[test]
    fn test_percentage_rounding() {
        let previous = vec![
            fire(1.0, 1.0, 300.0),
            fire(2.0, 2.0, 300.0),
            fire(3.0, 3.0, 300.0),
        ];
        let current = vec![fire(1.0, 1.0, 300.0), fire(2.0, 2.0, 300.0)];

        let result = detect_changes(&previous, &current, &DetectionParams::default());
        assert_eq!(result.summary.change_percentage, 33.33);
    }
}
