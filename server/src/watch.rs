//! Periodic polling of the feed, reporting changes between successive snapshots.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use shared::models::FireData;
use shared::realtime::{Connection, ConnectionStatus, NotificationData, RealTimeSettings, Severity};

use crate::cli::WatchArgs;
use crate::detection::{detect_changes, DetectionParams};
use crate::error::Result;
use crate::firms::FirmsClient;
use crate::notifications;
use crate::params::{FeedRequest, FiresQuery};

/// One week.
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

pub struct Watcher {
    client: FirmsClient,
    request: FeedRequest,
    settings: RealTimeSettings,
    params: DetectionParams,
    status: ConnectionStatus,
    baseline: Option<Vec<FireData>>,
}

impl Watcher {
    pub fn new(
        client: FirmsClient,
        query: FiresQuery,
        settings: RealTimeSettings,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let request = FeedRequest::from_query(query, client.default_source(), now.date_naive())?;
        Ok(Watcher {
            client,
            request,
            settings,
            params: DetectionParams::default(),
            status: ConnectionStatus::default(),
            baseline: None,
        })
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    fn interval(&self) -> TimeDelta {
        TimeDelta::minutes(self.settings.interval.min(MAX_INTERVAL_MINUTES) as i64)
    }

    /// Fetch one snapshot and diff it against the last one.
    ///
    /// The first successful poll only sets the baseline. Feed errors yield a system
    /// notification and keep the previous baseline.
    pub async fn poll(&mut self, now: DateTime<Utc>) -> Vec<NotificationData> {
        let req = FeedRequest {
            date: now.date_naive(),
            ..self.request.clone()
        };
        self.status.next_sync = Some(now + self.interval());

        let current = match self.client.fetch_fire_data(&req).await {
            Ok(fires) => fires,
            Err(e) => {
                log::error!("Fire feed poll failed: {}", e);
                self.status.status = Connection::Error;
                return vec![notifications::system(e.to_string())];
            }
        };

        self.status.status = Connection::Connected;
        self.status.last_sync = Some(now);
        self.status.update_count += 1;

        let notes = match self.baseline.take() {
            Some(previous) => {
                let result = detect_changes(&previous, &current, &self.params);
                log::info!(
                    "{} hotspots, {} new, {} extinguished, {} growing, {} diminishing",
                    current.len(),
                    result.summary.total_new,
                    result.summary.total_extinguished,
                    result.summary.total_growing,
                    result.summary.total_diminishing
                );
                if self.settings.notifications {
                    notifications::from_changes(&result)
                } else {
                    Vec::new()
                }
            }
            None => {
                log::info!("Baseline established with {} hotspots", current.len());
                Vec::new()
            }
        };

        self.baseline = Some(current);
        notes
    }
}

fn report(note: &NotificationData) {
    match note.severity {
        Severity::High => log::warn!("[{:?}] {}: {}", note.kind, note.title, note.message),
        _ => log::info!("[{:?}] {}: {}", note.kind, note.title, note.message),
    }
}

pub async fn exec(client: FirmsClient, args: WatchArgs) -> anyhow::Result<()> {
    let settings = RealTimeSettings {
        enabled: args.enabled,
        interval: args.interval,
        notifications: !args.no_notifications,
        ..Default::default()
    };
    if !settings.enabled {
        log::info!("Fire feed watch disabled");
        return Ok(());
    }

    let watcher = Watcher::new(client, args.feed.to_query(None), settings, Utc::now())?;
    log::info!("Watching fire feed every {} minutes", args.interval);
    run(watcher, tokio::signal::ctrl_c()).await;

    Ok(())
}

/// Poll on every tick until `shutdown` resolves.
///
/// A shutdown signalled while a poll is in flight stops the loop once that poll returns.
async fn run<F: Future>(mut watcher: Watcher, shutdown: F) {
    let period = watcher.settings.interval.clamp(1, MAX_INTERVAL_MINUTES) * 60;
    let mut ticker = tokio::time::interval(Duration::from_secs(period));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for note in watcher.poll(Utc::now()).await {
                    report(&note);
                }
                let status = watcher.status();
                log::debug!(
                    "Connection {:?}, {} updates, next sync {:?}",
                    status.status,
                    status.update_count,
                    status.next_sync
                );
            }
            _ = &mut shutdown => {
                log::info!("Stopping fire feed watch");
                break;
            }
        }
    }
}
