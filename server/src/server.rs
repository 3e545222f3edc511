use chrono::Utc;
use serde::Serialize;
use shared::changes::{ChangeDetectionPeriod, ChangeDetectionResult};
use shared::models::MapBounds;
use shared::realtime::NotificationData;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::detection::{detect_changes, DetectionParams};
use crate::error::{ErrorBody, FeedError};
use crate::firms::{FireRecord, FirmsClient};
use crate::notifications;
use crate::params::{FeedRequest, FiresQuery};

pub async fn run(address: std::net::SocketAddr, client: FirmsClient) {
    log::info!("Starting firefeed server on {}", address);
    warp::serve(routes(client)).run(address).await
}

pub fn routes(
    client: FirmsClient,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let health_route = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    let fires_route = warp::path!("api" / "fires")
        .and(warp::get())
        .and(warp::query::<FiresQuery>())
        .and(with_client(client.clone()))
        .and_then(fires);

    let changes_route = warp::path!("api" / "fires" / "changes")
        .and(warp::get())
        .and(warp::query::<FiresQuery>())
        .and(with_client(client))
        .and_then(changes);

    health_route
        .or(fires_route)
        .or(changes_route)
        .recover(rejection)
}

fn with_client(
    client: FirmsClient,
) -> impl Filter<Extract = (FirmsClient,), Error = Infallible> + Clone {
    warp::any().map(move || client.clone())
}

fn feed_request(query: FiresQuery, client: &FirmsClient) -> Result<FeedRequest, Rejection> {
    FeedRequest::from_query(query, client.default_source(), Utc::now().date_naive())
        .map_err(warp::reject::custom)
}

/// Success envelope of `/api/fires`.
#[derive(Serialize)]
pub struct FiresResponse {
    fires: Vec<FireRecord>,
    count: usize,
    bounds: MapBounds,
    source: String,
    days: u32,
}

impl FiresResponse {
    pub fn new(req: FeedRequest, fires: Vec<FireRecord>) -> Self {
        FiresResponse {
            count: fires.len(),
            fires,
            bounds: req.bounds,
            source: req.source,
            days: req.days,
        }
    }
}

pub async fn fires(query: FiresQuery, client: FirmsClient) -> Result<impl Reply, Rejection> {
    let req = feed_request(query, &client)?;
    let fires = client
        .fetch_fires(&req)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&FiresResponse::new(req, fires)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangesResponse {
    period: ChangeDetectionPeriod,
    result: ChangeDetectionResult,
    notifications: Vec<NotificationData>,
    bounds: MapBounds,
    source: String,
    current_count: usize,
    previous_count: usize,
}

pub async fn changes(query: FiresQuery, client: FirmsClient) -> Result<impl Reply, Rejection> {
    let req = feed_request(query, &client)?;
    let previous_req = req.previous_window().map_err(warp::reject::custom)?;

    let (current, previous) = futures::try_join!(
        client.fetch_fire_data(&req),
        client.fetch_fire_data(&previous_req)
    )
    .map_err(warp::reject::custom)?;

    let result = detect_changes(&previous, &current, &DetectionParams::default());
    log::info!(
        "Change detection for {} ending {}: {} changes over {} previous hotspots",
        req.source,
        req.date,
        result.total_changes(),
        previous.len()
    );

    Ok(warp::reply::json(&ChangesResponse {
        period: ChangeDetectionPeriod::from_days(req.days),
        notifications: notifications::from_changes(&result),
        result,
        bounds: req.bounds,
        source: req.source,
        current_count: current.len(),
        previous_count: previous.len(),
    }))
}

pub async fn rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, body) = if let Some(e) = err.find::<FeedError>() {
        if e.status().is_client_error() {
            log::warn!("Rejected fire data request: {}", e);
        } else {
            log::error!("Error fetching fire data: {}", e);
        }
        (e.status(), e.body())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, message("Not found"))
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        log::warn!("Invalid query string: {}", e);
        (StatusCode::BAD_REQUEST, message("Invalid query string"))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, message("Method not allowed"))
    } else {
        log::error!("Error: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, message("Internal server error."))
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), code))
}

fn message(error: &str) -> ErrorBody {
    ErrorBody {
        error: error.to_string(),
        details: None,
    }
}
