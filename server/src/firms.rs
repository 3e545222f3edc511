//! NASA FIRMS area API client.
//!
//! Fetches hotspot CSV for a bounding box and day window and normalises each row into a
//! JSON record keyed by the CSV header names. See
//! https://firms.modaps.eosdis.nasa.gov/api/area/ for the upstream URL layout:
//! `{BASE}/{MAP_KEY}/{SOURCE}/{west},{south},{east},{north}/{DAY_RANGE}/{DATE}`

use std::time::Duration;

use serde_json::{Map, Value};
use shared::models::{DayNight, FireData};

use crate::config::FirmsConfig;
use crate::error::{FeedError, Result};
use crate::params::FeedRequest;

/// One CSV row, in header order.
pub type FireRecord = Map<String, Value>;

/// Columns coerced to numbers. Everything else is passed through as text.
pub const NUMERIC_FIELDS: [&str; 8] = [
    "latitude",
    "longitude",
    "brightness",
    "scan",
    "track",
    "confidence",
    "bright_t31",
    "frp",
];

#[derive(Clone)]
pub struct FirmsClient {
    client: reqwest::Client,
    config: FirmsConfig,
}

impl FirmsClient {
    pub fn new(config: FirmsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn default_source(&self) -> &str {
        &self.config.default_source
    }

    pub fn build_url(&self, req: &FeedRequest) -> String {
        self.url_with_key(req, &self.config.map_key)
    }

    /// URL safe for logs, with the map key masked.
    fn redacted_url(&self, req: &FeedRequest) -> String {
        self.url_with_key(req, "***")
    }

    fn url_with_key(&self, req: &FeedRequest, key: &str) -> String {
        let b = &req.bounds;
        format!(
            "{}/{}/{}/{},{},{},{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            key,
            req.source,
            b.west,
            b.south,
            b.east,
            b.north,
            req.days,
            req.date.format("%Y-%m-%d")
        )
    }

    /// Raw CSV text for the requested window.
    pub async fn fetch_csv(&self, req: &FeedRequest) -> Result<String> {
        let url = self.build_url(req);
        log::info!("Fetching from NASA FIRMS: {}", self.redacted_url(req));

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("NASA FIRMS answered {} for {}", status, self.redacted_url(req));
            return Err(FeedError::Upstream(status.to_string()));
        }

        Ok(response.text().await?)
    }

    pub async fn fetch_fires(&self, req: &FeedRequest) -> Result<Vec<FireRecord>> {
        let csv_text = self.fetch_csv(req).await?;
        let fires = parse_fires(&csv_text)?;
        log::debug!("Parsed {} hotspots from NASA FIRMS", fires.len());
        Ok(fires)
    }

    /// Same as `fetch_fires`, converted to typed records.
    pub async fn fetch_fire_data(&self, req: &FeedRequest) -> Result<Vec<FireData>> {
        let fires = self.fetch_fires(req).await?;
        Ok(fires.iter().map(to_fire_data).collect())
    }
}

/// Parse FIRMS CSV text. The first record is the header row.
///
/// Rows shorter than the header are padded (0 for numeric columns, empty text otherwise),
/// values past the last header column are dropped.
pub fn parse_fires(csv_text: &str) -> Result<Vec<FireRecord>> {
    if csv_text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();

    // FIRMS reports a bad MAP_KEY or source as a 200 with a plain text message.
    if !headers.iter().any(|h| h == "latitude" || h == "longitude") {
        let message = csv_text.lines().next().unwrap_or_default().trim();
        return Err(FeedError::Upstream(format!("unexpected response: {}", message)));
    }

    let mut fires = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let mut fire = FireRecord::new();
        for (idx, name) in headers.iter().enumerate() {
            let raw = record.get(idx).unwrap_or_default();
            let value = if NUMERIC_FIELDS.contains(&name) {
                Value::from(coerce_number(raw))
            } else {
                Value::String(raw.to_string())
            };
            fire.insert(name.to_string(), value);
        }
        fires.push(fire);
    }

    Ok(fires)
}

/// Anything that does not parse to a finite number becomes 0.
pub fn coerce_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn number(record: &FireRecord, keys: &[&str]) -> f64 {
    match keys.iter().find_map(|k| record.get(*k)) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => coerce_number(s),
        _ => 0.0,
    }
}

fn text(record: &FireRecord, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Typed view of a record. VIIRS feeds name the brightness channels `bright_ti4`/`bright_ti5`.
pub fn to_fire_data(record: &FireRecord) -> FireData {
    FireData {
        latitude: number(record, &["latitude"]),
        longitude: number(record, &["longitude"]),
        brightness: number(record, &["brightness", "bright_ti4"]),
        scan: number(record, &["scan"]),
        track: number(record, &["track"]),
        acq_date: text(record, "acq_date"),
        acq_time: text(record, "acq_time"),
        satellite: text(record, "satellite"),
        confidence: number(record, &["confidence"]),
        version: text(record, "version"),
        bright_t31: number(record, &["bright_t31", "bright_ti5"]),
        frp: number(record, &["frp"]),
        daynight: DayNight::from_flag(&text(record, "daynight")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use shared::models::MapBounds;

    const MODIS_CSV: &str = "latitude,longitude,brightness,scan,track,acq_date,acq_time,satellite,confidence,version,bright_t31,frp,daynight
34.1234,-118.5678,330.5,1.1,1.0,2024-01-15,0842,Aqua,85,6.1NRT,295.2,12.7,D
34.2,-118.6,301.0,1.0,1.0,2024-01-15,2110,Terra,low,6.1NRT,290.0,3.5,N
";

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_config(base_url: &str) -> FirmsConfig {
        FirmsConfig {
            map_key: "SECRETKEY".to_string(),
            base_url: base_url.to_string(),
            default_source: "VIIRS_SNPP_NRT".to_string(),
            timeout_secs: 5,
        }
    }

    fn test_request() -> FeedRequest {
        FeedRequest {
            bounds: MapBounds {
                west: -120.0,
                south: 35.0,
                east: -119.5,
                north: 36.25,
            },
            days: 2,
            source: "MODIS_NRT".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_build_url() {
        let client = FirmsClient::new(test_config("https://firms.example.org/api/area/csv/")).unwrap();
        assert_eq!(
            client.build_url(&test_request()),
            "https://firms.example.org/api/area/csv/SECRETKEY/MODIS_NRT/-120,35,-119.5,36.25/2/2024-01-15"
        );
    }

    #[test]
    fn test_redacted_url_hides_map_key() {
        let client = FirmsClient::new(test_config("https://firms.example.org")).unwrap();
        let redacted = client.redacted_url(&test_request());
        assert!(!redacted.contains("SECRETKEY"));
        assert!(redacted.contains("/***/MODIS_NRT/"));
    }

    #[test]
    fn test_redacted_url_keeps_rest_of_path() {
        let config = FirmsConfig {
            map_key: "1".to_string(),
            ..test_config("https://firms.example.org")
        };
        let client = FirmsClient::new(config).unwrap();
        assert_eq!(
            client.redacted_url(&test_request()),
            "https://firms.example.org/***/MODIS_NRT/-120,35,-119.5,36.25/2/2024-01-15"
        );
    }

    #[test]
    fn test_parse_coerces_numeric_columns() {
        let csv = "latitude,longitude,brightness,confidence\n10.5,20.25,300.1,abc\n";
        let fires = parse_fires(csv).unwrap();

        assert_eq!(fires.len(), 1);
        assert_eq!(fires[0]["latitude"], 10.5);
        assert_eq!(fires[0]["longitude"], 20.25);
        assert_eq!(fires[0]["brightness"], 300.1);
        assert_eq!(fires[0]["confidence"], 0.0);
    }

    #[test]
    fn test_parse_keeps_other_columns_as_text() {
        let fires = parse_fires(MODIS_CSV).unwrap();

        assert_eq!(fires.len(), 2);
        assert_eq!(fires[0]["acq_time"], "0842");
        assert_eq!(fires[0]["satellite"], "Aqua");
        assert_eq!(fires[0]["version"], "6.1NRT");
        assert_eq!(fires[0]["confidence"], 85.0);
        assert_eq!(fires[1]["confidence"], 0.0);
        assert_eq!(fires[1]["daynight"], "N");
    }

    #[test]
    fn test_parse_preserves_header_order() {
        let fires = parse_fires(MODIS_CSV).unwrap();
        let keys: Vec<&str> = fires[0].keys().map(String::as_str).collect();
        assert_eq!(keys[0], "latitude");
        assert_eq!(keys[12], "daynight");
    }

    #[test]
    fn test_parse_header_only() {
        let fires = parse_fires("latitude,longitude,brightness\n").unwrap();
        assert!(fires.is_empty());
        assert!(parse_fires("").unwrap().is_empty());
        assert!(parse_fires("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_quoted_field_with_comma() {
        let csv = "latitude,longitude,satellite\n1.5,2.5,\"Aqua, Terra\"\n";
        let fires = parse_fires(csv).unwrap();
        assert_eq!(fires[0]["satellite"], "Aqua, Terra");
        assert_eq!(fires[0]["longitude"], 2.5);
    }

    #[test]
    fn test_parse_short_and_long_rows() {
        let csv = "latitude,longitude,frp,daynight\n1.0,2.0\n3.0,4.0,5.0,D,extra\n";
        let fires = parse_fires(csv).unwrap();

        assert_eq!(fires.len(), 2);
        assert_eq!(fires[0]["frp"], 0.0);
        assert_eq!(fires[0]["daynight"], "");
        assert_eq!(fires[1]["frp"], 5.0);
        assert_eq!(fires[1].len(), 4);
    }

    #[test]
    fn test_parse_non_finite_becomes_zero() {
        let csv = "latitude,longitude,frp\nNaN,inf,1e400\n";
        let fires = parse_fires(csv).unwrap();
        assert_eq!(fires[0]["latitude"], 0.0);
        assert_eq!(fires[0]["longitude"], 0.0);
        assert_eq!(fires[0]["frp"], 0.0);
    }

    #[test]
    fn test_parse_duplicates_pass_through() {
        let csv = "latitude,longitude\n1.0,2.0\n1.0,2.0\n";
        assert_eq!(parse_fires(csv).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_rejects_plain_text_answer() {
        let err = parse_fires("Invalid MAP_KEY.").unwrap_err();
        assert!(matches!(err, FeedError::Upstream(ref msg) if msg.contains("Invalid MAP_KEY")));
    }

    #[test]
    fn test_to_fire_data_viirs_columns() {
        let csv = "latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,confidence,version,bright_ti5,frp,daynight
37.5,-120.1,345.2,0.4,0.37,2025-08-20,1012,N,n,2.0NRT,290.4,8.2,N
";
        let fires = parse_fires(csv).unwrap();
        let fire = to_fire_data(&fires[0]);

        assert_eq!(fire.latitude, 37.5);
        assert_eq!(fire.brightness, 345.2);
        assert_eq!(fire.bright_t31, 290.4);
        assert_eq!(fire.confidence, 0.0);
        assert_eq!(fire.acq_time, "1012");
        assert_eq!(fire.satellite, "N");
        assert_eq!(fire.daynight, DayNight::N);
    }

    #[tokio::test]
    async fn test_fetch_fires() {
        init();
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/SECRETKEY/MODIS_NRT/-120,35,-119.5,36.25/2/2024-01-15");
                then.status(200)
                    .header("content-type", "text/csv")
                    .body(MODIS_CSV);
            })
            .await;

        let client = FirmsClient::new(test_config(&server.base_url())).unwrap();
        let fires = client.fetch_fires(&test_request()).await.unwrap();

        m.assert_async().await;
        assert_eq!(fires.len(), 2);
        assert_eq!(fires[0]["frp"], 12.7);
    }

    #[tokio::test]
    async fn test_fetch_upstream_error_status() {
        init();
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(503);
            })
            .await;

        let client = FirmsClient::new(test_config(&server.base_url())).unwrap();
        let err = client.fetch_fires(&test_request()).await.unwrap_err();

        assert!(matches!(err, FeedError::Upstream(ref status) if status.contains("503")));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_unknown() {
        init();
        // Nothing listens on port 9 on the test hosts.
        let client = FirmsClient::new(test_config("http://127.0.0.1:9")).unwrap();
        let err = client.fetch_fires(&test_request()).await.unwrap_err();
        assert!(matches!(err, FeedError::Unknown(_)));
    }
}
