use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::Deserialize;
use shared::models::MapBounds;

use crate::error::{FeedError, Result};

/// FIRMS area API accepts day ranges of 1 to 10.
pub const MAX_DAYS: u32 = 10;

/// No FIRMS archive goes back further than MODIS Terra.
pub const MIN_YEAR: i32 = 2000;

/// Raw query string of the fire endpoints, validated into a `FeedRequest`.
#[derive(Debug, Default, Deserialize)]
pub struct FiresQuery {
    pub bounds: Option<String>,
    pub days: Option<String>,
    pub source: Option<String>,
    pub date: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeedRequest {
    pub bounds: MapBounds,
    pub days: u32,
    pub source: String,
    /// Last acquisition day of the window.
    pub date: NaiveDate,
}

impl FeedRequest {
    pub fn from_query(query: FiresQuery, default_source: &str, today: NaiveDate) -> Result<Self> {
        let bounds = match query.bounds.as_deref() {
            Some(b) if !b.trim().is_empty() => parse_bounds(b)?,
            _ => {
                return Err(FeedError::MissingParameter(
                    "Bounds parameter is required".to_string(),
                ))
            }
        };
        let days = match query.days.as_deref() {
            Some(d) if !d.is_empty() => parse_days(d)?,
            _ => 1,
        };
        let source = match query.source.as_deref() {
            Some(s) if !s.is_empty() => parse_source(s)?,
            _ => default_source.to_string(),
        };
        let date = match query.date.as_deref() {
            Some(d) if !d.is_empty() => parse_date(d)?,
            _ => today,
        };

        Ok(FeedRequest {
            bounds,
            days,
            source,
            date,
        })
    }

    /// The same request, shifted back by its own window length.
    pub fn previous_window(&self) -> Result<FeedRequest> {
        let date = self
            .date
            .checked_sub_signed(TimeDelta::days(self.days as i64))
            .ok_or_else(|| {
                FeedError::InvalidParameter("Date is out of range for change detection".to_string())
            })?;

        Ok(FeedRequest {
            date,
            ..self.clone()
        })
    }
}

/// Parse `west,south,east,north` in degrees.
pub fn parse_bounds(s: &str) -> Result<MapBounds> {
    let invalid = || FeedError::InvalidParameter("Invalid bounds format".to_string());

    let coords = s
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(invalid)?;

    if coords.len() != 4 {
        return Err(invalid());
    }

    let bounds = MapBounds {
        west: coords[0],
        south: coords[1],
        east: coords[2],
        north: coords[3],
    };

    let lon_ok = |v: f64| (-180.0..=180.0).contains(&v);
    let lat_ok = |v: f64| (-90.0..=90.0).contains(&v);
    if !(lon_ok(bounds.west) && lon_ok(bounds.east) && lat_ok(bounds.south) && lat_ok(bounds.north))
    {
        return Err(invalid());
    }

    Ok(bounds)
}

pub fn parse_days(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(days) if (1..=MAX_DAYS).contains(&days) => Ok(days),
        _ => Err(FeedError::InvalidParameter(format!(
            "Invalid days parameter. Must be an integer between 1 and {}",
            MAX_DAYS
        ))),
    }
}

/// Sources end up in the upstream URL path, so only identifier characters are allowed.
pub fn parse_source(s: &str) -> Result<String> {
    if s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(s.to_string())
    } else {
        Err(FeedError::InvalidParameter(
            "Invalid source parameter".to_string(),
        ))
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        Ok(date) if date.year() >= MIN_YEAR => Ok(date),
        Ok(_) => Err(FeedError::InvalidParameter(format!(
            "Invalid date parameter. Must be {}-01-01 or later",
            MIN_YEAR
        ))),
        Err(_) => Err(FeedError::InvalidParameter(
            "Invalid date parameter. Expected YYYY-MM-DD".to_string(),
        )),
    }
}
