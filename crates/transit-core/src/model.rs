//! Data model: observer, satellite input, query parameters, events, and
//! the error/outcome types every query returns.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// An observer's fixed position for the duration of a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub elev_m: f64,
}

impl Observer {
    pub fn validate(&self) -> Result<(), TransitError> {
        if !(-90.0..=90.0).contains(&self.lat_deg) {
            return Err(TransitError::InvalidInput(format!(
                "latitude {} out of range [-90, 90]",
                self.lat_deg
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon_deg) {
            return Err(TransitError::InvalidInput(format!(
                "longitude {} out of range [-180, 180]",
                self.lon_deg
            )));
        }
        Ok(())
    }
}

/// One satellite's TLE and reporting metadata.
#[derive(Debug, Clone)]
pub struct SatelliteInput {
    pub name: String,
    pub tle_line1: String,
    pub tle_line2: String,
    pub dimension_m: Option<f64>,
}

impl SatelliteInput {
    /// Nominal linear dimension used for apparent angular size, falling
    /// back to a small built-in table of well-known objects.
    pub fn resolved_dimension_m(&self) -> Option<f64> {
        self.dimension_m.or_else(|| known_dimension_m(&self.name))
    }
}

/// Nominal maximum linear dimension (meters) for a few well-known objects.
const KNOWN_DIMENSIONS: &[(&str, f64)] = &[
    ("ISS (ZARYA)", 108.0),
    ("TIANGONG", 16.6),
    ("HUBBLE SPACE TELESCOPE", 13.2),
];

pub fn known_dimension_m(name: &str) -> Option<f64> {
    KNOWN_DIMENSIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, d)| *d)
}

/// Which body a transit/near/reachable event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Body {
    Sun,
    Moon,
}

impl From<Body> for transit_ephemeris::Body {
    fn from(b: Body) -> Self {
        match b {
            Body::Sun => transit_ephemeris::Body::Sun,
            Body::Moon => transit_ephemeris::Body::Moon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Transit,
    Near,
    Reachable,
}

/// Selects the §4.H strategy used when `max_distance_km > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Single-observer parallax approximation; no grid is built.
    Fast,
    /// Full radial grid of candidate observer locations.
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridElevationMode {
    /// Every grid point inherits the base observer's elevation.
    Base,
    /// Elevation is looked up per grid point via `ElevationLookup`.
    Lookup,
}

/// Query configuration. Defaults follow the reference contract (§6).
#[derive(Debug, Clone)]
pub struct QueryParams {
    pub observer: Observer,
    pub start: DateTime<Utc>,
    pub days: f64,
    pub alt_min_deg: f64,
    pub near_margin_deg: f64,
    pub coarse_step_s: f64,
    pub fine_step_s: f64,
    pub refine_window_s: f64,
    pub max_distance_km: f64,
    pub search_mode: SearchMode,
    pub grid_step_km: f64,
    pub grid_elev_mode: GridElevationMode,
    pub workers: usize,
    pub satellites: Vec<SatelliteInput>,
}

impl QueryParams {
    pub fn new(observer: Observer, start: DateTime<Utc>, days: f64) -> Self {
        Self {
            observer,
            start,
            days,
            alt_min_deg: 5.0,
            near_margin_deg: 0.5,
            coarse_step_s: 20.0,
            fine_step_s: 1.0,
            refine_window_s: 60.0,
            max_distance_km: 0.0,
            search_mode: SearchMode::Fast,
            grid_step_km: 2.0,
            grid_elev_mode: GridElevationMode::Base,
            workers: 0,
            satellites: Vec::new(),
        }
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + chrono::Duration::milliseconds((self.days * 86_400_000.0) as i64)
    }

    pub fn validate(&self) -> Result<(), TransitError> {
        self.observer.validate()?;
        if self.days < 0.0 {
            return Err(TransitError::InvalidInput("days must be >= 0".into()));
        }
        if self.coarse_step_s <= 0.0 || self.fine_step_s <= 0.0 {
            return Err(TransitError::InvalidInput(
                "coarse_step_s and fine_step_s must be > 0".into(),
            ));
        }
        if self.alt_min_deg < -90.0 || self.alt_min_deg > 90.0 {
            return Err(TransitError::InvalidInput(
                "alt_min_deg out of range".into(),
            ));
        }
        if self.near_margin_deg < 0.0 {
            return Err(TransitError::InvalidInput(
                "near_margin_deg must be >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Closest-approach minimum produced by the refiner (component F), carrying
/// the satellite range directly rather than smuggling it through a side
/// channel.
#[derive(Debug, Clone, Copy)]
pub struct RefinedMinimum {
    pub t: DateTime<Utc>,
    pub sep_deg: f64,
    pub disc_radius_deg: f64,
    pub sat_alt_deg: f64,
    pub sat_az_deg: f64,
    pub body_alt_deg: f64,
    pub sat_range_km: f64,
}

/// Where a grid-search event's observer differed from the base observer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GridAttachment {
    pub lat: f64,
    pub lon: f64,
    pub elev: f64,
    pub distance_km: f64,
}

/// The canonical output record (§3).
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub time_utc: DateTime<Utc>,
    pub satellite: String,
    pub body: Body,
    pub kind: EventKind,
    pub separation_arcmin: f64,
    pub target_radius_arcmin: f64,
    pub sat_alt_deg: f64,
    pub sat_az_deg: f64,
    pub sat_distance_km: f64,
    pub target_alt_deg: f64,
    pub speed_deg_per_s: f64,
    pub speed_arcmin_per_s: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sat_angular_size_arcsec: Option<f64>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridAttachment>,
}

impl Event {
    pub fn dedup_key(&self) -> (i64, Body, EventKind, String) {
        (
            self.time_utc.timestamp(),
            self.body,
            self.kind,
            self.satellite.clone(),
        )
    }
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

#[derive(Error, Debug)]
pub enum TransitError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("TLE parse error for {satellite}: {message}")]
    TleParseError { satellite: String, message: String },
    #[error("propagator error for {satellite}: {message}")]
    PropagatorError { satellite: String, message: String },
    #[error("ephemeris unavailable: {0}")]
    EphemerisUnavailable(String),
    #[error(transparent)]
    CollaboratorError(#[from] CollaboratorError),
}

/// Per-satellite error isolation: a query result is not all-or-nothing.
#[derive(Debug, Default)]
pub struct QueryOutcome {
    pub events: Vec<Event>,
    pub errors: Vec<(String, TransitError)>,
}
