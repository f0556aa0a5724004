//! SGP4 propagation of a two-line element set into the shared inertial
//! frame.
//!
//! SGP4's native output frame is TEME (True Equator, Mean Equinox of date).
//! The ephemeris crate's Sun/Moon series are computed in the mean-equator-
//! of-date frame. The two differ by polar motion and nutation, both well
//! under an arcsecond, so TEME positions are used directly as [`EciVector`]
//! without a frame rotation. This is a deliberate approximation; see the
//! workspace design notes if sub-arcsecond accuracy is ever required.

use chrono::{DateTime, Utc};
use thiserror::Error;
use transit_geometry::EciVector;

#[derive(Error, Debug)]
pub enum PropagatorError {
    #[error("invalid TLE: {0}")]
    InvalidTle(String),
    #[error("SGP4 propagation failed: {0}")]
    PropagationFailed(String),
}

pub type Result<T> = std::result::Result<T, PropagatorError>;

/// Anything that can report a satellite's inertial-frame position at an
/// instant. Lets callers (tests, simulators) substitute a test double for
/// the real SGP4 propagator without changing the code that consumes it.
pub trait SatellitePositionSource {
    fn position_km(&self, time: DateTime<Utc>) -> std::result::Result<EciVector, String>;
}

impl SatellitePositionSource for Propagator {
    fn position_km(&self, time: DateTime<Utc>) -> std::result::Result<EciVector, String> {
        self.position(time).map_err(|e| e.to_string())
    }
}

/// A TLE pair plus the derived SGP4 constants, ready for repeated
/// propagation at arbitrary instants.
pub struct Propagator {
    elements: sgp4::Elements,
    constants: sgp4::Constants,
}

impl Propagator {
    pub fn from_tle(line1: &str, line2: &str) -> Result<Self> {
        let elements = sgp4::Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
            .map_err(|e| PropagatorError::InvalidTle(format!("{e:?}")))?;

        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| PropagatorError::PropagationFailed(format!("{e:?}")))?;

        tracing::debug!(
            norad_id = elements.norad_id,
            epoch = %elements.datetime,
            "loaded TLE"
        );

        Ok(Self { elements, constants })
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    /// Position at `time`, in the shared inertial frame, km.
    pub fn position(&self, time: DateTime<Utc>) -> Result<EciVector> {
        let epoch_utc = DateTime::<Utc>::from_naive_utc_and_offset(self.elements.datetime, Utc);
        let minutes_since_epoch = time.signed_duration_since(epoch_utc).num_milliseconds() as f64 / 60_000.0;

        tracing::trace!(
            norad_id = self.elements.norad_id,
            minutes_since_epoch,
            "propagating"
        );

        let prediction = self
            .constants
            .propagate(minutes_since_epoch)
            .map_err(|e| PropagatorError::PropagationFailed(format!("{e:?}")))?;

        Ok(EciVector::new(
            prediction.position[0],
            prediction.position[1],
            prediction.position[2],
        ))
    }
}
