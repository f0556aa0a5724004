//! Wires a satellite position source, the ephemeris, and the topocentric
//! reducer together into a single angular-separation function of time for
//! one (satellite, body) pair. `satellite_position`/`body_position` return
//! raw geocentric vectors; every comparison and look-angle computation in
//! this module reduces both to the observer's own topocentric frame via
//! `transit_topo::topocentric_vector` first, so a satellite's position is
//! never weighed against a body's position from a different origin.

use chrono::{DateTime, Utc};
use transit_geometry::EcefVector;
use transit_propagation::SatellitePositionSource;
use transit_topo::LookAngles;

use crate::model::{Body, TransitError};

pub struct Scene<'a, S: SatellitePositionSource> {
    pub satellite_name: &'a str,
    pub observer_ecef: EcefVector,
    pub satellite: &'a S,
    pub body: Body,
}

impl<'a, S: SatellitePositionSource> Scene<'a, S> {
    fn satellite_position(&self, t: DateTime<Utc>) -> Result<transit_geometry::EciVector, TransitError> {
        self.satellite
            .position_km(t)
            .map_err(|message| TransitError::PropagatorError {
                satellite: self.satellite_name.to_string(),
                message,
            })
    }

    fn body_position(&self, t: DateTime<Utc>) -> transit_geometry::EciVector {
        transit_ephemeris::position_km(self.body.into(), t)
    }

    pub fn separation_deg(&self, t: DateTime<Utc>) -> Result<f64, TransitError> {
        let sat = self.satellite_position(t)?;
        let body = self.body_position(t);
        let sat_topo = transit_topo::topocentric_vector(&self.observer_ecef, &sat, t);
        let body_topo = transit_topo::topocentric_vector(&self.observer_ecef, &body, t);
        Ok(transit_geometry::angular_separation_deg(&sat_topo, &body_topo))
    }

    pub fn satellite_look(&self, t: DateTime<Utc>) -> Result<LookAngles, TransitError> {
        let sat = self.satellite_position(t)?;
        Ok(transit_topo::look_angles(&self.observer_ecef, &sat, t))
    }

    pub fn body_look(&self, t: DateTime<Utc>) -> LookAngles {
        let body = self.body_position(t);
        transit_topo::look_angles(&self.observer_ecef, &body, t)
    }

    pub fn disc_radius_deg(&self, t: DateTime<Utc>) -> f64 {
        let distance_km = self.body_look(t).range_km;
        transit_geometry::angular_radius_deg(self.body.radius_km(), distance_km)
    }
}

impl Body {
    pub fn radius_km(self) -> f64 {
        transit_ephemeris::Body::from(self).radius_km()
    }

    /// Coarse pre-filter disc radius used to reject passes early, before
    /// the expensive fine-grid refinement.
    pub fn prefilter_radius_deg(self) -> f64 {
        match self {
            Body::Sun => 0.53,
            Body::Moon => 0.26,
        }
    }
}
