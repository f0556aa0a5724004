//! Classifier and derived quantities (component G).

use chrono::{DateTime, Utc};
use transit_propagation::SatellitePositionSource;

use crate::model::{EventKind, RefinedMinimum, SearchMode, TransitError};
use crate::scene::Scene;

/// Classifies a refined minimum, or discards it. Never produces an event
/// for a body below the horizon or a satellite below the altitude floor.
pub fn classify(
    refined: &RefinedMinimum,
    alt_min_deg: f64,
    near_margin_deg: f64,
    search_mode: SearchMode,
    max_distance_km: f64,
) -> Option<EventKind> {
    if refined.sat_alt_deg < alt_min_deg || refined.body_alt_deg <= 0.0 {
        return None;
    }

    if refined.sep_deg <= refined.disc_radius_deg {
        return Some(EventKind::Transit);
    }

    if refined.sep_deg <= refined.disc_radius_deg + near_margin_deg {
        return Some(EventKind::Near);
    }

    if search_mode == SearchMode::Fast && max_distance_km > 0.0 {
        let required_km = refined.sep_deg.to_radians() * refined.sat_range_km;
        if required_km <= max_distance_km {
            return Some(EventKind::Reachable);
        }
    }

    None
}

/// Apparent angular speed of the satellite in the observer's sky, via
/// altaz differencing (not d(separation)/dt, which double-counts the
/// body's own motion).
pub fn angular_speed_deg_per_s<S: SatellitePositionSource>(
    scene: &Scene<S>,
    t_star: DateTime<Utc>,
    delta_s: f64,
) -> Result<f64, TransitError> {
    let before = scene.satellite_look(t_star - chrono::Duration::milliseconds((delta_s * 1000.0) as i64))?;
    let after = scene.satellite_look(t_star + chrono::Duration::milliseconds((delta_s * 1000.0) as i64))?;

    let v0 = sky_unit_vector(before.altitude_deg, before.azimuth_deg);
    let v1 = sky_unit_vector(after.altitude_deg, after.azimuth_deg);

    let angle_deg = transit_geometry::angle(&v0, &v1).to_degrees();
    Ok(angle_deg / (2.0 * delta_s))
}

fn sky_unit_vector(altitude_deg: f64, azimuth_deg: f64) -> nalgebra::Vector3<f64> {
    let alt = altitude_deg.to_radians();
    let az = azimuth_deg.to_radians();
    nalgebra::Vector3::new(alt.cos() * az.cos(), alt.cos() * az.sin(), alt.sin())
}

/// Apparent angular size in arc-seconds, via the small-angle approximation.
/// `None` when the satellite's nominal dimension is unknown.
pub fn apparent_angular_size_arcsec(dimension_m: Option<f64>, sat_range_km: f64) -> Option<f64> {
    let dimension_km = dimension_m? / 1000.0;
    Some((dimension_km / sat_range_km).to_degrees() * 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Body, EventKind};

    fn minimum(sep_deg: f64, disc_radius_deg: f64, sat_alt_deg: f64, body_alt_deg: f64, sat_range_km: f64) -> RefinedMinimum {
        RefinedMinimum {
            t: Utc::now(),
            sep_deg,
            disc_radius_deg,
            sat_alt_deg,
            sat_az_deg: 0.0,
            body_alt_deg,
            sat_range_km,
        }
    }

    #[test]
    fn sep_equal_to_disc_radius_is_transit_inclusive() {
        let m = minimum(0.27, 0.27, 10.0, 20.0, 500.0);
        assert_eq!(classify(&m, 5.0, 0.5, SearchMode::Fast, 0.0), Some(EventKind::Transit));
    }

    #[test]
    fn sep_equal_to_radius_plus_margin_is_near_inclusive() {
        let m = minimum(0.77, 0.27, 10.0, 20.0, 500.0);
        assert_eq!(classify(&m, 5.0, 0.5, SearchMode::Fast, 0.0), Some(EventKind::Near));
    }

    #[test]
    fn body_at_exactly_zero_altitude_is_discarded() {
        let m = minimum(0.1, 0.27, 10.0, 0.0, 500.0);
        assert_eq!(classify(&m, 5.0, 0.5, SearchMode::Fast, 0.0), None);
    }

    #[test]
    fn sat_below_alt_min_is_discarded() {
        let m = minimum(0.1, 0.27, 4.9, 20.0, 500.0);
        assert_eq!(classify(&m, 5.0, 0.5, SearchMode::Fast, 0.0), None);
    }

    #[test]
    fn far_miss_within_parallax_budget_is_reachable() {
        // sep = 1 deg => 1 deg in radians * 500 km ~= 8.7 km
        let m = minimum(1.0, 0.27, 10.0, 20.0, 500.0);
        assert_eq!(classify(&m, 5.0, 0.5, SearchMode::Fast, 20.0), Some(EventKind::Reachable));
    }

    #[test]
    fn far_miss_outside_parallax_budget_is_discarded() {
        let m = minimum(5.0, 0.27, 10.0, 20.0, 500.0);
        assert_eq!(classify(&m, 5.0, 0.5, SearchMode::Fast, 20.0), None);
    }

    #[test]
    fn grid_mode_never_produces_reachable_via_fast_path() {
        let m = minimum(1.0, 0.27, 10.0, 20.0, 500.0);
        assert_eq!(classify(&m, 5.0, 0.5, SearchMode::Grid, 20.0), None);
    }

    #[test]
    fn angular_size_is_none_without_dimension() {
        assert_eq!(apparent_angular_size_arcsec(None, 420.0), None);
    }

    #[test]
    fn angular_size_of_iss_is_plausible() {
        let size = apparent_angular_size_arcsec(Some(108.0), 420.0).unwrap();
        // ~53 arcsec at a typical 420 km overhead pass.
        assert!((40.0..70.0).contains(&size), "size = {size}");
    }

    #[test]
    fn body_radius_and_prefilter_constants_are_sensible() {
        assert!(Body::Sun.prefilter_radius_deg() > Body::Moon.prefilter_radius_deg());
    }
}
