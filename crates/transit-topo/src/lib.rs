//! Topocentric reduction: turns an observer's fixed-Earth position and a
//! target's inertial-frame position into altitude, azimuth, and range.
//!
//! The observer is given in ECEF and has to be rotated into the inertial
//! frame by Greenwich Mean Sidereal Time before the South-East-Zenith
//! projection is taken; doing this the other way around (rotating the
//! target into ECEF) would require redoing the rotation per target per
//! instant instead of once per observer per instant, but either order is
//! numerically equivalent. This module rotates the observer.

use chrono::{DateTime, Utc};
use nalgebra::{Matrix3, Vector3};
use transit_geometry::{EcefVector, EciVector};

/// Altitude/azimuth/range of a target as seen by an observer, degrees and km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

/// Greenwich Mean Sidereal Time at `t`, in degrees, via the standard
/// Julian-date polynomial (IAU 1982).
pub fn gmst_deg(t: DateTime<Utc>) -> f64 {
    let jd = transit_ephemeris_julian_date(t);
    let jc = (jd - 2_451_545.0) / 36525.0;

    let gmst = 280.46061837
        + 360.98564736629 * (jd - 2_451_545.0)
        + 0.000387933 * jc * jc
        - jc * jc * jc / 38_710_000.0;

    normalize_degrees(gmst)
}

// Duplicated here (rather than depending on transit-ephemeris) to keep the
// topocentric reducer independent of the body-ephemeris crate; both compute
// the ordinary civil Julian Date from a UTC instant.
fn transit_ephemeris_julian_date(t: DateTime<Utc>) -> f64 {
    let unix_s = t.timestamp() as f64 + t.timestamp_subsec_nanos() as f64 / 1e9;
    unix_s / 86400.0 + 2_440_587.5
}

fn normalize_degrees(deg: f64) -> f64 {
    let d = deg % 360.0;
    if d < 0.0 {
        d + 360.0
    } else {
        d
    }
}

/// Rotate an ECEF vector into the shared inertial frame at time `t`.
pub fn ecef_to_eci(ecef: &EcefVector, t: DateTime<Utc>) -> EciVector {
    let theta = gmst_deg(t).to_radians();
    let (s, c) = theta.sin_cos();

    let rotation = Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0);

    EciVector(rotation * ecef.0)
}

/// Observer-to-target vector, in the shared inertial frame (km). Two
/// targets (e.g. a satellite and the Sun) must each be reduced to this
/// before their angular separation as seen by `observer` can be compared;
/// comparing their geocentric positions directly would ignore the
/// observer's own offset from Earth's center.
pub fn topocentric_vector(observer: &EcefVector, target: &EciVector, t: DateTime<Utc>) -> EciVector {
    let observer_eci = ecef_to_eci(observer, t);
    EciVector(target.0 - observer_eci.0)
}

/// Look angles from an observer (ECEF) to a target (inertial frame) at `t`.
pub fn look_angles(observer: &EcefVector, target: &EciVector, t: DateTime<Utc>) -> LookAngles {
    let range_vector: Vector3<f64> = topocentric_vector(observer, target, t).0;
    let range_km = range_vector.norm();

    let lat = geodetic_latitude_of(observer);
    let lon = geodetic_longitude_of(observer) + gmst_deg(t);
    let (lat, lon) = (lat.to_radians(), lon.to_radians());

    // Rotate the inertial-frame range vector into topocentric SEZ via the
    // observer's instantaneous longitude (lon here already folds in GMST,
    // so this is effectively a rotation from the inertial frame straight
    // into the local horizon, skipping an intermediate ECEF step).
    let dx = range_vector.x;
    let dy = range_vector.y;
    let dz = range_vector.z;

    let s = lat.sin() * lon.cos() * dx + lat.sin() * lon.sin() * dy - lat.cos() * dz;
    let e = -lon.sin() * dx + lon.cos() * dy;
    let z = lat.cos() * lon.cos() * dx + lat.cos() * lon.sin() * dy + lat.sin() * dz;

    let azimuth_deg = normalize_degrees(e.atan2(-s).to_degrees());
    let altitude_deg = (z / range_km).clamp(-1.0, 1.0).asin().to_degrees();

    LookAngles {
        altitude_deg,
        azimuth_deg,
        range_km,
    }
}

fn geodetic_latitude_of(ecef: &EcefVector) -> f64 {
    transit_geometry::ecef_to_geodetic(ecef).0
}

fn geodetic_longitude_of(ecef: &EcefVector) -> f64 {
    transit_geometry::ecef_to_geodetic(ecef).1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn gmst_is_bounded() {
        let t = Utc.with_ymd_and_hms(2025, 10, 5, 0, 0, 0).unwrap();
        let g = gmst_deg(t);
        assert!((0.0..360.0).contains(&g));
    }

    #[test]
    fn overhead_target_has_high_altitude() {
        let t = Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap();
        let observer = transit_geometry::geodetic_to_ecef(48.8566, 2.3522, 35.0);
        let observer_eci = ecef_to_eci(&observer, t);
        // Place the target far along the same direction as the observer,
        // i.e. directly overhead.
        let direction = observer_eci.0.normalize();
        let target = EciVector(observer_eci.0 + direction * 500.0);

        let look = look_angles(&observer, &target, t);
        assert!(look.altitude_deg > 80.0, "altitude = {}", look.altitude_deg);
        assert!((look.range_km - 500.0).abs() < 1.0);
    }

    #[test]
    fn topocentric_vector_subtracts_the_observer_not_just_rotates_it() {
        let t = Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap();
        let observer = transit_geometry::geodetic_to_ecef(48.8566, 2.3522, 35.0);
        let observer_eci = ecef_to_eci(&observer, t);
        let target = EciVector::new(1.0e6, 2.0e6, 3.0e6);

        let topo = topocentric_vector(&observer, &target, t);
        assert!((topo.0 - (target.0 - observer_eci.0)).norm() < 1e-9);
        // A geocentric (non-subtracted) comparison would differ by the
        // observer's own few-thousand-km offset from Earth's center.
        assert!((topo.0 - target.0).norm() > 1000.0);
    }

    #[test]
    fn azimuth_wraps_into_0_360() {
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let observer = transit_geometry::geodetic_to_ecef(0.0, 0.0, 0.0);
        let target = EciVector::new(0.0, 0.0, 50_000.0);
        let look = look_angles(&observer, &target, t);
        assert!((0.0..360.0).contains(&look.azimuth_deg));
    }
}
