//! Geometry kernel: vector angles, angular radii, chord durations, and
//! WGS-84 geodetic/ECEF conversions shared by every other crate in this
//! workspace.
//!
//! The frame newtypes ([`EcefVector`], [`EciVector`]) exist so a satellite
//! position and a body position can never be compared unless both have been
//! brought into the same frame first — see `transit-topo` for the reducer
//! that performs that conversion.

use nalgebra::Vector3;

/// WGS-84 semi-major axis, km.
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS-84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// A position expressed in Earth-Centered Earth-Fixed coordinates (km).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EcefVector(pub Vector3<f64>);

/// A position expressed in the shared geocentric inertial frame (km) used
/// to compare satellites against the Sun and Moon. See `transit-ephemeris`
/// and `transit-propagation` for producers, and `transit-topo` for the
/// reducer that converts [`EcefVector`] observers into this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EciVector(pub Vector3<f64>);

impl EciVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }
}

/// Angle between two 3-vectors, in radians. Tolerates collinear and
/// antiparallel inputs without producing NaN.
pub fn angle(u: &Vector3<f64>, v: &Vector3<f64>) -> f64 {
    let denom = u.norm() * v.norm();
    let cos_theta = (u.dot(v) / denom).clamp(-1.0, 1.0);
    cos_theta.acos()
}

/// Angular separation between two ECI-frame vectors, in degrees.
pub fn angular_separation_deg(a: &EciVector, b: &EciVector) -> f64 {
    angle(&a.0, &b.0).to_degrees()
}

/// Apparent angular radius of a body of physical radius `radius_km` seen
/// from distance `distance_km`, in degrees. Clamps the ratio to 1 to guard
/// against pathologically small distances.
pub fn angular_radius_deg(radius_km: f64, distance_km: f64) -> f64 {
    (radius_km / distance_km).min(1.0).asin().to_degrees()
}

/// Duration a satellite spends projected onto a disc of angular radius
/// `disc_deg`, given closest-approach separation `sep_deg` and angular
/// speed `speed_deg_per_s`. Returns 0 when the satellite never crosses the
/// disc or is not moving. Uses the chord through the closest-approach
/// point, not a naive `2 * disc / speed` estimate.
pub fn chord_duration_s(sep_deg: f64, disc_deg: f64, speed_deg_per_s: f64) -> f64 {
    if speed_deg_per_s <= 0.0 || sep_deg > disc_deg {
        return 0.0;
    }
    let chord_deg = 2.0 * (disc_deg * disc_deg - sep_deg * sep_deg).max(0.0).sqrt();
    chord_deg / speed_deg_per_s
}

/// Convert a geodetic position (degrees, degrees, meters above the
/// ellipsoid) to ECEF (km), WGS-84.
pub fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, elev_m: f64) -> EcefVector {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let elev_km = elev_m / 1000.0;

    let e2 = WGS84_F * (2.0 - WGS84_F);
    let n = WGS84_A_KM / (1.0 - e2 * lat.sin().powi(2)).sqrt();

    let x = (n + elev_km) * lat.cos() * lon.cos();
    let y = (n + elev_km) * lat.cos() * lon.sin();
    let z = (n * (1.0 - e2) + elev_km) * lat.sin();

    EcefVector(Vector3::new(x, y, z))
}

/// Inverse of [`geodetic_to_ecef`]: recovers (lat_deg, lon_deg, elev_m) from
/// an ECEF position (km), via Bowring's iterative method. Converges to
/// sub-millimeter accuracy within a handful of iterations for any elevation
/// reachable by an Earth satellite.
pub fn ecef_to_geodetic(ecef: &EcefVector) -> (f64, f64, f64) {
    let (x, y, z) = (ecef.0.x, ecef.0.y, ecef.0.z);
    let lon = y.atan2(x);

    let p = (x * x + y * y).sqrt();
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let mut lat = (z / (p * (1.0 - e2))).atan();

    let mut n = WGS84_A_KM;
    let mut elev_km = 0.0;
    for _ in 0..8 {
        n = WGS84_A_KM / (1.0 - e2 * lat.sin().powi(2)).sqrt();
        elev_km = p / lat.cos() - n;
        lat = (z / p * (1.0 - e2 * n / (n + elev_km)).recip()).atan();
    }

    (lat.to_degrees(), lon.to_degrees(), elev_km * 1000.0)
}
