//! Low-precision analytic ephemeris for the Sun and Moon, geocentric
//! Cartesian, in the mean-equator-of-date frame.
//!
//! This is a dependency-free implementation of the truncated periodic-term
//! series in Jean Meeus, *Astronomical Algorithms* (2nd ed.): Ch. 25 for the
//! Sun (mean anomaly, equation of center, orbital eccentricity) and Ch. 47
//! for the Moon (leading ~20 terms of Tables 47.A/47.B). Accuracy is on the
//! order of arcminutes for the Sun and a few arcminutes for the Moon, which
//! is sufficient against solar/lunar disc radii of tens of arcminutes.
//!
//! There is no tabulated data file and no I/O: every function here is a
//! pure function of time.

use chrono::{DateTime, Utc};
use transit_geometry::EciVector;

pub const SUN_RADIUS_KM: f64 = 696_340.0;
pub const MOON_RADIUS_KM: f64 = 1_737.4;
const AU_KM: f64 = 149_597_870.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    Sun,
    Moon,
}

impl Body {
    pub fn radius_km(self) -> f64 {
        match self {
            Body::Sun => SUN_RADIUS_KM,
            Body::Moon => MOON_RADIUS_KM,
        }
    }
}

/// Geocentric position of `body` at `t`, in km, mean-equator-of-date frame.
pub fn position_km(body: Body, t: DateTime<Utc>) -> EciVector {
    match body {
        Body::Sun => sun_position_km(t),
        Body::Moon => moon_position_km(t),
    }
}

pub fn sun_position_km(t: DateTime<Utc>) -> EciVector {
    let jd = julian_date(t);
    let jc = julian_century(jd);
    let (lambda_deg, distance_km) = sun_ecliptic(jc);
    let obliquity_deg = mean_obliquity_deg(jc);
    let (ra_deg, dec_deg) = ecliptic_to_equatorial(lambda_deg, 0.0, obliquity_deg);
    equatorial_to_eci(ra_deg, dec_deg, distance_km)
}

pub fn moon_position_km(t: DateTime<Utc>) -> EciVector {
    let jd = julian_date(t);
    let jc = julian_century(jd);
    let (lon_deg, lat_deg, distance_km) = moon_ecliptic(jc);
    let obliquity_deg = mean_obliquity_deg(jc);
    let (ra_deg, dec_deg) = ecliptic_to_equatorial(lon_deg, lat_deg, obliquity_deg);
    equatorial_to_eci(ra_deg, dec_deg, distance_km)
}

/// Julian Date (UT) for a UTC instant.
pub fn julian_date(t: DateTime<Utc>) -> f64 {
    let unix_s = t.timestamp() as f64 + t.timestamp_subsec_nanos() as f64 / 1e9;
    unix_s / 86400.0 + 2_440_587.5
}

/// Julian centuries since J2000.0.
pub fn julian_century(jd: f64) -> f64 {
    (jd - 2_451_545.0) / 36525.0
}

fn normalize_degrees(deg: f64) -> f64 {
    let d = deg % 360.0;
    if d < 0.0 {
        d + 360.0
    } else {
        d
    }
}

/// Mean obliquity of the ecliptic, degrees (Meeus 22.2).
fn mean_obliquity_deg(t: f64) -> f64 {
    23.0 + 26.0 / 60.0 + 21.448 / 3600.0
        - (46.8150 * t + 0.00059 * t * t - 0.001813 * t * t * t) / 3600.0
}

/// Sun mean anomaly, degrees.
fn sun_mean_anomaly_deg(t: f64) -> f64 {
    normalize_degrees(357.52911 + 35999.05029 * t - 0.0001537 * t * t)
}

/// Sun geometric mean longitude, degrees.
fn sun_mean_longitude_deg(t: f64) -> f64 {
    normalize_degrees(280.46646 + 36000.76983 * t + 0.0003032 * t * t)
}

/// Earth orbit eccentricity.
fn earth_eccentricity(t: f64) -> f64 {
    0.016708634 - 0.000042037 * t - 0.0000001267 * t * t
}

/// Sun ecliptic longitude (degrees) and geocentric distance (km).
fn sun_ecliptic(t: f64) -> (f64, f64) {
    let l0 = sun_mean_longitude_deg(t);
    let m = sun_mean_anomaly_deg(t);
    let m_rad = m.to_radians();

    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m_rad.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m_rad).sin()
        + 0.000289 * (3.0 * m_rad).sin();

    let true_longitude = l0 + c;
    let true_anomaly_rad = (m + c).to_radians();

    let e = earth_eccentricity(t);
    let distance_au = 1.000001018 * (1.0 - e * e) / (1.0 + e * true_anomaly_rad.cos());

    (normalize_degrees(true_longitude), distance_au * AU_KM)
}

/// Periodic terms for Moon longitude/distance, Meeus Table 47.A (leading 20).
/// (D, M, Mp, F, coeff_l [1e-6 deg], coeff_r [1e-3 km])
const TERMS_LR: [(f64, f64, f64, f64, f64, f64); 20] = [
    (0.0, 0.0, 1.0, 0.0, 6_288_774.0, -20_905_355.0),
    (2.0, 0.0, -1.0, 0.0, 1_274_027.0, -3_699_111.0),
    (2.0, 0.0, 0.0, 0.0, 658_314.0, -2_955_968.0),
    (0.0, 0.0, 2.0, 0.0, 213_618.0, -569_925.0),
    (0.0, 1.0, 0.0, 0.0, -185_116.0, 48_888.0),
    (0.0, 0.0, 0.0, 2.0, -114_332.0, -3_149.0),
    (2.0, 0.0, -2.0, 0.0, 58_793.0, 246_158.0),
    (2.0, -1.0, -1.0, 0.0, 57_066.0, -152_138.0),
    (2.0, 0.0, 1.0, 0.0, 53_322.0, -170_733.0),
    (2.0, -1.0, 0.0, 0.0, 45_758.0, -204_586.0),
    (0.0, 1.0, -1.0, 0.0, -40_923.0, -129_620.0),
    (1.0, 0.0, 0.0, 0.0, -34_720.0, 108_743.0),
    (0.0, 1.0, 1.0, 0.0, -30_383.0, 104_755.0),
    (2.0, 0.0, 0.0, -2.0, 15_327.0, 10_321.0),
    (0.0, 0.0, 1.0, 2.0, -12_528.0, 0.0),
    (0.0, 0.0, 1.0, -2.0, 10_980.0, 79_661.0),
    (4.0, 0.0, -1.0, 0.0, 10_675.0, -34_782.0),
    (0.0, 0.0, 3.0, 0.0, 10_034.0, -23_210.0),
    (4.0, 0.0, -2.0, 0.0, 8_548.0, -21_636.0),
    (2.0, 1.0, -1.0, 0.0, -7_888.0, 24_208.0),
];

/// Periodic terms for Moon latitude, Meeus Table 47.B (leading 20).
const TERMS_B: [(f64, f64, f64, f64, f64); 20] = [
    (0.0, 0.0, 0.0, 1.0, 5_128_122.0),
    (0.0, 0.0, 1.0, 1.0, 280_602.0),
    (0.0, 0.0, 1.0, -1.0, 277_693.0),
    (2.0, 0.0, 0.0, -1.0, 173_237.0),
    (2.0, 0.0, -1.0, 1.0, 55_413.0),
    (2.0, 0.0, -1.0, -1.0, 46_271.0),
    (2.0, 0.0, 0.0, 1.0, 32_573.0),
    (0.0, 0.0, 2.0, 1.0, 17_198.0),
    (2.0, 0.0, 1.0, -1.0, 9_266.0),
    (0.0, 0.0, 2.0, -1.0, 8_822.0),
    (2.0, -1.0, 0.0, -1.0, 8_216.0),
    (2.0, 0.0, -2.0, -1.0, 4_324.0),
    (2.0, 0.0, 1.0, 1.0, 4_200.0),
    (2.0, 1.0, 0.0, -1.0, -3_359.0),
    (2.0, -1.0, -1.0, 1.0, 2_463.0),
    (2.0, -1.0, 0.0, 1.0, 2_211.0),
    (2.0, -1.0, -1.0, -1.0, 2_065.0),
    (0.0, 1.0, -1.0, -1.0, -1_870.0),
    (4.0, 0.0, -1.0, -1.0, 1_828.0),
    (0.0, 1.0, 0.0, 1.0, -1_794.0),
];

fn moon_mean_longitude_deg(t: f64) -> f64 {
    normalize_degrees(
        218.3164477 + 481267.88123421 * t - 0.0015786 * t * t + t * t * t / 538_841.0
            - t * t * t * t / 65_194_000.0,
    )
}

fn moon_mean_elongation_deg(t: f64) -> f64 {
    normalize_degrees(
        297.8501921 + 445267.1114034 * t - 0.0018819 * t * t + t * t * t / 545_868.0
            - t * t * t * t / 113_065_000.0,
    )
}

fn moon_mean_anomaly_deg(t: f64) -> f64 {
    normalize_degrees(
        134.9633964 + 477198.8675055 * t + 0.0087414 * t * t + t * t * t / 69_699.0
            - t * t * t * t / 14_712_000.0,
    )
}

fn moon_argument_of_latitude_deg(t: f64) -> f64 {
    normalize_degrees(
        93.2720950 + 483202.0175233 * t - 0.0036539 * t * t - t * t * t / 3_526_000.0
            + t * t * t * t / 863_310_000.0,
    )
}

/// Moon ecliptic longitude (deg), latitude (deg), and geocentric distance (km).
fn moon_ecliptic(t: f64) -> (f64, f64, f64) {
    let lp = moon_mean_longitude_deg(t);
    let d = moon_mean_elongation_deg(t);
    let m = sun_mean_anomaly_deg(t);
    let mp = moon_mean_anomaly_deg(t);
    let f = moon_argument_of_latitude_deg(t);

    // Earth orbit eccentricity correction applied to M-dependent terms.
    let e = 1.0 - 0.002516 * t - 0.0000074 * t * t;
    let e2 = e * e;

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for &(td, tm, tmp, tf, cl, cr) in &TERMS_LR {
        let arg = (td * d + tm * m + tmp * mp + tf * f).to_radians();
        let e_factor = match tm.abs() as i32 {
            1 => e,
            2 => e2,
            _ => 1.0,
        };
        sum_l += cl * e_factor * arg.sin();
        sum_r += cr * e_factor * arg.cos();
    }

    let mut sum_b = 0.0;
    for &(td, tm, tmp, tf, cb) in &TERMS_B {
        let arg = (td * d + tm * m + tmp * mp + tf * f).to_radians();
        let e_factor = match tm.abs() as i32 {
            1 => e,
            2 => e2,
            _ => 1.0,
        };
        sum_b += cb * e_factor * arg.sin();
    }

    let a1 = normalize_degrees(119.75 + 131.849 * t);
    let a2 = normalize_degrees(53.09 + 479264.290 * t);
    let a3 = normalize_degrees(313.45 + 481266.484 * t);

    sum_l += 3958.0 * a1.to_radians().sin();
    sum_l += 1962.0 * (lp - f).to_radians().sin();
    sum_l += 318.0 * a2.to_radians().sin();

    sum_b += -2235.0 * lp.to_radians().sin();
    sum_b += 382.0 * a3.to_radians().sin();
    sum_b += 175.0 * (a1 - f).to_radians().sin();
    sum_b += 175.0 * (a1 + f).to_radians().sin();
    sum_b += 127.0 * (lp - mp).to_radians().sin();
    sum_b += -115.0 * (lp + mp).to_radians().sin();

    let longitude = normalize_degrees(lp + sum_l / 1_000_000.0);
    let latitude = sum_b / 1_000_000.0;
    let distance_km = 385_000.56 + sum_r / 1000.0;

    (longitude, latitude, distance_km)
}

/// Ecliptic to equatorial coordinates, degrees in, degrees out.
fn ecliptic_to_equatorial(lon_deg: f64, lat_deg: f64, obliquity_deg: f64) -> (f64, f64) {
    let lon = lon_deg.to_radians();
    let lat = lat_deg.to_radians();
    let obl = obliquity_deg.to_radians();

    let ra = (lon.sin() * obl.cos() - lat.tan() * obl.sin()).atan2(lon.cos());
    let dec = (lat.sin() * obl.cos() + lat.cos() * obl.sin() * lon.sin()).asin();

    (normalize_degrees(ra.to_degrees()), dec.to_degrees())
}

fn equatorial_to_eci(ra_deg: f64, dec_deg: f64, distance_km: f64) -> EciVector {
    let ra = ra_deg.to_radians();
    let dec = dec_deg.to_radians();
    let x = distance_km * dec.cos() * ra.cos();
    let y = distance_km * dec.cos() * ra.sin();
    let z = distance_km * dec.sin();
    EciVector::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn moon_ecliptic_matches_meeus_example_47a() {
        // Meeus Example 47.a: 1992 April 12, 0h TD.
        let dt = Utc.with_ymd_and_hms(1992, 4, 12, 0, 0, 0).unwrap();
        let jd = julian_date(dt);
        let t = julian_century(jd);
        let (lon, lat, dist) = moon_ecliptic(t);
        assert!((lon - 133.167).abs() < 0.5, "lon = {lon}");
        assert!((lat - (-3.229)).abs() < 0.5, "lat = {lat}");
        assert!((dist - 368_409.7).abs() < 2000.0, "dist = {dist}");
    }

    #[test]
    fn sun_distance_is_about_one_au() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let EciVector(v) = sun_position_km(dt);
        let r = v.norm();
        assert!((r - AU_KM).abs() / AU_KM < 0.02, "r = {r} km");
    }

    #[test]
    fn moon_distance_is_plausible() {
        let dt = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let EciVector(v) = moon_position_km(dt);
        let r = v.norm();
        assert!((350_000.0..410_000.0).contains(&r), "r = {r} km");
    }

    #[test]
    fn ephemeris_is_a_pure_function_of_time() {
        let dt = Utc.with_ymd_and_hms(2025, 10, 5, 3, 17, 42).unwrap();
        let a = sun_position_km(dt);
        let b = sun_position_km(dt);
        assert_eq!(a, b);
    }
}
