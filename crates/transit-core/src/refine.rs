//! Minimum finder & refiner (component F).

use chrono::{DateTime, Utc};
use transit_propagation::SatellitePositionSource;

use crate::model::{RefinedMinimum, TransitError};
use crate::scene::Scene;

/// 2-degree buffer added to a body's pre-filter radius before the early
/// reject, on top of the configured near margin.
const PREFILTER_BUFFER_DEG: f64 = 2.0;

/// Refines the angular-separation minimum within `times` (a pass interval's
/// coarse-grid sub-slice). Returns `None` if the coarse minimum is pruned
/// by the early-reject pre-filter. The fine grid is clamped to
/// `[window_start, window_end]` so a refined minimum never escapes the
/// query window even when its pass straddles a boundary (invariant 14).
pub fn refine_minimum<S: SatellitePositionSource>(
    scene: &Scene<S>,
    times: &[DateTime<Utc>],
    near_margin_deg: f64,
    fine_step_s: f64,
    refine_window_s: f64,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<Option<RefinedMinimum>, TransitError> {
    if times.is_empty() {
        return Ok(None);
    }

    let mut coarse_seps = Vec::with_capacity(times.len());
    for &t in times {
        coarse_seps.push(scene.separation_deg(t)?);
    }

    let (j, &coarse_min) = coarse_seps
        .iter()
        .enumerate()
        .min_by(|(ia, a), (ib, b)| a.partial_cmp(b).unwrap().then(ib.cmp(ia)))
        .expect("times is non-empty");
    let t_j = times[j];

    let prefilter_bound =
        scene.body.prefilter_radius_deg() + near_margin_deg + PREFILTER_BUFFER_DEG;
    if coarse_min > prefilter_bound {
        return Ok(None);
    }

    let half_window = (refine_window_s / fine_step_s).floor() as i64;
    let mut best: Option<(DateTime<Utc>, f64)> = None;

    for k in -half_window..=half_window {
        let mut t = t_j + chrono::Duration::milliseconds((k as f64 * fine_step_s * 1000.0) as i64);
        if t < window_start {
            t = window_start;
        }
        if t > window_end {
            t = window_end;
        }

        let sep = scene.separation_deg(t)?;
        best = match best {
            None => Some((t, sep)),
            Some((_, best_sep)) if sep < best_sep => Some((t, sep)),
            keep => keep,
        };
    }

    let (t_star, sep_star) = best.expect("half_window >= 0 guarantees at least one sample");

    let sat_look = scene.satellite_look(t_star)?;
    let body_look = scene.body_look(t_star);
    let disc_radius_deg = scene.disc_radius_deg(t_star);

    Ok(Some(RefinedMinimum {
        t: t_star,
        sep_deg: sep_star,
        disc_radius_deg,
        sat_alt_deg: sat_look.altitude_deg,
        sat_az_deg: sat_look.azimuth_deg,
        body_alt_deg: body_look.altitude_deg,
        sat_range_km: sat_look.range_km,
    }))
}
