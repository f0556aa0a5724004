//! Runs components E–G (pass scan, refine, classify) for one satellite
//! against one observer. Used both for the single-observer query and, once
//! per candidate point, by the grid searcher.

use chrono::{DateTime, Utc};
use transit_propagation::{Propagator, PropagatorError};

use crate::classify::{angular_speed_deg_per_s, apparent_angular_size_arcsec, classify};
use crate::model::{
    Body, Event, GridAttachment, Observer, QueryParams, RefinedMinimum, SatelliteInput,
    TransitError,
};
use crate::pass::find_passes;
use crate::refine::refine_minimum;
use crate::scene::Scene;

fn to_transit_error(satellite: &str, e: PropagatorError) -> TransitError {
    match e {
        PropagatorError::InvalidTle(message) => TransitError::TleParseError {
            satellite: satellite.to_string(),
            message,
        },
        PropagatorError::PropagationFailed(message) => TransitError::PropagatorError {
            satellite: satellite.to_string(),
            message,
        },
    }
}

const BODIES: [Body; 2] = [Body::Sun, Body::Moon];

/// Full single-observer pipeline for one satellite: propagate across the
/// coarse grid, find passes, refine each (pass, body), classify, and
/// derive speed/duration/angular size. `grid` is attached to every
/// produced event verbatim (or omitted with `None` for the base,
/// non-grid query).
pub fn events_for_observer(
    observer: Observer,
    coarse_times: &[DateTime<Utc>],
    params: &QueryParams,
    satellite: &SatelliteInput,
    grid: Option<GridAttachment>,
) -> Result<Vec<Event>, TransitError> {
    if coarse_times.is_empty() {
        return Ok(Vec::new());
    }

    let propagator = Propagator::from_tle(&satellite.tle_line1, &satellite.tle_line2)
        .map_err(|e| to_transit_error(&satellite.name, e))?;

    let observer_ecef = transit_geometry::geodetic_to_ecef(
        observer.lat_deg,
        observer.lon_deg,
        observer.elev_m,
    );

    let mut altitudes = Vec::with_capacity(coarse_times.len());
    for &t in coarse_times {
        let look = transit_topo::look_angles(
            &observer_ecef,
            &propagator
                .position(t)
                .map_err(|e| to_transit_error(&satellite.name, e))?,
            t,
        );
        altitudes.push(look.altitude_deg);
    }

    let passes = find_passes(&altitudes, params.alt_min_deg);
    let window_start = *coarse_times.first().unwrap();
    let window_end = *coarse_times.last().unwrap();

    let mut events = Vec::new();
    for (i_start, i_end) in passes {
        let pass_times = &coarse_times[i_start..=i_end];

        for &body in &BODIES {
            let scene = Scene {
                satellite_name: &satellite.name,
                observer_ecef,
                satellite: &propagator,
                body,
            };

            let Some(refined): Option<RefinedMinimum> = refine_minimum(
                &scene,
                pass_times,
                params.near_margin_deg,
                params.fine_step_s,
                params.refine_window_s,
                window_start,
                window_end,
            )?
            else {
                continue;
            };

            let Some(kind) = classify(
                &refined,
                params.alt_min_deg,
                params.near_margin_deg,
                params.search_mode,
                params.max_distance_km,
            ) else {
                continue;
            };

            let speed_deg_per_s = angular_speed_deg_per_s(&scene, refined.t, params.fine_step_s)?;

            let duration_s = match kind {
                crate::model::EventKind::Transit => Some(transit_geometry::chord_duration_s(
                    refined.sep_deg,
                    refined.disc_radius_deg,
                    speed_deg_per_s,
                )),
                _ => None,
            };

            let sat_angular_size_arcsec =
                apparent_angular_size_arcsec(satellite.resolved_dimension_m(), refined.sat_range_km);

            events.push(Event {
                time_utc: refined.t,
                satellite: satellite.name.clone(),
                body,
                kind,
                separation_arcmin: refined.sep_deg * 60.0,
                target_radius_arcmin: refined.disc_radius_deg * 60.0,
                sat_alt_deg: refined.sat_alt_deg,
                sat_az_deg: refined.sat_az_deg,
                sat_distance_km: refined.sat_range_km,
                target_alt_deg: refined.body_alt_deg,
                speed_deg_per_s,
                speed_arcmin_per_s: speed_deg_per_s * 60.0,
                duration_s,
                sat_angular_size_arcsec,
                grid,
            });
        }
    }

    Ok(events)
}
