//! Top-level query orchestration: builds the coarse time grid, fans work
//! out across satellites (and, in grid mode, candidate observer points)
//! on `rayon`'s pool, and gathers a sorted, deduplicated event list.
//!
//! Work units are explicit structs (`SatelliteJob`, `GridJob`) passed into
//! `par_iter`, not closures capturing loop variables — each task owns the
//! inputs it needs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::collaborators::ElevationLookup;
use crate::evaluate::events_for_observer;
use crate::model::{
    Event, GridAttachment, Observer, QueryOutcome, QueryParams, SearchMode, TransitError,
};
use crate::search::build_grid;

struct SatelliteJob<'a> {
    satellite_index: usize,
    satellite: &'a crate::model::SatelliteInput,
}

struct GridJob<'a> {
    point_index: usize,
    observer: Observer,
    distance_km: f64,
    satellite_index: usize,
    satellite: &'a crate::model::SatelliteInput,
}

fn coarse_time_grid(params: &QueryParams) -> Vec<DateTime<Utc>> {
    let start = params.start;
    let end = params.end();

    if end <= start {
        return Vec::new();
    }

    let step_ms = (params.coarse_step_s * 1000.0) as i64;
    let total_ms = (end - start).num_milliseconds();
    let n_steps = total_ms / step_ms;

    (0..=n_steps)
        .map(|i| start + chrono::Duration::milliseconds(i * step_ms))
        .collect()
}

/// Runs a query with no elevation collaborator (grid elevation, if
/// requested, falls back to the base observer's elevation).
pub fn run_query(params: &QueryParams) -> QueryOutcome {
    run_query_with_elevation(params, None)
}

pub fn run_query_with_elevation(
    params: &QueryParams,
    elevation: Option<&dyn ElevationLookup>,
) -> QueryOutcome {
    if let Err(e) = params.validate() {
        return QueryOutcome {
            events: Vec::new(),
            errors: vec![("<query>".to_string(), e)],
        };
    }

    let coarse_times = coarse_time_grid(params);
    if coarse_times.is_empty() {
        return QueryOutcome::default();
    }

    let use_grid = params.search_mode == SearchMode::Grid && params.max_distance_km > 0.0;

    if use_grid {
        run_grid_query(params, &coarse_times, elevation)
    } else {
        run_base_query(params, &coarse_times)
    }
}

fn run_base_query(params: &QueryParams, coarse_times: &[DateTime<Utc>]) -> QueryOutcome {
    let jobs: Vec<SatelliteJob> = params
        .satellites
        .iter()
        .enumerate()
        .map(|(satellite_index, satellite)| SatelliteJob {
            satellite_index,
            satellite,
        })
        .collect();

    let results: Vec<Result<Vec<Event>, (String, TransitError)>> = jobs
        .par_iter()
        .map(|job| {
            tracing::debug!(satellite_index = job.satellite_index, satellite = %job.satellite.name, "evaluating satellite");
            events_for_observer(params.observer, coarse_times, params, job.satellite, None)
                .map_err(|e| (job.satellite.name.clone(), e))
        })
        .collect();

    gather(results)
}

fn run_grid_query(
    params: &QueryParams,
    coarse_times: &[DateTime<Utc>],
    elevation: Option<&dyn ElevationLookup>,
) -> QueryOutcome {
    let grid_points = build_grid(
        params.observer,
        params.grid_step_km,
        params.max_distance_km,
        params.grid_elev_mode,
        elevation,
    );

    let mut jobs = Vec::with_capacity(grid_points.len() * params.satellites.len());
    for (point_index, point) in grid_points.iter().enumerate() {
        for (satellite_index, satellite) in params.satellites.iter().enumerate() {
            jobs.push(GridJob {
                point_index,
                observer: point.observer,
                distance_km: point.distance_km,
                satellite_index,
                satellite,
            });
        }
    }

    let results: Vec<Result<Vec<Event>, (String, TransitError)>> = jobs
        .par_iter()
        .map(|job| {
            tracing::trace!(
                point_index = job.point_index,
                satellite_index = job.satellite_index,
                distance_km = job.distance_km,
                "evaluating grid point"
            );
            let grid = GridAttachment {
                lat: job.observer.lat_deg,
                lon: job.observer.lon_deg,
                elev: job.observer.elev_m,
                distance_km: job.distance_km,
            };
            events_for_observer(job.observer, coarse_times, params, job.satellite, Some(grid))
                .map_err(|e| (job.satellite.name.clone(), e))
        })
        .collect();

    let mut outcome = gather(results);
    outcome.events = dedup_by_min_distance(outcome.events);
    outcome
}

fn gather(results: Vec<Result<Vec<Event>, (String, TransitError)>>) -> QueryOutcome {
    let mut events = Vec::new();
    let mut errors = Vec::new();
    let mut failed_satellites = std::collections::HashSet::new();

    for result in results {
        match result {
            Ok(mut es) => events.append(&mut es),
            Err((name, e)) => {
                // Don't duplicate the same satellite's error once per grid
                // point; a bad TLE fails identically everywhere.
                if failed_satellites.insert(name.clone()) {
                    errors.push((name, e));
                }
            }
        }
    }

    events.sort_by_key(|e| e.time_utc);

    QueryOutcome { events, errors }
}

fn dedup_by_min_distance(events: Vec<Event>) -> Vec<Event> {
    let mut best: HashMap<(i64, crate::model::Body, crate::model::EventKind, String), Event> =
        HashMap::new();

    for event in events {
        let key = event.dedup_key();
        let distance = event.grid.map(|g| g.distance_km).unwrap_or(0.0);
        match best.get(&key) {
            Some(existing) => {
                let existing_distance = existing.grid.map(|g| g.distance_km).unwrap_or(0.0);
                if distance < existing_distance {
                    best.insert(key, event);
                }
            }
            None => {
                best.insert(key, event);
            }
        }
    }

    let mut out: Vec<Event> = best.into_values().collect();
    out.sort_by_key(|e| e.time_utc);
    out
}
