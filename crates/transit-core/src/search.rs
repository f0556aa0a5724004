//! Grid searcher (component H): builds the radial grid of candidate
//! observer locations used when `search_mode == Grid`.

use crate::collaborators::ElevationLookup;
use crate::model::{GridElevationMode, Observer};

const KM_PER_DEG_LAT: f64 = 111.32;

#[derive(Debug, Clone, Copy)]
pub struct GridPoint {
    pub observer: Observer,
    pub distance_km: f64,
}

/// Radial grid of candidate observer points around `base`, out to
/// `r_max_km` in steps of `step_km`. At `d = 0` the only point is `base`
/// itself; at `d > 0`, `max(8, ceil(2*pi*d/step_km))` azimuthal samples
/// ring the base at that radius.
pub fn build_grid(
    base: Observer,
    step_km: f64,
    r_max_km: f64,
    elev_mode: GridElevationMode,
    elevation: Option<&dyn ElevationLookup>,
) -> Vec<GridPoint> {
    let mut points = vec![GridPoint {
        observer: base,
        distance_km: 0.0,
    }];

    let max_k = (r_max_km / step_km).floor() as i64;
    for k in 1..=max_k.max(0) {
        let d = k as f64 * step_km;
        let n_theta = (8.0_f64).max((2.0 * std::f64::consts::PI * d / step_km).ceil());
        let n_theta = n_theta as usize;

        for j in 0..n_theta {
            let theta = 2.0 * std::f64::consts::PI * j as f64 / n_theta as f64;
            let dlat = (d / KM_PER_DEG_LAT) * theta.cos();
            let dlon = (d / (KM_PER_DEG_LAT * base.lat_deg.to_radians().cos())) * theta.sin();

            let lat_deg = base.lat_deg + dlat;
            let lon_deg = base.lon_deg + dlon;

            let elev_m = match elev_mode {
                GridElevationMode::Base => base.elev_m,
                GridElevationMode::Lookup => elevation
                    .and_then(|e| match e.elevation_m(lat_deg, lon_deg) {
                        Ok(elev) => Some(elev),
                        Err(err) => {
                            tracing::warn!(lat_deg, lon_deg, %err, "elevation lookup failed, falling back to base elevation");
                            None
                        }
                    })
                    .unwrap_or(base.elev_m),
            };

            points.push(GridPoint {
                observer: Observer {
                    lat_deg,
                    lon_deg,
                    elev_m,
                },
                distance_km: d,
            });
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GridElevationMode;

    #[test]
    fn d_zero_point_is_exactly_base() {
        let base = Observer {
            lat_deg: 48.8566,
            lon_deg: 2.3522,
            elev_m: 35.0,
        };
        let grid = build_grid(base, 2.0, 10.0, GridElevationMode::Base, None);
        assert_eq!(grid[0].distance_km, 0.0);
        assert_eq!(grid[0].observer.lat_deg, base.lat_deg);
    }

    #[test]
    fn grid_grows_with_radius() {
        let base = Observer {
            lat_deg: 0.0,
            lon_deg: 0.0,
            elev_m: 0.0,
        };
        let small = build_grid(base, 2.0, 4.0, GridElevationMode::Base, None);
        let large = build_grid(base, 2.0, 20.0, GridElevationMode::Base, None);
        assert!(large.len() > small.len());
    }

    #[test]
    fn lookup_mode_falls_back_to_base_elevation_on_failure() {
        struct AlwaysFails;
        impl ElevationLookup for AlwaysFails {
            fn elevation_m(&self, _lat: f64, _lon: f64) -> Result<f64, crate::model::CollaboratorError> {
                Err(crate::model::CollaboratorError("unreachable".into()))
            }
        }

        let base = Observer {
            lat_deg: 10.0,
            lon_deg: 10.0,
            elev_m: 123.0,
        };
        let grid = build_grid(base, 2.0, 4.0, GridElevationMode::Lookup, Some(&AlwaysFails));
        assert!(grid.iter().skip(1).all(|p| p.observer.elev_m == 123.0));
    }
}
