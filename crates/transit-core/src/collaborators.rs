//! Injectable collaborators. No networked implementation ships here; the
//! core depends only on the trait, never on an HTTP client.

use std::fs;
use std::path::PathBuf;

use crate::model::CollaboratorError;

/// Supplies a TLE pair for a satellite designator (e.g. a NORAD id or name).
pub trait TleSource {
    fn fetch(&self, designator: &str) -> Result<(String, String), CollaboratorError>;
}

/// Looks up terrain elevation for a grid candidate point. Used only by the
/// grid searcher's `Lookup` mode; callers fall back to base elevation on
/// `Err`.
pub trait ElevationLookup {
    fn elevation_m(&self, lat: f64, lon: f64) -> Result<f64, CollaboratorError>;
}

/// Reads TLEs from local two-line files named `<designator>.tle`, containing
/// exactly two 69-character lines. Enough to exercise the core and the CLI
/// without a network dependency; an HTTPS Celestrak fetcher is explicitly
/// out of scope.
pub struct FileTleSource {
    dir: PathBuf,
}

impl FileTleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, designator: &str) -> PathBuf {
        self.dir.join(format!("{designator}.tle"))
    }
}

impl TleSource for FileTleSource {
    fn fetch(&self, designator: &str) -> Result<(String, String), CollaboratorError> {
        let path = self.path_for(designator);
        let contents = fs::read_to_string(&path)
            .map_err(|e| CollaboratorError(format!("reading {}: {e}", path.display())))?;

        let mut lines = contents.lines().filter(|l| !l.trim().is_empty());
        let line1 = lines
            .next()
            .ok_or_else(|| CollaboratorError(format!("{}: missing TLE line 1", path.display())))?
            .to_string();
        let line2 = lines
            .next()
            .ok_or_else(|| CollaboratorError(format!("{}: missing TLE line 2", path.display())))?
            .to_string();

        Ok((line1, line2))
    }
}

/// A test/demo elevation source backed by a fixed value, useful as a
/// drop-in when no real terrain service is available.
pub struct ConstantElevation(pub f64);

impl ElevationLookup for ConstantElevation {
    fn elevation_m(&self, _lat: f64, _lon: f64) -> Result<f64, CollaboratorError> {
        Ok(self.0)
    }
}
