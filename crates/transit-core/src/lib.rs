//! Transit/conjunction prediction core: given an observer, a time window,
//! and a set of satellite TLEs, finds every moment a satellite's apparent
//! position crosses or nears the Sun or Moon's disc.
//!
//! The pipeline: [`pass`] identifies candidate passes on a coarse grid,
//! [`refine`] locates and tightens each pass's closest approach to a body,
//! [`classify`] tags and derives secondary quantities, and [`search`]
//! optionally repeats the whole thing across a grid of nearby observer
//! locations. [`query`] wires it all together; [`evaluate`] holds the
//! single-observer, single-satellite pipeline both paths share.

pub mod classify;
pub mod collaborators;
pub mod evaluate;
pub mod model;
pub mod pass;
pub mod query;
pub mod refine;
pub mod scene;
pub mod search;

pub use collaborators::{ConstantElevation, ElevationLookup, FileTleSource, TleSource};
pub use model::{
    Body, Event, EventKind, GridAttachment, GridElevationMode, Observer, QueryOutcome,
    QueryParams, RefinedMinimum, SatelliteInput, SearchMode, TransitError,
};
pub use query::{run_query, run_query_with_elevation};
