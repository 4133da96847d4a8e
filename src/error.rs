//! Error taxonomy.
//!
//! Domain errors are typed with `thiserror`; application-level context on
//! top of them uses `anyhow` in `main`. All variants propagate unrecovered
//! to the outermost handler, which reports them and exits. There is no
//! automatic retry: the user is expected to change inputs and re-run.

use crate::models::SessionKind;
use thiserror::Error;

/// Errors produced by the results aggregator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    /// The provider returned zero records. Rendering KPIs on an empty table
    /// is undefined, so the whole request is rejected up front.
    #[error("the session returned an empty result set; nothing to aggregate")]
    EmptyResultSet,

    /// A record failed validation. The message names the entrant to aid
    /// diagnosis.
    #[error("invalid result record for driver '{driver}': {reason}")]
    InvalidRecord { driver: String, reason: String },
}

/// Errors produced by the session data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The data source could not be reached or answered with an error.
    #[error("data provider unavailable: {detail}")]
    Unavailable { detail: String },

    /// The provider has no session for the requested coordinates.
    #[error("no data for season {season}, round {round}, session {session}")]
    NoData {
        season: u16,
        round: u8,
        session: SessionKind,
    },

    /// The response arrived but did not parse into the expected shape.
    #[error("malformed provider response: {detail}")]
    Malformed { detail: String },
}
