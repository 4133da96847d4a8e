//! Data models for the session dashboard.
//!
//! This module contains all the core data structures used throughout
//! the application for representing raw session results and the
//! derived views computed from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an on-track session within a Grand Prix weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// The Grand Prix itself.
    Race,
    /// Qualifying (ranked by lap time, not points).
    Qualifying,
    /// Free Practice 1
    Practice1,
    /// Free Practice 2
    Practice2,
    /// Free Practice 3
    Practice3,
}

impl SessionKind {
    /// Short session code used in filenames and cache keys.
    pub fn code(&self) -> &'static str {
        match self {
            SessionKind::Race => "R",
            SessionKind::Qualifying => "Q",
            SessionKind::Practice1 => "FP1",
            SessionKind::Practice2 => "FP2",
            SessionKind::Practice3 => "FP3",
        }
    }

    /// Whether the Ergast-style API carries a classification for this kind.
    ///
    /// Practice classifications are not part of the Ergast schema.
    pub fn has_provider_data(&self) -> bool {
        matches!(self, SessionKind::Race | SessionKind::Qualifying)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Race => write!(f, "Race"),
            SessionKind::Qualifying => write!(f, "Qualifying"),
            SessionKind::Practice1 => write!(f, "Practice 1"),
            SessionKind::Practice2 => write!(f, "Practice 2"),
            SessionKind::Practice3 => write!(f, "Practice 3"),
        }
    }
}

/// One raw per-entrant result row, as delivered by the provider.
///
/// `status` is provider vocabulary ("Finished", "DNF", "+1 Lap", ...) and is
/// only ever compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResultRecord {
    /// Finishing position; `None` for non-classified entrants.
    pub position: Option<u32>,
    /// Human-readable driver label, unique within one session.
    pub driver: String,
    /// Constructor/team label.
    pub team: String,
    /// Finishing status string.
    pub status: String,
    /// Points awarded for the session.
    pub points: f64,
    /// Laps completed.
    pub laps: u32,
}

/// Metadata identifying one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Event name as reported by the provider (e.g. "Monaco Grand Prix").
    pub event_name: String,
    /// Season year.
    pub season: u16,
    /// Round number within the season.
    pub round: u8,
    /// Which session of the weekend.
    pub session_kind: SessionKind,
}

/// One row of the base table: the projection of a raw record kept in
/// classification order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub position: Option<u32>,
    pub driver: String,
    pub team: String,
    pub status: String,
    pub points: f64,
    pub laps: u32,
}

impl ResultRow {
    /// Position column as displayed: the ordinal, or "NC" when not classified.
    pub fn position_label(&self) -> String {
        match self.position {
            Some(p) => p.to_string(),
            None => "NC".to_string(),
        }
    }
}

/// The four scalar KPIs shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Number of classified entrants.
    pub entrant_count: usize,
    /// Driver of the first row in classification order.
    pub winner_driver: String,
    /// Team of the first row in classification order.
    pub winner_team: String,
    /// Rows whose status is exactly "Finished".
    pub finished_count: usize,
}

/// One entry of the points-by-driver ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverPoints {
    pub driver: String,
    pub team: String,
    pub points: f64,
}

/// One entry of the constructor ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorStanding {
    pub team: String,
    pub total_points: f64,
}

/// Everything the presentation layer needs, freshly computed per request.
///
/// The export payload is `base_table` itself: same shape, same row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedView {
    /// Rows in the provider's classification order.
    pub base_table: Vec<ResultRow>,
    pub kpis: Kpis,
    /// Sorted by points descending, stable on ties.
    pub points_by_driver: Vec<DriverPoints>,
    /// One row per distinct team, sorted by summed points descending.
    pub constructor_ranking: Vec<ConstructorStanding>,
}

/// Format a points value the way timing screens do: no trailing ".0" for
/// integral scores, one decimal otherwise (half points exist, e.g. 12.5).
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{}", points as i64)
    } else {
        format!("{:.1}", points)
    }
}
