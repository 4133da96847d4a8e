//! Results aggregation.
//!
//! Transforms one session's raw per-driver records into the derived views
//! the dashboard needs: base table, KPIs, points-by-driver ranking,
//! constructor ranking. Pure and deterministic: no I/O, no clock, no state
//! shared between calls, so it can be invoked on every refresh and tested
//! without a provider or a terminal.

use crate::error::AggregateError;
use crate::models::{
    ConstructorStanding, DerivedView, DriverPoints, Kpis, RawResultRecord, ResultRow, SessionMeta,
};
use tracing::debug;

/// Status string that counts toward the "finished" KPI. Exact, case-sensitive
/// match against the provider vocabulary.
const STATUS_FINISHED: &str = "Finished";

/// Compute every derived view for one session.
///
/// Row order of `base_table` is the input order: the provider's
/// classification order, which puts the session winner at index 0. The
/// winner KPI reads that row directly rather than re-sorting by points,
/// because qualifying ranks by lap time and awards none.
///
/// Fails with [`AggregateError::EmptyResultSet`] on empty input and with
/// [`AggregateError::InvalidRecord`] on the first record that fails
/// validation. There is never a partial view: on error, nothing is returned.
pub fn aggregate(
    records: &[RawResultRecord],
    meta: &SessionMeta,
) -> Result<DerivedView, AggregateError> {
    if records.is_empty() {
        return Err(AggregateError::EmptyResultSet);
    }
    for record in records {
        validate_record(record)?;
    }

    debug!(
        "Aggregating {} records for {} ({} {})",
        records.len(),
        meta.event_name,
        meta.season,
        meta.session_kind
    );

    let base_table = build_base_table(records);
    let kpis = compute_kpis(&base_table);
    let points_by_driver = rank_drivers_by_points(&base_table);
    let constructor_ranking = rank_constructors(&base_table);

    Ok(DerivedView {
        base_table,
        kpis,
        points_by_driver,
        constructor_ranking,
    })
}

/// Reject records the provider should never produce but occasionally does.
fn validate_record(record: &RawResultRecord) -> Result<(), AggregateError> {
    if record.driver.is_empty() {
        return Err(AggregateError::InvalidRecord {
            driver: "<unnamed>".to_string(),
            reason: "empty driver name".to_string(),
        });
    }
    if record.team.is_empty() {
        return Err(AggregateError::InvalidRecord {
            driver: record.driver.clone(),
            reason: "empty team name".to_string(),
        });
    }
    if !record.points.is_finite() {
        return Err(AggregateError::InvalidRecord {
            driver: record.driver.clone(),
            reason: format!("non-finite points ({})", record.points),
        });
    }
    if record.points < 0.0 {
        return Err(AggregateError::InvalidRecord {
            driver: record.driver.clone(),
            reason: format!("negative points ({})", record.points),
        });
    }
    Ok(())
}

/// Project the raw records onto table rows, preserving input order exactly.
/// No row is dropped, added, or reordered here.
fn build_base_table(records: &[RawResultRecord]) -> Vec<ResultRow> {
    records
        .iter()
        .map(|r| ResultRow {
            position: r.position,
            driver: r.driver.clone(),
            team: r.team.clone(),
            status: r.status.clone(),
            points: r.points,
            laps: r.laps,
        })
        .collect()
}

/// The four headline numbers. Caller guarantees a non-empty table.
fn compute_kpis(base_table: &[ResultRow]) -> Kpis {
    let leader = &base_table[0];
    Kpis {
        entrant_count: base_table.len(),
        winner_driver: leader.driver.clone(),
        winner_team: leader.team.clone(),
        finished_count: base_table
            .iter()
            .filter(|row| row.status == STATUS_FINISHED)
            .count(),
    }
}

/// Stable sort by points descending. Drivers tied on points keep their
/// classification order, so chart output is reproducible run to run.
fn rank_drivers_by_points(base_table: &[ResultRow]) -> Vec<DriverPoints> {
    let mut ranking: Vec<DriverPoints> = base_table
        .iter()
        .map(|row| DriverPoints {
            driver: row.driver.clone(),
            team: row.team.clone(),
            points: row.points,
        })
        .collect();

    // Validated points are finite, so total_cmp matches partial order.
    ranking.sort_by(|a, b| b.points.total_cmp(&a.points));
    ranking
}

/// Group rows by exact team string, sum points per team, then stable sort
/// by total descending. Ties keep the order in which each team first
/// appears in the base table.
fn rank_constructors(base_table: &[ResultRow]) -> Vec<ConstructorStanding> {
    let mut standings: Vec<ConstructorStanding> = Vec::new();

    for row in base_table {
        match standings.iter_mut().find(|s| s.team == row.team) {
            Some(standing) => standing.total_points += row.points,
            None => standings.push(ConstructorStanding {
                team: row.team.clone(),
                total_points: row.points,
            }),
        }
    }

    standings.sort_by(|a, b| b.total_points.total_cmp(&a.total_points));
    standings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionKind;

    fn record(
        position: u32,
        driver: &str,
        team: &str,
        status: &str,
        points: f64,
        laps: u32,
    ) -> RawResultRecord {
        RawResultRecord {
            position: Some(position),
            driver: driver.to_string(),
            team: team.to_string(),
            status: status.to_string(),
            points,
            laps,
        }
    }

    fn meta() -> SessionMeta {
        SessionMeta {
            event_name: "Test Grand Prix".to_string(),
            season: 2023,
            round: 1,
            session_kind: SessionKind::Race,
        }
    }

    fn three_records() -> Vec<RawResultRecord> {
        vec![
            record(1, "A", "X", "Finished", 25.0, 58),
            record(2, "B", "Y", "Finished", 18.0, 58),
            record(3, "C", "X", "DNF", 0.0, 40),
        ]
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = aggregate(&[], &meta()).unwrap_err();
        assert_eq!(err, AggregateError::EmptyResultSet);
    }

    #[test]
    fn test_negative_points_rejected_naming_driver() {
        let mut records = three_records();
        records[1].points = -1.0;

        let err = aggregate(&records, &meta()).unwrap_err();
        match err {
            AggregateError::InvalidRecord { driver, reason } => {
                assert_eq!(driver, "B");
                assert!(reason.contains("negative"));
            }
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_points_rejected() {
        let mut records = three_records();
        records[0].points = f64::NAN;
        assert!(matches!(
            aggregate(&records, &meta()),
            Err(AggregateError::InvalidRecord { .. })
        ));

        records[0].points = f64::INFINITY;
        assert!(matches!(
            aggregate(&records, &meta()),
            Err(AggregateError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_base_table_preserves_input_order() {
        let view = aggregate(&three_records(), &meta()).unwrap();

        let drivers: Vec<&str> = view.base_table.iter().map(|r| r.driver.as_str()).collect();
        assert_eq!(drivers, vec!["A", "B", "C"]);
        assert_eq!(view.base_table.len(), 3);
        assert_eq!(view.base_table[2].status, "DNF");
        assert_eq!(view.base_table[2].laps, 40);
    }

    #[test]
    fn test_kpis_for_mixed_status_field() {
        let view = aggregate(&three_records(), &meta()).unwrap();

        assert_eq!(view.kpis.entrant_count, 3);
        assert_eq!(view.kpis.winner_driver, "A");
        assert_eq!(view.kpis.winner_team, "X");
        assert_eq!(view.kpis.finished_count, 2);
    }

    #[test]
    fn test_finished_count_is_case_sensitive() {
        let records = vec![
            record(1, "A", "X", "FINISHED", 25.0, 58),
            record(2, "B", "Y", "Finished", 18.0, 58),
        ];
        let view = aggregate(&records, &meta()).unwrap();
        assert_eq!(view.kpis.finished_count, 1);
    }

    #[test]
    fn test_winner_is_row_zero_not_points_leader() {
        // Qualifying-style input: classification order with zero points
        // everywhere except a lower row.
        let records = vec![
            record(1, "Pole", "X", "Finished", 0.0, 20),
            record(2, "Other", "Y", "Finished", 1.0, 21),
        ];
        let view = aggregate(&records, &meta()).unwrap();
        assert_eq!(view.kpis.winner_driver, "Pole");
        assert_eq!(view.kpis.winner_team, "X");
    }

    #[test]
    fn test_points_ranking_sorted_descending() {
        let view = aggregate(&three_records(), &meta()).unwrap();

        let points: Vec<f64> = view.points_by_driver.iter().map(|d| d.points).collect();
        assert_eq!(points, vec![25.0, 18.0, 0.0]);
        assert_eq!(view.points_by_driver[0].driver, "A");
        assert_eq!(view.points_by_driver[0].team, "X");
    }

    #[test]
    fn test_points_ranking_is_stable_on_ties() {
        let records = vec![
            record(1, "A", "X", "Finished", 10.0, 50),
            record(2, "B", "Y", "Finished", 10.0, 50),
            record(3, "C", "Z", "Finished", 12.0, 50),
        ];
        let view = aggregate(&records, &meta()).unwrap();

        // C leads; A and B are tied and must keep classification order.
        let drivers: Vec<&str> = view
            .points_by_driver
            .iter()
            .map(|d| d.driver.as_str())
            .collect();
        assert_eq!(drivers, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_points_total_is_conserved() {
        let view = aggregate(&three_records(), &meta()).unwrap();

        let base_total: f64 = view.base_table.iter().map(|r| r.points).sum();
        let ranking_total: f64 = view.points_by_driver.iter().map(|d| d.points).sum();
        let team_total: f64 = view.constructor_ranking.iter().map(|s| s.total_points).sum();

        assert_eq!(base_total, ranking_total);
        assert_eq!(base_total, team_total);
    }

    #[test]
    fn test_constructor_ranking_groups_and_sorts() {
        let view = aggregate(&three_records(), &meta()).unwrap();

        assert_eq!(view.constructor_ranking.len(), 2);
        assert_eq!(view.constructor_ranking[0].team, "X");
        assert_eq!(view.constructor_ranking[0].total_points, 25.0);
        assert_eq!(view.constructor_ranking[1].team, "Y");
        assert_eq!(view.constructor_ranking[1].total_points, 18.0);
    }

    #[test]
    fn test_constructor_ties_keep_first_appearance_order() {
        let records = vec![
            record(1, "A", "X", "Finished", 10.0, 50),
            record(2, "B", "Y", "Finished", 6.0, 50),
            record(3, "C", "Y", "Finished", 4.0, 50),
            record(4, "D", "X", "DNF", 0.0, 12),
        ];
        let view = aggregate(&records, &meta()).unwrap();

        // Both teams total 10; X appeared first in the table.
        assert_eq!(view.constructor_ranking[0].team, "X");
        assert_eq!(view.constructor_ranking[1].team, "Y");
        assert_eq!(view.constructor_ranking[0].total_points, 10.0);
        assert_eq!(view.constructor_ranking[1].total_points, 10.0);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let records = three_records();
        let first = aggregate(&records, &meta()).unwrap();
        let second = aggregate(&records, &meta()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unclassified_entrant_is_kept() {
        let records = vec![
            record(1, "A", "X", "Finished", 25.0, 58),
            RawResultRecord {
                position: None,
                driver: "B".to_string(),
                team: "Y".to_string(),
                status: "Withdrew".to_string(),
                points: 0.0,
                laps: 0,
            },
        ];
        let view = aggregate(&records, &meta()).unwrap();
        assert_eq!(view.kpis.entrant_count, 2);
        assert_eq!(view.base_table[1].position, None);
    }
}
