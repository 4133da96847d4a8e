//! Dashboard and report generation.
//!
//! Renders a derived view three ways: a terminal dashboard (KPIs, the
//! classification table, ASCII bar charts), a Markdown report, and a JSON
//! report. Everything here is pure string building over an already-computed
//! view, so it is all testable without a terminal.

use crate::models::{format_points, DerivedView, SessionMeta};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Width of the bar charts, in characters, at full scale.
const BAR_WIDTH: usize = 30;

/// Render the full terminal dashboard.
pub fn render_dashboard(view: &DerivedView, meta: &SessionMeta) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n📍 {} — {} ({} round {})\n\n",
        meta.event_name, meta.session_kind, meta.season, meta.round
    ));

    output.push_str(&render_kpi_block(view));
    output.push_str("\n📊 Official Classification\n\n");
    output.push_str(&render_classification_table(view));
    output.push_str("\n🏆 Points by Driver\n\n");
    output.push_str(&render_points_chart(view));
    output.push_str("\n🔁 Laps Completed\n\n");
    output.push_str(&render_laps_chart(view));
    output.push_str("\n🏎️  Constructor Ranking\n\n");
    output.push_str(&render_constructor_chart(view));

    output
}

/// The four KPIs on one line, dashboard-header style.
fn render_kpi_block(view: &DerivedView) -> String {
    format!(
        "   🏁 Entrants: {} | 🥇 Winner: {} | 🏎️  Winning team: {} | 🟢 Finished: {}\n",
        view.kpis.entrant_count,
        view.kpis.winner_driver,
        view.kpis.winner_team,
        view.kpis.finished_count,
    )
}

/// Fixed-width classification table in base-table (classification) order.
fn render_classification_table(view: &DerivedView) -> String {
    let driver_width = column_width(view, |row| row.driver.len(), "Driver".len());
    let team_width = column_width(view, |row| row.team.len(), "Team".len());
    let status_width = column_width(view, |row| row.status.len(), "Status".len());

    let mut table = String::new();
    table.push_str(&format!(
        "   {:>3}  {:<driver_width$}  {:<team_width$}  {:<status_width$}  {:>6}  {:>4}\n",
        "Pos", "Driver", "Team", "Status", "Points", "Laps"
    ));

    for row in &view.base_table {
        table.push_str(&format!(
            "   {:>3}  {:<driver_width$}  {:<team_width$}  {:<status_width$}  {:>6}  {:>4}\n",
            row.position_label(),
            row.driver,
            row.team,
            row.status,
            format_points(row.points),
            row.laps,
        ));
    }

    table
}

fn column_width<F>(view: &DerivedView, len_of: F, header_len: usize) -> usize
where
    F: Fn(&crate::models::ResultRow) -> usize,
{
    view.base_table
        .iter()
        .map(len_of)
        .max()
        .unwrap_or(0)
        .max(header_len)
}

/// Horizontal bar chart of points per driver, team as category label.
fn render_points_chart(view: &DerivedView) -> String {
    let max_points = view
        .points_by_driver
        .iter()
        .map(|d| d.points)
        .fold(0.0_f64, f64::max);

    let label_width = view
        .points_by_driver
        .iter()
        .map(|d| d.driver.len())
        .max()
        .unwrap_or(0);

    let mut chart = String::new();
    for entry in &view.points_by_driver {
        chart.push_str(&format!(
            "   {:<label_width$}  {:<20}  {} {}\n",
            entry.driver,
            format!("[{}]", entry.team),
            bar(entry.points, max_points),
            format_points(entry.points),
        ));
    }
    chart
}

/// Laps per driver, in classification order (the line-chart view).
fn render_laps_chart(view: &DerivedView) -> String {
    let max_laps = view.base_table.iter().map(|r| r.laps).max().unwrap_or(0) as f64;

    let label_width = view
        .base_table
        .iter()
        .map(|r| r.driver.len())
        .max()
        .unwrap_or(0);

    let mut chart = String::new();
    for row in &view.base_table {
        chart.push_str(&format!(
            "   {:<label_width$}  {} {}\n",
            row.driver,
            bar(row.laps as f64, max_laps),
            row.laps,
        ));
    }
    chart
}

/// Constructor ranking as a bar chart.
fn render_constructor_chart(view: &DerivedView) -> String {
    let max_points = view
        .constructor_ranking
        .iter()
        .map(|s| s.total_points)
        .fold(0.0_f64, f64::max);

    let label_width = view
        .constructor_ranking
        .iter()
        .map(|s| s.team.len())
        .max()
        .unwrap_or(0);

    let mut chart = String::new();
    for standing in &view.constructor_ranking {
        chart.push_str(&format!(
            "   {:<label_width$}  {} {}\n",
            standing.team,
            bar(standing.total_points, max_points),
            format_points(standing.total_points),
        ));
    }
    chart
}

/// Scale a value to a bar of block characters. A zero-valued entry still
/// draws one tick so every row stays visible.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return "▏".to_string();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
    if filled == 0 {
        "▏".to_string()
    } else {
        "█".repeat(filled)
    }
}

// --- Report files ------------------------------------------------------------

/// Generate a Markdown report of the full dashboard.
pub fn generate_markdown_report(view: &DerivedView, meta: &SessionMeta) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {} — {}\n\n", meta.event_name, meta.session_kind));

    output.push_str("## Session\n\n");
    output.push_str(&format!("- **Season:** {}\n", meta.season));
    output.push_str(&format!("- **Round:** {}\n", meta.round));
    output.push_str(&format!("- **Session:** {}\n", meta.session_kind));
    output.push_str(&format!(
        "- **Generated:** {}\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str("## Key Figures\n\n");
    output.push_str("| 🏁 Entrants | 🥇 Winner | 🏎️ Winning Team | 🟢 Finished |\n");
    output.push_str("|:---:|:---:|:---:|:---:|\n");
    output.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        view.kpis.entrant_count,
        view.kpis.winner_driver,
        view.kpis.winner_team,
        view.kpis.finished_count
    ));

    output.push_str("## Official Classification\n\n");
    output.push_str("| Pos | Driver | Team | Status | Points | Laps |\n");
    output.push_str("|:---:|:---|:---|:---|:---:|:---:|\n");
    for row in &view.base_table {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            row.position_label(),
            row.driver,
            row.team,
            row.status,
            format_points(row.points),
            row.laps
        ));
    }
    output.push('\n');

    output.push_str("## Points by Driver\n\n");
    output.push_str("| Driver | Team | Points |\n");
    output.push_str("|:---|:---|:---:|\n");
    for entry in &view.points_by_driver {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            entry.driver,
            entry.team,
            format_points(entry.points)
        ));
    }
    output.push('\n');

    output.push_str("## Constructor Ranking\n\n");
    output.push_str("| Team | Points |\n");
    output.push_str("|:---|:---:|\n");
    for standing in &view.constructor_ranking {
        output.push_str(&format!(
            "| {} | {} |\n",
            standing.team,
            format_points(standing.total_points)
        ));
    }
    output.push('\n');

    output.push_str("---\n\n");
    output.push_str("*Report generated by pitboard*\n");

    output
}

/// JSON report payload: the session metadata plus every derived view.
#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    session: &'a SessionMeta,
    #[serde(flatten)]
    view: &'a DerivedView,
}

/// Generate a pretty-printed JSON report.
pub fn generate_json_report(view: &DerivedView, meta: &SessionMeta) -> Result<String> {
    let report = JsonReport {
        generated_at: Utc::now(),
        session: meta,
        view,
    };
    serde_json::to_string_pretty(&report).map_err(Into::into)
}
