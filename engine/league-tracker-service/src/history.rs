//! Time series of one team, player or goalie across saved snapshots

use chrono::NaiveDate;
use league_scraper::{Division, GoalieStats, PlayerStats, Snapshot, StatRecord, TeamStanding};
use std::fmt::Write;

/// Columns shown for a record in a history listing
pub trait HistoryColumns: StatRecord {
    fn columns(&self) -> Vec<(&'static str, String)>;
}

impl HistoryColumns for TeamStanding {
    fn columns(&self) -> Vec<(&'static str, String)> {
        vec![
            ("GP", self.gp.to_string()),
            ("W-L-T-OTL", format!("{}-{}-{}-{}", self.w, self.l, self.t, self.otl)),
            ("PTS", self.pts.to_string()),
            ("PCT", format!("{:.3}", self.wpct)),
        ]
    }
}

impl HistoryColumns for PlayerStats {
    fn columns(&self) -> Vec<(&'static str, String)> {
        vec![
            ("TEAM", self.team.clone()),
            ("GP", self.gp.to_string()),
            ("G-A", format!("{}-{}", self.g, self.a)),
            ("PTS", self.pts.to_string()),
            ("PPG", format!("{:.2}", self.ppg)),
        ]
    }
}

impl HistoryColumns for GoalieStats {
    fn columns(&self) -> Vec<(&'static str, String)> {
        vec![
            ("TEAM", self.team.clone()),
            ("GP", self.gp.to_string()),
            ("GAA", format!("{:.2}", self.gaa)),
            ("SV%", format!("{:.3}", self.svpct)),
            ("SO", self.so.to_string()),
        ]
    }
}

/// Where a name stood on one date
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub division: Division,
    pub position: u32,
    pub columns: Vec<(&'static str, String)>,
}

/// Follow `name` (case-insensitive) through snapshots ordered oldest first.
///
/// Dates where the name does not appear are skipped. If a name appears in
/// more than one division, the first division in canonical order wins.
pub fn build_series<R: HistoryColumns>(snapshots: &[Snapshot<R>], name: &str) -> Vec<HistoryPoint> {
    let name = name.trim();

    snapshots
        .iter()
        .filter_map(|snapshot| {
            Division::ALL.into_iter().find_map(|division| {
                snapshot
                    .records(division)
                    .iter()
                    .find(|record| record.label().eq_ignore_ascii_case(name))
                    .map(|record| HistoryPoint {
                        date: snapshot.date,
                        division,
                        position: record.position(),
                        columns: record.columns(),
                    })
            })
        })
        .collect()
}

/// Render a series as an aligned text table
pub fn render_series(name: &str, points: &[HistoryPoint]) -> String {
    let mut out = String::new();

    let Some(first) = points.first() else {
        let _ = writeln!(out, "No history found for {name}");
        return out;
    };

    let _ = write!(out, "{:<12} {:<10} {:>4}", "DATE", "DIVISION", "POS");
    for (header, _) in &first.columns {
        let _ = write!(out, " {header:>10}");
    }
    out.push('\n');

    for point in points {
        let _ = write!(
            out,
            "{:<12} {:<10} {:>4}",
            point.date.format("%Y-%m-%d").to_string(),
            point.division.name(),
            point.position
        );
        for (_, value) in &point.columns {
            let _ = write!(out, " {value:>10}");
        }
        out.push('\n');
    }

    out
}
