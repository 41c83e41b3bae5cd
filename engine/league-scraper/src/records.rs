use serde::{Deserialize, Serialize};

use crate::decode::{parse_fraction, parse_int, StatRecord};
use crate::extract::{RawRow, TableSelection};
use crate::types::{DataKind, PageLayout, StatType};

/// One row of a division's standings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    /// Place in the division, from table order
    pub position: u32,
    pub team: String,
    /// Games played
    pub gp: i32,
    pub w: i32,
    pub l: i32,
    pub t: i32,
    /// Overtime losses
    pub otl: i32,
    pub pts: i32,
    /// Win percentage as printed, e.g. `.750` -> 0.75
    pub wpct: f64,
}

impl StatRecord for TeamStanding {
    const KIND: DataKind = DataKind::Standings;
    const LAYOUT: PageLayout = PageLayout::SinglePage;
    const MIN_CELLS: usize = 8;
    const LABEL_COLUMN: usize = 0;
    const HEADER_LABEL: &'static str = "team";

    fn table_selection() -> TableSelection {
        TableSelection::ColumnCount { min_cells: Self::MIN_CELLS }
    }

    fn from_row(row: &RawRow, position: u32) -> Self {
        Self {
            position,
            team: row.label(0).to_string(),
            gp: parse_int(row.text(1)),
            w: parse_int(row.text(2)),
            l: parse_int(row.text(3)),
            t: parse_int(row.text(4)),
            otl: parse_int(row.text(5)),
            pts: parse_int(row.text(6)),
            wpct: parse_fraction(row.text(7)),
        }
    }

    fn position(&self) -> u32 {
        self.position
    }

    fn label(&self) -> &str {
        &self.team
    }
}

/// One row of a division's scoring leaders table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub rank: u32,
    pub name: String,
    pub team: String,
    pub gp: i32,
    /// Goals
    pub g: i32,
    /// Assists
    pub a: i32,
    pub pts: i32,
    /// Points per game
    pub ppg: f64,
    /// Penalty minutes
    pub pim: i32,
}

impl StatRecord for PlayerStats {
    const KIND: DataKind = DataKind::PlayerStats;
    const LAYOUT: PageLayout = PageLayout::PerDivision(StatType::Player);
    const MIN_CELLS: usize = 9;
    const LABEL_COLUMN: usize = 1;
    const HEADER_LABEL: &'static str = "player";

    fn table_selection() -> TableSelection {
        TableSelection::HeaderKeywords(&["player", "gp", "pts"])
    }

    fn from_row(row: &RawRow, position: u32) -> Self {
        Self {
            rank: position,
            name: row.label(1).to_string(),
            team: row.label(2).to_string(),
            gp: parse_int(row.text(3)),
            g: parse_int(row.text(4)),
            a: parse_int(row.text(5)),
            pts: parse_int(row.text(6)),
            ppg: parse_fraction(row.text(7)),
            pim: parse_int(row.text(8)),
        }
    }

    fn position(&self) -> u32 {
        self.rank
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// One row of a division's goaltending leaders table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalieStats {
    pub rank: u32,
    pub name: String,
    pub team: String,
    pub gp: i32,
    pub w: i32,
    pub l: i32,
    pub t: i32,
    /// Shots against
    pub sa: i32,
    /// Goals against
    pub ga: i32,
    /// Goals-against average
    pub gaa: f64,
    /// Save percentage; not range checked
    pub svpct: f64,
    /// Shutouts
    pub so: i32,
}

impl StatRecord for GoalieStats {
    const KIND: DataKind = DataKind::GoalieStats;
    const LAYOUT: PageLayout = PageLayout::PerDivision(StatType::Goalie);
    const MIN_CELLS: usize = 12;
    const LABEL_COLUMN: usize = 1;
    const HEADER_LABEL: &'static str = "goalie";

    fn table_selection() -> TableSelection {
        TableSelection::CssClass("table.leaders")
    }

    fn from_row(row: &RawRow, position: u32) -> Self {
        Self {
            rank: position,
            name: row.label(1).to_string(),
            team: row.label(2).to_string(),
            gp: parse_int(row.text(3)),
            w: parse_int(row.text(4)),
            l: parse_int(row.text(5)),
            t: parse_int(row.text(6)),
            sa: parse_int(row.text(7)),
            ga: parse_int(row.text(8)),
            gaa: parse_fraction(row.text(9)),
            svpct: parse_fraction(row.text(10)),
            so: parse_int(row.text(11)),
        }
    }

    fn position(&self) -> u32 {
        self.rank
    }

    fn label(&self) -> &str {
        &self.name
    }
}
