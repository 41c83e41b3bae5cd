use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The four league divisions, in the order the standings page renders them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Division {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

impl Division {
    /// Canonical division order. Standings tables are assigned by this order.
    pub const ALL: [Division; 4] =
        [Division::Platinum, Division::Gold, Division::Silver, Division::Bronze];

    pub fn name(&self) -> &'static str {
        match self {
            Division::Platinum => "Platinum",
            Division::Gold => "Gold",
            Division::Silver => "Silver",
            Division::Bronze => "Bronze",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kinds of data scraped and stored independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataKind {
    Standings,
    PlayerStats,
    GoalieStats,
}

impl DataKind {
    pub const ALL: [DataKind; 3] = [DataKind::Standings, DataKind::PlayerStats, DataKind::GoalieStats];

    /// Directory name used for this kind's snapshots and index
    pub fn dir_name(&self) -> &'static str {
        match self {
            DataKind::Standings => "standings",
            DataKind::PlayerStats => "player-stats",
            DataKind::GoalieStats => "goalie-stats",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Value of the `statType` query parameter on the stats page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatType {
    Player,
    Goalie,
}

impl StatType {
    pub fn as_query(&self) -> &'static str {
        match self {
            StatType::Player => "player",
            StatType::Goalie => "goalie",
        }
    }
}

/// How a data kind's pages map onto divisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    /// One page holds a table per division, matched by document order
    SinglePage,
    /// One stats page per division, fetched by `divID`
    PerDivision(StatType),
}

/// All records of one data kind for every division, captured on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<R> {
    /// Date of the scrape (serialized as `YYYY-MM-DD`)
    pub date: NaiveDate,
    /// Decoded records per division, in page order
    pub divisions: BTreeMap<Division, Vec<R>>,
}

impl<R> Snapshot<R> {
    /// Create a snapshot with an empty record list for every division
    pub fn new(date: NaiveDate) -> Self {
        Self { date, divisions: Division::ALL.into_iter().map(|d| (d, Vec::new())).collect() }
    }

    pub fn insert(&mut self, division: Division, records: Vec<R>) {
        self.divisions.insert(division, records);
    }

    /// Records for a division, empty if the division is absent
    pub fn records(&self, division: Division) -> &[R] {
        self.divisions.get(&division).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_records(&self) -> usize {
        self.divisions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }

    pub fn division_names(&self) -> Vec<String> {
        self.divisions.keys().map(|d| d.name().to_string()).collect()
    }
}
