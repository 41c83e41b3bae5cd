//! Cross-run check for the standings page.
//!
//! Standings tables carry no division label, so divisions are assigned by
//! table order. If the site reorders its tables, whole divisions silently
//! swap. Comparing team names against the previous snapshot catches that.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::records::TeamStanding;
use crate::types::{Division, Snapshot};

/// Changes in one division's team list since the previous snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionDrift {
    pub division: Division,
    /// Teams not present in this division last time
    pub added: Vec<String>,
    /// Teams present last time but missing now
    pub removed: Vec<String>,
    /// Teams now in this division that were previously in another one
    pub moved_from: Vec<(String, Division)>,
}

impl DivisionDrift {
    /// A team crossing divisions usually means the tables shifted
    pub fn looks_like_table_shift(&self) -> bool {
        !self.moved_from.is_empty()
    }
}

impl fmt::Display for DivisionDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.division)?;
        if !self.added.is_empty() {
            write!(f, " added [{}]", self.added.join(", "))?;
        }
        if !self.removed.is_empty() {
            write!(f, " removed [{}]", self.removed.join(", "))?;
        }
        for (team, from) in &self.moved_from {
            write!(f, " {team} was in {from};")?;
        }
        Ok(())
    }
}

/// Compare team names per division against the previous standings snapshot.
///
/// Divisions that were empty last time have no baseline and are skipped.
pub fn check_standings_drift(
    previous: &Snapshot<TeamStanding>,
    current: &Snapshot<TeamStanding>,
) -> Vec<DivisionDrift> {
    let previous_home: HashMap<&str, Division> = previous
        .divisions
        .iter()
        .flat_map(|(division, teams)| teams.iter().map(move |t| (t.team.as_str(), *division)))
        .collect();

    let mut drifts = Vec::new();

    for division in Division::ALL {
        let before: BTreeSet<&str> =
            previous.records(division).iter().map(|t| t.team.as_str()).collect();
        if before.is_empty() {
            continue;
        }
        let after: BTreeSet<&str> =
            current.records(division).iter().map(|t| t.team.as_str()).collect();

        let added: Vec<String> = after.difference(&before).map(|t| t.to_string()).collect();
        let removed: Vec<String> = before.difference(&after).map(|t| t.to_string()).collect();
        let moved_from: Vec<(String, Division)> = added
            .iter()
            .filter_map(|team| {
                previous_home
                    .get(team.as_str())
                    .filter(|home| **home != division)
                    .map(|home| (team.clone(), *home))
            })
            .collect();

        if !added.is_empty() || !removed.is_empty() {
            drifts.push(DivisionDrift { division, added, removed, moved_from });
        }
    }

    drifts
}
