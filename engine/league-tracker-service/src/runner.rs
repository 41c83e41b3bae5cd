//! Scrape, save and query runs over a page source and a snapshot store

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use league_scraper::{
    check_standings_drift, DataKind, DivisionDrift, DivisionOrchestrator, DivisionTarget,
    GoalieStats, PageSource, PlayerStats, Snapshot, StatRecord, TeamStanding,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use snapshot_store::{SnapshotIndex, SnapshotStore};
use tracing::{error, info, warn};

use crate::history::{build_series, render_series, HistoryColumns};

/// Outcome of scraping and saving one data kind
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeReport {
    pub kind: DataKind,
    pub date: NaiveDate,
    pub records: usize,
    /// Whether the date was new to the index (false when overwriting with force)
    pub new_date: bool,
    /// Standings changes since the previous snapshot (empty for stats kinds)
    pub drift: Vec<DivisionDrift>,
}

/// Result of scraping every data kind
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub reports: Vec<ScrapeReport>,
    pub failed: Vec<(DataKind, anyhow::Error)>,
}

impl ScrapeOutcome {
    /// Error naming every failed kind, if any failed
    pub fn into_result(self) -> Result<Vec<ScrapeReport>> {
        if !self.failed.is_empty() {
            let kinds: Vec<String> = self.failed.iter().map(|(kind, _)| kind.to_string()).collect();
            bail!("Failed to scrape {}", kinds.join(", "));
        }
        Ok(self.reports)
    }
}

/// Runs the scraper against a store
pub struct Tracker<S, T> {
    orchestrator: DivisionOrchestrator<S>,
    store: T,
}

impl<S: PageSource, T: SnapshotStore> Tracker<S, T> {
    pub fn new(source: S, targets: Vec<DivisionTarget>, store: T) -> Self {
        Self { orchestrator: DivisionOrchestrator::new(source, targets), store }
    }

    /// Scrape every data kind. A failing kind does not stop the rest.
    pub async fn scrape_all(&self, date: NaiveDate, force: bool) -> ScrapeOutcome {
        let mut outcome = ScrapeOutcome::default();

        for kind in DataKind::ALL {
            match self.scrape_kind(kind, date, force).await {
                Ok(report) => outcome.reports.push(report),
                Err(e) => {
                    error!("Scrape of {} failed: {:#}", kind, e);
                    outcome.failed.push((kind, e));
                }
            }
        }

        outcome
    }

    /// Scrape one data kind and save it under `date`
    pub async fn scrape_kind(
        &self,
        kind: DataKind,
        date: NaiveDate,
        force: bool,
    ) -> Result<ScrapeReport> {
        match kind {
            DataKind::Standings => self.scrape_standings(date, force).await,
            DataKind::PlayerStats => self.scrape_and_save::<PlayerStats>(date, force).await,
            DataKind::GoalieStats => self.scrape_and_save::<GoalieStats>(date, force).await,
        }
    }

    async fn scrape_standings(&self, date: NaiveDate, force: bool) -> Result<ScrapeReport> {
        let snapshot = self.orchestrator.scrape::<TeamStanding>(date).await;

        if snapshot.is_empty() {
            bail!("No standings records found for {date}; nothing saved");
        }

        let drift = self.standings_drift(&snapshot).await;
        let mut report = self.save(snapshot, force).await?;
        report.drift = drift;

        Ok(report)
    }

    async fn scrape_and_save<R>(&self, date: NaiveDate, force: bool) -> Result<ScrapeReport>
    where
        R: StatRecord + Serialize + Send + Sync,
    {
        let snapshot = self.orchestrator.scrape::<R>(date).await;

        if snapshot.is_empty() {
            warn!("No {} records found for {}; saving an empty snapshot", R::KIND, date);
        }

        self.save(snapshot, force).await
    }

    async fn save<R>(&self, snapshot: Snapshot<R>, force: bool) -> Result<ScrapeReport>
    where
        R: StatRecord + Serialize + Send + Sync,
    {
        let kind = R::KIND;
        let mut index = self.store.load_index(kind).await?;

        self.store
            .save_snapshot(kind, &snapshot, force)
            .await
            .with_context(|| format!("Failed to save {} snapshot", kind))?;

        let new_date = index.record(&snapshot);
        self.store.write_index(kind, &index).await?;

        info!("Recorded {} snapshot for {} ({} dates indexed)", kind, snapshot.date, index.dates.len());

        Ok(ScrapeReport {
            kind,
            date: snapshot.date,
            records: snapshot.total_records(),
            new_date,
            drift: Vec::new(),
        })
    }

    /// Compare against the newest earlier standings snapshot. Problems loading
    /// the baseline only skip the check.
    async fn standings_drift(&self, current: &Snapshot<TeamStanding>) -> Vec<DivisionDrift> {
        let previous = match self.previous_standings(current.date).await {
            Ok(Some(previous)) => previous,
            Ok(None) => {
                info!("No earlier standings snapshot; skipping drift check");
                return Vec::new();
            }
            Err(e) => {
                warn!("Could not load earlier standings snapshot: {:#}", e);
                return Vec::new();
            }
        };

        let drifts = check_standings_drift(&previous, current);
        for drift in &drifts {
            if drift.looks_like_table_shift() {
                warn!("Standings tables may have shifted since {}: {}", previous.date, drift);
            } else {
                info!("Standings changed since {}: {}", previous.date, drift);
            }
        }

        drifts
    }

    async fn previous_standings(&self, date: NaiveDate) -> Result<Option<Snapshot<TeamStanding>>> {
        let index = self.store.load_index(DataKind::Standings).await?;

        match index.latest_before(date) {
            Some(previous) => Ok(self.store.load_snapshot(DataKind::Standings, previous).await?),
            None => Ok(None),
        }
    }

    /// The index for a data kind
    pub async fn dates(&self, kind: DataKind) -> Result<SnapshotIndex> {
        Ok(self.store.load_index(kind).await?)
    }

    /// Render the history of `name` within a data kind
    pub async fn history(&self, kind: DataKind, name: &str) -> Result<String> {
        match kind {
            DataKind::Standings => self.history_of::<TeamStanding>(name).await,
            DataKind::PlayerStats => self.history_of::<PlayerStats>(name).await,
            DataKind::GoalieStats => self.history_of::<GoalieStats>(name).await,
        }
    }

    async fn history_of<R>(&self, name: &str) -> Result<String>
    where
        R: HistoryColumns + DeserializeOwned + Send,
    {
        let snapshots = self.store.load_history::<R>(R::KIND).await?;
        let series = build_series(&snapshots, name);

        info!("Found {} of {} {} snapshots for {}", series.len(), snapshots.len(), R::KIND, name);

        Ok(render_series(name, &series))
    }
}

/// Render an index for the `dates` command
pub fn render_index(kind: DataKind, index: &SnapshotIndex) -> String {
    if index.is_empty() {
        return format!("No {kind} snapshots saved\n");
    }

    let divisions: Vec<&str> = index.divisions.iter().map(String::as_str).collect();
    let mut out = format!(
        "{kind}: {} snapshots, last updated {}\ndivisions: {}\n",
        index.dates.len(),
        index.last_updated.format("%Y-%m-%d %H:%M:%S UTC"),
        divisions.join(", ")
    );
    for date in &index.dates {
        out.push_str(&format!("{}\n", date.format("%Y-%m-%d")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_scraper::{Division, PageRequest, ScraperConfig, StatType, StaticPageSource};
    use snapshot_store::InMemorySnapshotStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn standings_table(teams: &[(&str, i32)]) -> String {
        let rows: String = teams
            .iter()
            .map(|(team, pts)| {
                format!(
                    "<tr><td>{team}</td><td>10</td><td>5</td><td>4</td>\
                     <td>1</td><td>0</td><td>{pts}</td><td>.550</td></tr>"
                )
            })
            .collect();
        format!("<table>{rows}</table>")
    }

    fn standings_page(divisions: &[&[(&str, i32)]]) -> String {
        divisions.iter().map(|teams| standings_table(teams)).collect()
    }

    fn player_page(name: &str, pts: i32) -> String {
        format!(
            "<table><thead><tr><th>#</th><th>Player</th><th>Team</th><th>GP</th><th>G</th>\
             <th>A</th><th>PTS</th><th>PPG</th><th>PIM</th></tr></thead><tbody>\
             <tr><td>1</td><td>{name}</td><td>Stealth</td><td>9</td><td>5</td><td>4</td>\
             <td>{pts}</td><td>1.00</td><td>2</td></tr></tbody></table>"
        )
    }

    fn tracker(
        source: StaticPageSource,
        store: InMemorySnapshotStore,
    ) -> Tracker<StaticPageSource, InMemorySnapshotStore> {
        Tracker::new(source, ScraperConfig::default().divisions, store)
    }

    fn standings_source(divisions: &[&[(&str, i32)]]) -> StaticPageSource {
        StaticPageSource::new().with_page(PageRequest::Standings, standings_page(divisions))
    }

    #[tokio::test]
    async fn test_scrape_standings_saves_and_indexes() {
        let store = InMemorySnapshotStore::new();
        let tracker = tracker(
            standings_source(&[&[("Stealth", 15), ("Devils", 13)], &[("Wolves", 12)]]),
            store.clone(),
        );

        let report = tracker.scrape_kind(DataKind::Standings, day(5), false).await.unwrap();

        assert_eq!(report.records, 3);
        assert!(report.new_date);
        assert!(report.drift.is_empty());

        let index = tracker.dates(DataKind::Standings).await.unwrap();
        assert_eq!(index.dates, vec![day(5)]);
        assert_eq!(index.divisions.len(), 4);

        let saved: Snapshot<TeamStanding> =
            store.load_snapshot(DataKind::Standings, day(5)).await.unwrap().unwrap();
        assert_eq!(saved.records(Division::Gold)[0].team, "Wolves");
    }

    #[tokio::test]
    async fn test_empty_standings_are_fatal_and_not_saved() {
        let store = InMemorySnapshotStore::new();
        let tracker = tracker(StaticPageSource::new(), store.clone());

        assert!(tracker.scrape_kind(DataKind::Standings, day(5), false).await.is_err());
        assert_eq!(store.snapshot_count().await, 0);
        assert!(tracker.dates(DataKind::Standings).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_stats_are_still_saved() {
        let store = InMemorySnapshotStore::new();
        let tracker = tracker(StaticPageSource::new(), store.clone());

        let report = tracker.scrape_kind(DataKind::GoalieStats, day(5), false).await.unwrap();

        assert_eq!(report.records, 0);
        assert_eq!(store.snapshot_count().await, 1);
        assert_eq!(tracker.dates(DataKind::GoalieStats).await.unwrap().latest(), Some(day(5)));
    }

    #[tokio::test]
    async fn test_rescrape_same_date_needs_force() {
        let store = InMemorySnapshotStore::new();
        let tracker = tracker(standings_source(&[&[("Stealth", 15)]]), store);

        tracker.scrape_kind(DataKind::Standings, day(5), false).await.unwrap();
        assert!(tracker.scrape_kind(DataKind::Standings, day(5), false).await.is_err());

        let report = tracker.scrape_kind(DataKind::Standings, day(5), true).await.unwrap();
        assert!(!report.new_date);
        assert_eq!(tracker.dates(DataKind::Standings).await.unwrap().dates, vec![day(5)]);
    }

    #[tokio::test]
    async fn test_drift_detected_against_earlier_snapshot() {
        let store = InMemorySnapshotStore::new();

        tracker(
            standings_source(&[&[("Stealth", 15)], &[("Wolves", 12)]]),
            store.clone(),
        )
        .scrape_kind(DataKind::Standings, day(1), false)
        .await
        .unwrap();

        // Tables swapped order on the next run
        let report = tracker(
            standings_source(&[&[("Wolves", 14)], &[("Stealth", 17)]]),
            store.clone(),
        )
        .scrape_kind(DataKind::Standings, day(8), false)
        .await
        .unwrap();

        assert_eq!(report.drift.len(), 2);
        assert!(report.drift.iter().all(|d| d.looks_like_table_shift()));
        assert_eq!(report.drift[0].division, Division::Platinum);
        assert_eq!(report.drift[0].moved_from, vec![("Wolves".to_string(), Division::Gold)]);
    }

    #[tokio::test]
    async fn test_scrape_all_continues_past_failed_kind() {
        let store = InMemorySnapshotStore::new();
        // No standings page: standings fail, stats still run
        let source = StaticPageSource::new().with_page(
            PageRequest::Stats { div_id: "101".to_string(), stat_type: StatType::Player },
            player_page("Sam Reed", 21),
        );
        let tracker = tracker(source, store.clone());

        let outcome = tracker.scrape_all(day(5), false).await;

        assert_eq!(outcome.reports.len(), 2);
        assert_eq!(outcome.reports[0].kind, DataKind::PlayerStats);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, DataKind::Standings);
        assert!(outcome.into_result().unwrap_err().to_string().contains("standings"));
        assert_eq!(store.snapshot_count().await, 2);
        let players: Snapshot<PlayerStats> =
            store.load_snapshot(DataKind::PlayerStats, day(5)).await.unwrap().unwrap();
        assert_eq!(players.records(Division::Platinum)[0].pts, 21);
    }

    #[tokio::test]
    async fn test_history_across_runs() {
        let store = InMemorySnapshotStore::new();
        let stats = |div_id: &str| PageRequest::Stats {
            div_id: div_id.to_string(),
            stat_type: StatType::Player,
        };

        for (d, pts) in [(1, 10), (8, 17)] {
            let source = StaticPageSource::new().with_page(stats("102"), player_page("Sam Reed", pts));
            tracker(source, store.clone())
                .scrape_kind(DataKind::PlayerStats, day(d), false)
                .await
                .unwrap();
        }

        let text = tracker(StaticPageSource::new(), store)
            .history(DataKind::PlayerStats, "sam reed")
            .await
            .unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2025-01-01   Gold"));
        assert!(lines[1].contains(" 10 "));
        assert!(lines[2].starts_with("2025-01-08   Gold"));
        assert!(lines[2].contains(" 17 "));
    }

    #[test]
    fn test_render_empty_index() {
        assert_eq!(
            render_index(DataKind::PlayerStats, &SnapshotIndex::new()),
            "No player-stats snapshots saved\n"
        );
    }
}
