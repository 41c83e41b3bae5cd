use anyhow::{Context, Result};
use chrono::NaiveDate;
use scraper::Html;
use tracing::{debug, info, warn};

use crate::config::DivisionTarget;
use crate::decode::{decode_rows, StatRecord};
use crate::extract::extract_tables;
use crate::source::{PageRequest, PageSource};
use crate::types::{Division, PageLayout, Snapshot, StatType};

/// Builds one snapshot per data kind by walking the divisions in order.
///
/// A failure in one division is logged and leaves that division empty; the
/// other divisions still run. Fetches are sequential and never retried.
pub struct DivisionOrchestrator<S> {
    source: S,
    targets: Vec<DivisionTarget>,
}

impl<S: PageSource> DivisionOrchestrator<S> {
    pub fn new(source: S, targets: Vec<DivisionTarget>) -> Self {
        Self { source, targets }
    }

    /// Scrape a complete snapshot of `R` for `date`
    pub async fn scrape<R: StatRecord>(&self, date: NaiveDate) -> Snapshot<R> {
        info!("Starting to scrape {} for {}", R::KIND, date);

        let snapshot = match R::LAYOUT {
            PageLayout::SinglePage => self.scrape_single_page::<R>(date).await,
            PageLayout::PerDivision(stat_type) => {
                self.scrape_per_division::<R>(date, stat_type).await
            }
        };

        info!(
            "Scraped {} {} records across {} divisions",
            snapshot.total_records(),
            R::KIND,
            snapshot.divisions.len()
        );
        snapshot
    }

    async fn scrape_single_page<R: StatRecord>(&self, date: NaiveDate) -> Snapshot<R> {
        let mut snapshot = Snapshot::new(date);

        let tables = match self.fetch_single_page::<R>().await {
            Ok(tables) => tables,
            Err(e) => {
                warn!("Failed to scrape {} page: {:#}", R::KIND, e);
                return snapshot;
            }
        };

        if tables.len() < Division::ALL.len() {
            warn!(
                "Found {} {} tables for {} divisions; trailing divisions stay empty",
                tables.len(),
                R::KIND,
                Division::ALL.len()
            );
        } else if tables.len() > Division::ALL.len() {
            debug!("Ignoring {} extra {} tables", tables.len() - Division::ALL.len(), R::KIND);
        }

        // Tables carry no division label; document order is the only link.
        for (division, records) in Division::ALL.into_iter().zip(tables) {
            info!("{}: {} records", division, records.len());
            snapshot.insert(division, records);
        }

        snapshot
    }

    async fn fetch_single_page<R: StatRecord>(&self) -> Result<Vec<Vec<R>>> {
        let html = self.source.fetch_page(&PageRequest::Standings).await?;
        parse_tables::<R>(&html)
    }

    async fn scrape_per_division<R: StatRecord>(
        &self,
        date: NaiveDate,
        stat_type: StatType,
    ) -> Snapshot<R> {
        let mut snapshot = Snapshot::new(date);

        for division in Division::ALL {
            let records = match self.scrape_division::<R>(division, stat_type).await {
                Ok(records) => {
                    info!("{}: {} records", division, records.len());
                    records
                }
                Err(e) => {
                    warn!("Failed to scrape {} for {}: {:#}", R::KIND, division, e);
                    Vec::new()
                }
            };
            snapshot.insert(division, records);
        }

        snapshot
    }

    async fn scrape_division<R: StatRecord>(
        &self,
        division: Division,
        stat_type: StatType,
    ) -> Result<Vec<R>> {
        let div_id = self
            .targets
            .iter()
            .find(|t| t.division == division)
            .map(|t| t.div_id.clone())
            .with_context(|| format!("No divID configured for {division}"))?;

        let html = self.source.fetch_page(&PageRequest::Stats { div_id, stat_type }).await?;

        Ok(parse_tables::<R>(&html)?.into_iter().next().unwrap_or_default())
    }
}

/// Parse a page and decode every table matching `R`'s selection
fn parse_tables<R: StatRecord>(html: &str) -> Result<Vec<Vec<R>>> {
    let document = Html::parse_document(html);
    let tables = extract_tables(&document, &R::table_selection())?;
    Ok(tables.iter().map(|rows| decode_rows::<R>(rows)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;
    use crate::records::{GoalieStats, PlayerStats, TeamStanding};
    use crate::source::StaticPageSource;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 9).unwrap()
    }

    fn standings_table(teams: &[(&str, i32)]) -> String {
        let rows: String = teams
            .iter()
            .map(|(team, pts)| {
                format!(
                    "<tr><td><a href=\"/team\">{team}</a></td><td>10</td><td>5</td><td>4</td>\
                     <td>1</td><td>0</td><td>{pts}</td><td>.550</td></tr>"
                )
            })
            .collect();
        format!(
            "<table class=\"standings\"><tr><th>Team</th><th>GP</th><th>W</th><th>L</th>\
             <th>T</th><th>OTL</th><th>PTS</th><th>PCT</th></tr>{rows}</table>"
        )
    }

    fn player_page(players: &[(&str, &str)]) -> String {
        let rows: String = players
            .iter()
            .enumerate()
            .map(|(i, (name, team))| {
                format!(
                    "<tr><td>{}</td><td><a href=\"/p\"><span class=\"full-name\">{name}</span>\
                     <span class=\"abbr\">X</span></a></td><td>{team}</td><td>9</td><td>5</td>\
                     <td>4</td><td>9</td><td>1.00</td><td>2</td></tr>",
                    i + 1
                )
            })
            .collect();
        format!(
            "<table><thead><tr><th>#</th><th>Player</th><th>Team</th><th>GP</th><th>G</th>\
             <th>A</th><th>PTS</th><th>PPG</th><th>PIM</th></tr></thead><tbody>{rows}</tbody></table>"
        )
    }

    fn orchestrator(source: StaticPageSource) -> DivisionOrchestrator<StaticPageSource> {
        DivisionOrchestrator::new(source, ScraperConfig::default().divisions)
    }

    #[tokio::test]
    async fn test_four_tables_map_to_divisions_in_order() {
        let html = format!(
            "<html><body><table><tr><td>menu</td></tr></table>{}{}{}{}</body></html>",
            standings_table(&[("Stealth", 15), ("Devils", 13)]),
            standings_table(&[("Wolves", 12)]),
            standings_table(&[("Ravens", 9)]),
            standings_table(&[("Otters", 4), ("Hawks", 2)]),
        );
        let source = StaticPageSource::new().with_page(PageRequest::Standings, html);

        let snapshot = orchestrator(source).scrape::<TeamStanding>(date()).await;

        let names = |d: Division| -> Vec<String> {
            snapshot.records(d).iter().map(|s| s.team.clone()).collect()
        };
        assert_eq!(names(Division::Platinum), vec!["Stealth", "Devils"]);
        assert_eq!(names(Division::Gold), vec!["Wolves"]);
        assert_eq!(names(Division::Silver), vec!["Ravens"]);
        assert_eq!(names(Division::Bronze), vec!["Otters", "Hawks"]);
        assert_eq!(snapshot.records(Division::Bronze)[1].position, 2);
        assert_eq!(snapshot.date, date());
    }

    #[tokio::test]
    async fn test_wrapped_standings_tables_keep_their_divisions() {
        let html = format!(
            "<table class=\"layout\"><tr><td>{}{}{}{}</td></tr></table>",
            standings_table(&[("Stealth", 15)]),
            standings_table(&[("Wolves", 12)]),
            standings_table(&[("Ravens", 9)]),
            standings_table(&[("Otters", 4)]),
        );
        let source = StaticPageSource::new().with_page(PageRequest::Standings, html);

        let snapshot = orchestrator(source).scrape::<TeamStanding>(date()).await;

        let names = |d: Division| -> Vec<String> {
            snapshot.records(d).iter().map(|s| s.team.clone()).collect()
        };
        assert_eq!(names(Division::Platinum), vec!["Stealth"]);
        assert_eq!(names(Division::Gold), vec!["Wolves"]);
        assert_eq!(names(Division::Silver), vec!["Ravens"]);
        assert_eq!(names(Division::Bronze), vec!["Otters"]);
    }

    #[tokio::test]
    async fn test_two_tables_leave_trailing_divisions_empty() {
        let html = format!(
            "{}{}",
            standings_table(&[("Stealth", 15)]),
            standings_table(&[("Wolves", 12)])
        );
        let source = StaticPageSource::new().with_page(PageRequest::Standings, html);

        let snapshot = orchestrator(source).scrape::<TeamStanding>(date()).await;

        assert_eq!(snapshot.records(Division::Platinum).len(), 1);
        assert_eq!(snapshot.records(Division::Gold).len(), 1);
        assert!(snapshot.records(Division::Silver).is_empty());
        assert!(snapshot.records(Division::Bronze).is_empty());
        assert_eq!(snapshot.divisions.len(), 4);
    }

    #[tokio::test]
    async fn test_end_to_end_standings_row_filtering() {
        let html = "<table>\
            <tr><td>Stealth</td><td>10</td><td>7</td><td>2</td><td>1</td><td>0</td><td>15</td><td>.750</td></tr>\
            <tr><td>Devils</td><td>10</td><td>6</td><td>3</td><td>1</td><td>0</td><td>13</td><td>.650</td></tr>\
            <tr><td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td></tr>\
            </table>";
        let source = StaticPageSource::new().with_page(PageRequest::Standings, html);

        let snapshot = orchestrator(source).scrape::<TeamStanding>(date()).await;
        let platinum = snapshot.records(Division::Platinum);

        assert_eq!(platinum.len(), 2);
        assert_eq!((platinum[0].team.as_str(), platinum[0].position), ("Stealth", 1));
        assert_eq!((platinum[0].pts, platinum[0].wpct), (15, 0.75));
        assert_eq!((platinum[1].team.as_str(), platinum[1].position), ("Devils", 2));
        assert_eq!((platinum[1].pts, platinum[1].wpct), (13, 0.65));
    }

    #[tokio::test]
    async fn test_standings_fetch_failure_yields_empty_snapshot() {
        let snapshot = orchestrator(StaticPageSource::new()).scrape::<TeamStanding>(date()).await;

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.divisions.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_division_does_not_abort_others() {
        let stats = |div_id: &str| PageRequest::Stats {
            div_id: div_id.to_string(),
            stat_type: StatType::Player,
        };
        // No page for Gold (102)
        let source = StaticPageSource::new()
            .with_page(stats("101"), player_page(&[("Sam Reed", "Stealth"), ("Ola Berg", "Devils")]))
            .with_page(stats("103"), player_page(&[("Max Ito", "Ravens")]))
            .with_page(stats("104"), "<p>No stats yet</p>");

        let snapshot = orchestrator(source).scrape::<PlayerStats>(date()).await;

        let platinum = snapshot.records(Division::Platinum);
        assert_eq!(platinum.len(), 2);
        assert_eq!(platinum[0].name, "Sam Reed");
        assert_eq!(platinum[1].rank, 2);
        assert!(snapshot.records(Division::Gold).is_empty());
        assert_eq!(snapshot.records(Division::Silver)[0].name, "Max Ito");
        assert!(snapshot.records(Division::Bronze).is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_division_is_isolated() {
        let goalie_page = "<table class=\"leaders\"><tbody>\
            <tr><td>#</td><td>Goalie</td><td>Team</td><td>GP</td><td>W</td><td>L</td><td>T</td>\
                <td>SA</td><td>GA</td><td>GAA</td><td>SV%</td><td>SO</td></tr>\
            <tr><td>1</td><td>Kim Lee</td><td>Devils</td><td>8</td><td>6</td><td>1</td><td>1</td>\
                <td>240</td><td>14</td><td>1.75</td><td>.942</td><td>2</td></tr>\
            </tbody></table>";
        let mut source = StaticPageSource::new();
        for div_id in ["101", "102", "103"] {
            source = source.with_page(
                PageRequest::Stats { div_id: div_id.to_string(), stat_type: StatType::Goalie },
                goalie_page,
            );
        }
        let mut targets = ScraperConfig::default().divisions;
        targets.retain(|t| t.division != Division::Silver);

        let snapshot =
            DivisionOrchestrator::new(source, targets).scrape::<GoalieStats>(date()).await;

        assert_eq!(snapshot.records(Division::Platinum).len(), 1);
        assert_eq!(snapshot.records(Division::Gold)[0].svpct, 0.942);
        assert!(snapshot.records(Division::Silver).is_empty());
        assert_eq!(snapshot.records(Division::Bronze).len(), 0);
        assert_eq!(snapshot.total_records(), 2);
    }
}
