use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::Division;

/// Configuration for fetching league pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Standings page holding one table per division
    pub standings_url: String,

    /// Stats page, queried with `divID` and `statType`
    pub stats_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// External `divID` of each division
    pub divisions: Vec<DivisionTarget>,
}

/// Pairs a division with the site's identifier for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionTarget {
    pub division: Division,
    pub div_id: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            standings_url: "https://stats.example-hockey.org/standings".to_string(),
            stats_url: "https://stats.example-hockey.org/stats".to_string(),
            user_agent: format!("league-tracker/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            divisions: vec![
                DivisionTarget { division: Division::Platinum, div_id: "101".to_string() },
                DivisionTarget { division: Division::Gold, div_id: "102".to_string() },
                DivisionTarget { division: Division::Silver, div_id: "103".to_string() },
                DivisionTarget { division: Division::Bronze, div_id: "104".to_string() },
            ],
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured `divID` for a division
    pub fn div_id(&self, division: Division) -> Option<&str> {
        self.divisions.iter().find(|t| t.division == division).map(|t| t.div_id.as_str())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [("standings_url", &self.standings_url), ("stats_url", &self.stats_url)] {
            if reqwest::Url::parse(url).is_err() {
                return Err(format!("{name} is not a valid URL: {url}"));
            }
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        for division in Division::ALL {
            let count = self.divisions.iter().filter(|t| t.division == division).count();
            if count > 1 {
                return Err(format!("division {division} is configured {count} times"));
            }
        }

        if let Some(target) = self.divisions.iter().find(|t| t.div_id.trim().is_empty()) {
            return Err(format!("division {} has an empty div_id", target.division));
        }

        Ok(())
    }
}
