use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use validator::Validate;

use crate::error::{Result, ScoringError};

const HALF_PLUS_ONE: &str = "calendarEvents/2+1";

fn default_open_count() -> u32 {
    4
}

fn default_women_count() -> u32 {
    1
}

/// A count that is either fixed or derived from the number of calendar events.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    #[validate(range(min = 1, max = 100, message = "count must be between 1 and 100"))]
    pub count: Option<u32>,
    pub formula: Option<String>,
    #[validate(range(min = 1, max = 100, message = "cap must be between 1 and 100"))]
    pub cap: Option<u32>,
}

impl RuleDefinition {
    fn resolve(&self, rule: &str, calendar_events: usize) -> Result<u32> {
        let formula = self.formula.as_deref().map(str::trim).filter(|f| !f.is_empty());

        match (self.count, formula) {
            (Some(_), Some(_)) => Err(ScoringError::InvalidRule {
                rule: rule.to_string(),
                reason: "count and formula are mutually exclusive".to_string(),
            }),
            (Some(count), None) => Ok(count),
            (None, Some(formula)) => {
                let value = evaluate_formula(formula, calendar_events)?;
                Ok(self.cap.map_or(value, |cap| value.min(cap)))
            }
            (None, None) => Err(ScoringError::InvalidRule {
                rule: rule.to_string(),
                reason: "rule definition must have either count or formula".to_string(),
            }),
        }
    }
}

fn evaluate_formula(formula: &str, calendar_events: usize) -> Result<u32> {
    match formula {
        HALF_PLUS_ONE => Ok((calendar_events / 2 + 1) as u32),
        other => Err(ScoringError::UnsupportedFormula(other.to_string())),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MixedDistanceRule {
    #[serde(flatten)]
    #[validate(nested)]
    pub definition: RuleDefinition,
    pub non_ten_minimum: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeamRuleDefinition {
    #[serde(default = "default_open_count")]
    #[validate(range(min = 1, max = 20))]
    pub open_count: u32,
    #[serde(default = "default_women_count")]
    #[validate(range(max = 20))]
    pub women_count: u32,
}

impl Default for TeamRuleDefinition {
    fn default() -> Self {
        Self {
            open_count: default_open_count(),
            women_count: default_women_count(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoundRobinRuleDefinition {
    #[serde(flatten)]
    #[validate(nested)]
    pub definition: RuleDefinition,
    #[serde(default)]
    pub minimum: u32,
    #[serde(default)]
    #[validate(nested)]
    pub team: TeamRuleDefinition,
}

/// Rule block for one season, as written in the rules file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRules {
    pub year: i32,
    pub league_sponsor: Option<String>,
    #[validate(nested)]
    pub ten_mile: RuleDefinition,
    #[validate(nested)]
    pub mixed_distance: MixedDistanceRule,
    #[validate(nested)]
    pub round_robin: Option<RoundRobinRuleDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
struct RulesFile {
    seasons: Vec<SeasonRules>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundRobinRules {
    pub count: u32,
    pub minimum: u32,
    pub team_open_count: u32,
    pub team_women_count: u32,
}

/// Resolved counts for one season's competitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompetitionRules {
    /// Year of the rule block that applied.
    pub rules_year: i32,
    pub ten_mile_count: u32,
    pub non_ten_minimum: u32,
    pub mixed_event_count: u32,
    pub league_sponsor: Option<String>,
    pub round_robin: RoundRobinRules,
}

/// Season rule blocks keyed by year, resolved with year fallback.
#[derive(Debug, Clone, Default)]
pub struct CompetitionRulesProvider {
    by_year: BTreeMap<i32, SeasonRules>,
}

impl CompetitionRulesProvider {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: RulesFile = serde_json::from_str(json)?;
        Self::from_seasons(file.seasons)
    }

    /// Rejects invalid blocks and more than one block for the same year.
    pub fn from_seasons(seasons: Vec<SeasonRules>) -> Result<Self> {
        let mut by_year = BTreeMap::new();
        for season in seasons {
            season.validate()?;
            let year = season.year;
            if by_year.insert(year, season).is_some() {
                return Err(ScoringError::DuplicateRules(year));
            }
        }
        Ok(Self { by_year })
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    /// Resolves counts for `season` using the latest rule block not after it.
    ///
    /// Formulas are evaluated against the number of championship events, or
    /// round robin events for the round robin block.
    pub fn rules_for(
        &self,
        season: i32,
        championship_events: usize,
        round_robin_events: usize,
    ) -> Result<CompetitionRules> {
        let (&year, config) = self
            .by_year
            .range(..=season)
            .next_back()
            .ok_or(ScoringError::NoRulesForSeason(season))?;

        let ten_mile_count = config.ten_mile.resolve("tenMile", championship_events)?;
        let mixed_event_count = config
            .mixed_distance
            .definition
            .resolve("mixedDistance", championship_events)?;
        let non_ten_minimum = config.mixed_distance.non_ten_minimum.unwrap_or(0);

        if non_ten_minimum > mixed_event_count {
            return Err(ScoringError::InvalidRule {
                rule: "mixedDistance".to_string(),
                reason: format!(
                    "nonTenMinimum {} exceeds the mixed event count {}",
                    non_ten_minimum, mixed_event_count
                ),
            });
        }

        let round_robin = match &config.round_robin {
            Some(rr) => {
                let has_definition = rr.definition.count.is_some() || rr.definition.formula.is_some();
                let count = if has_definition {
                    rr.definition.resolve("roundRobin", round_robin_events)?
                } else {
                    mixed_event_count
                };
                RoundRobinRules {
                    count,
                    minimum: rr.minimum,
                    team_open_count: rr.team.open_count,
                    team_women_count: rr.team.women_count,
                }
            }
            None => RoundRobinRules {
                count: mixed_event_count,
                minimum: 0,
                team_open_count: default_open_count(),
                team_women_count: default_women_count(),
            },
        };

        info!(
            "Season {} uses {} rules: best {} tens, best {} mixed with {} non-ten minimum",
            season, year, ten_mile_count, mixed_event_count, non_ten_minimum
        );

        Ok(CompetitionRules {
            rules_year: year,
            ten_mile_count,
            non_ten_minimum,
            mixed_event_count,
            league_sponsor: config.league_sponsor.clone(),
            round_robin,
        })
    }
}
