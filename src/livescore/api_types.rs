//! Serde-deserializable shapes of the data service responses.
//!
//! Every field is optional and `null` reads as absent. Conversion into tab
//! payloads lives with each entity kind.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::types::{
  Fixture, Injury, PlayerProfile, PlayerStatistic, Rankings, SquadMember, SquadPlayerStats,
  Standing, TeamProfile, TeamSeasonStats, TeamTransfers, Transfer, Trophy,
};

// ============================================================================
// Player response
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct FixtureList {
  pub data: Option<Vec<Fixture>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
  pub player_data: Option<PlayerProfile>,
  pub seasons: Option<Vec<i32>>,
  pub statistics: Option<Vec<PlayerStatistic>>,
  pub fixtures: Option<FixtureList>,
  pub trophies: Option<Vec<Trophy>>,
  pub transfers: Option<Vec<Transfer>>,
  pub injuries: Option<Vec<Injury>>,
  pub rankings: Option<Rankings>,
}

// ============================================================================
// Team response
// ============================================================================

/// Team sub-results arrive wrapped as `{ success, data?, message }`.
///
/// Only `data` is read. A failed sub-result carries no data and so yields
/// the empty container, leaving the rest of the response usable.
#[derive(Debug, Deserialize)]
pub struct SubResult<T> {
  pub data: Option<T>,
}

/// Data of a sub-result, or the empty container when absent.
pub fn sub_data<T: Clone + Default>(sub: &Option<SubResult<T>>) -> T {
  sub
    .as_ref()
    .and_then(|s| s.data.clone())
    .unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamDataResponse {
  pub team: Option<TeamProfile>,
  pub stats: Option<TeamSeasonStats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
  pub team_data: Option<TeamDataResponse>,
  pub matches: Option<SubResult<Vec<Fixture>>>,
  pub squad: Option<SubResult<Vec<SquadMember>>>,
  /// Keyed by player id
  pub player_stats: Option<SubResult<BTreeMap<String, SquadPlayerStats>>>,
  pub standings: Option<SubResult<Vec<Standing>>>,
  pub transfers: Option<SubResult<TeamTransfers>>,
}

impl TeamResponse {
  pub fn season_stats(&self) -> Option<TeamSeasonStats> {
    self.team_data.as_ref().and_then(|t| t.stats.clone())
  }
}
