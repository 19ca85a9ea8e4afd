//! Domain records carried in tab payloads.
//!
//! Every field is optional: the data service omits fields freely, and a
//! missing field must never fail a whole tab. Fields this crate does not
//! model are kept in `extra` so they survive a round trip to the renderer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

type Extra = BTreeMap<String, Value>;

/// Reads `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ============================================================================
// Shared references
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRef {
  pub id: Option<u64>,
  pub name: Option<String>,
  pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueRef {
  pub id: Option<u64>,
  pub name: Option<String>,
  pub country: Option<String>,
  pub logo: Option<String>,
  pub season: Option<i32>,
}

// ============================================================================
// Player records
// ============================================================================

/// Base attributes of a player, shown in the detail header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
  pub id: Option<u64>,
  pub name: Option<String>,
  pub firstname: Option<String>,
  pub lastname: Option<String>,
  pub age: Option<u32>,
  pub nationality: Option<String>,
  pub photo: Option<String>,
  pub height: Option<String>,
  pub weight: Option<String>,
  pub position: Option<String>,
  pub team: Option<TeamRef>,
  #[serde(flatten)]
  pub extra: Extra,
}

/// One season/competition line of a player's statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatistic {
  pub team: Option<TeamRef>,
  pub league: Option<LeagueRef>,
  #[serde(flatten)]
  pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureStatus {
  pub short: Option<String>,
  pub elapsed: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureInfo {
  pub id: Option<u64>,
  pub date: Option<String>,
  pub status: Option<FixtureStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureSide {
  pub id: Option<u64>,
  pub name: Option<String>,
  pub logo: Option<String>,
  pub winner: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureTeams {
  pub home: Option<FixtureSide>,
  pub away: Option<FixtureSide>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
  pub home: Option<i32>,
  pub away: Option<i32>,
}

/// A match, as listed on player fixtures and team overview/fixtures tabs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
  pub fixture: Option<FixtureInfo>,
  pub league: Option<LeagueRef>,
  pub teams: Option<FixtureTeams>,
  pub goals: Option<Score>,
  #[serde(flatten)]
  pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trophy {
  pub league: Option<String>,
  pub country: Option<String>,
  pub season: Option<String>,
  pub place: Option<String>,
  #[serde(flatten)]
  pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferTeams {
  #[serde(rename = "in")]
  pub incoming: Option<TeamRef>,
  #[serde(rename = "out")]
  pub outgoing: Option<TeamRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
  pub date: Option<String>,
  #[serde(rename = "type")]
  pub kind: Option<String>,
  pub teams: Option<TransferTeams>,
  #[serde(flatten)]
  pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Injury {
  #[serde(rename = "type")]
  pub kind: Option<String>,
  pub reason: Option<String>,
  pub date: Option<String>,
  pub team: Option<TeamRef>,
  pub league: Option<LeagueRef>,
  #[serde(flatten)]
  pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
  pub id: Option<u64>,
  pub name: Option<String>,
  pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRanking {
  pub player: Option<RankedPlayer>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub statistics: Vec<PlayerStatistic>,
}

/// League leader boards the player's league publishes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
  pub top_scorers: Option<Vec<PlayerRanking>>,
  pub top_assists: Option<Vec<PlayerRanking>>,
  pub most_games_scored: Option<Vec<PlayerRanking>>,
  pub least_play_time: Option<Vec<PlayerRanking>>,
  pub top_red_cards: Option<Vec<PlayerRanking>>,
  pub top_yellow_cards: Option<Vec<PlayerRanking>>,
}

// ============================================================================
// Team records
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
  pub id: Option<u64>,
  pub name: Option<String>,
  pub code: Option<String>,
  pub country: Option<String>,
  pub founded: Option<i32>,
  pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
  pub id: Option<u64>,
  pub name: Option<String>,
  pub address: Option<String>,
  pub city: Option<String>,
  pub capacity: Option<u32>,
  pub surface: Option<String>,
  pub image: Option<String>,
}

/// Base attributes of a team, shown in the detail header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
  #[serde(default, deserialize_with = "null_as_default")]
  pub team: TeamSummary,
  pub venue: Option<Venue>,
}

/// Season statistics for the team's main league.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSeasonStats {
  pub league: Option<LeagueRef>,
  pub form: Option<String>,
  #[serde(flatten)]
  pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
  pub rank: Option<u32>,
  pub team: Option<TeamRef>,
  pub points: Option<i32>,
  pub goals_diff: Option<i32>,
  pub form: Option<String>,
  #[serde(flatten)]
  pub extra: Extra,
}

/// A league table the team appears in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Standing {
  pub league: Option<LeagueRef>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub standings: Vec<StandingRow>,
}

/// A player or coach in the squad list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SquadMember {
  pub id: Option<u64>,
  pub name: Option<String>,
  pub age: Option<u32>,
  pub number: Option<u32>,
  pub position: Option<String>,
  pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadPlayerStats {
  pub appearances: Option<u32>,
  pub goals: Option<u32>,
  pub assists: Option<u32>,
  pub yellow_cards: Option<u32>,
  pub red_cards: Option<u32>,
  #[serde(flatten)]
  pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamTransfers {
  #[serde(rename = "in", default, deserialize_with = "null_as_default")]
  pub incoming: Vec<Transfer>,
  #[serde(rename = "out", default, deserialize_with = "null_as_default")]
  pub outgoing: Vec<Transfer>,
}
