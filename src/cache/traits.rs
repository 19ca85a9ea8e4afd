//! Core traits and types that parameterize the detail cache.

use color_eyre::{eyre::eyre, Report, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Identifier of the player or team being viewed.
///
/// The data service accepts both numeric and string ids, so the id is kept
/// in its textual form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for EntityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for EntityId {
  fn from(id: &str) -> Self {
    Self(id.trim().to_string())
  }
}

impl From<String> for EntityId {
  fn from(id: String) -> Self {
    Self::from(id.as_str())
  }
}

impl From<u64> for EntityId {
  fn from(id: u64) -> Self {
    Self(id.to_string())
  }
}

/// A tab of a detail page.
///
/// Implemented by closed enums; `ALL` lists the variants in presentation order.
pub trait TabKey:
  Copy
  + Eq
  + Ord
  + Hash
  + fmt::Debug
  + fmt::Display
  + FromStr<Err = Report>
  + Send
  + Sync
  + 'static
{
  const ALL: &'static [Self];

  /// Identifier used in URLs, config files and commands (e.g. "stats").
  fn as_str(self) -> &'static str;
}

/// Parse a tab name for the given entity kind.
///
/// Matching is case-insensitive. Unknown names are rejected rather than
/// mapped to a default tab.
pub fn parse_tab<T: TabKey>(kind: &str, name: &str) -> Result<T> {
  let needle = name.trim();
  T::ALL
    .iter()
    .copied()
    .find(|tab| tab.as_str().eq_ignore_ascii_case(needle))
    .ok_or_else(|| {
      let known: Vec<&str> = T::ALL.iter().map(|t| t.as_str()).collect();
      eyre!(
        "unknown {} tab '{}' (expected one of: {})",
        kind,
        name,
        known.join(", ")
      )
    })
}

/// A single flag understood by the data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FetchOption {
  Seasons,
  Stats,
  Fixtures,
  Trophies,
  Transfers,
  Injuries,
  Rankings,
  Matches,
  Squad,
  PlayerStats,
  Standings,
}

impl FetchOption {
  /// Query parameter name sent to the data service.
  pub fn param(self) -> &'static str {
    match self {
      Self::Seasons => "fetchSeasons",
      Self::Stats => "fetchStats",
      Self::Fixtures => "fetchFixtures",
      Self::Trophies => "fetchTrophies",
      Self::Transfers => "fetchTransfers",
      Self::Injuries => "fetchInjuries",
      Self::Rankings => "fetchRankings",
      Self::Matches => "fetchMatches",
      Self::Squad => "fetchSquad",
      Self::PlayerStats => "fetchPlayerStats",
      Self::Standings => "fetchStandings",
    }
  }
}

/// The set of flags one tab requirement asks the data service for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions(&'static [FetchOption]);

impl FetchOptions {
  pub const fn new(options: &'static [FetchOption]) -> Self {
    Self(options)
  }

  pub fn iter(&self) -> impl Iterator<Item = FetchOption> + '_ {
    self.0.iter().copied()
  }

  pub fn contains(&self, option: FetchOption) -> bool {
    self.0.contains(&option)
  }

  /// Flags as `fetchX=true` query pairs.
  pub fn query_pairs(&self) -> Vec<(&'static str, &'static str)> {
    self.iter().map(|o| (o.param(), "true")).collect()
  }
}

/// Static description of what one tab needs.
#[derive(Debug)]
pub struct TabRequirement<T> {
  pub tab: T,
  /// Response fields that make up the tab's payload.
  pub fields: &'static [&'static str],
  /// Subset of `fields` that seeded data must carry. The rest default to
  /// empty.
  pub required: &'static [&'static str],
  pub options: FetchOptions,
}

/// Look up the requirement for `tab`.
///
/// # Panics
///
/// Panics when the table has no row for `tab`. Every tab variant must be
/// registered; serving another tab's data instead would hide the bug.
pub fn requirement_for<T: TabKey>(
  table: &'static [TabRequirement<T>],
  tab: T,
) -> &'static TabRequirement<T> {
  table
    .iter()
    .find(|requirement| requirement.tab == tab)
    .unwrap_or_else(|| panic!("no tab requirement registered for '{}'", tab))
}

/// One kind of detail page (player, team).
///
/// Supplies the static configuration the generic engine runs on: the tab set,
/// the requirement table, the payload sum type and the shared profile.
pub trait EntityKind: Send + Sync + 'static {
  type Tab: TabKey;
  /// Tab payload; one variant per tab.
  type Payload: Clone + fmt::Debug + Serialize + Send + 'static;
  /// Base attributes shown in the page header.
  type Profile: Clone + fmt::Debug + Serialize + Send + 'static;
  /// Raw data service response. Every field is optional.
  type Response: DeserializeOwned;

  /// Entity type name (e.g. "player").
  const KIND: &'static str;

  const REQUIREMENTS: &'static [TabRequirement<Self::Tab>];

  /// Build the payload for `tab` from a response, defaulting absent fields.
  fn payload(tab: Self::Tab, response: &Self::Response) -> Self::Payload;

  /// Shared profile carried by a response, if any.
  fn profile(response: &Self::Response) -> Option<Self::Profile>;

  fn requirement(tab: Self::Tab) -> &'static TabRequirement<Self::Tab> {
    requirement_for(Self::REQUIREMENTS, tab)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_entity_id_from_number_and_string_agree() {
    assert_eq!(EntityId::from(42u64), EntityId::from("42"));
    assert_eq!(EntityId::from(" 42 ").as_str(), "42");
  }

  #[test]
  fn test_query_pairs_preserve_table_order() {
    const OPTIONS: FetchOptions = FetchOptions::new(&[FetchOption::Seasons, FetchOption::Stats]);
    assert_eq!(
      OPTIONS.query_pairs(),
      vec![("fetchSeasons", "true"), ("fetchStats", "true")]
    );
    assert!(OPTIONS.contains(FetchOption::Stats));
    assert!(!OPTIONS.contains(FetchOption::Squad));
  }
}
