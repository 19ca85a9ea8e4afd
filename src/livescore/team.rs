//! Team detail page configuration.

use color_eyre::Report;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::api_types::{sub_data, TeamResponse};
use super::types::{
  Fixture, SquadMember, SquadPlayerStats, Standing, TeamProfile, TeamSeasonStats, TeamTransfers,
};
use crate::cache::{parse_tab, EntityKind, FetchOption, FetchOptions, TabKey, TabRequirement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamTab {
  Overview,
  Squad,
  Standings,
  Stats,
  Fixtures,
  Transfers,
}

impl TabKey for TeamTab {
  const ALL: &'static [Self] = &[
    Self::Overview,
    Self::Squad,
    Self::Standings,
    Self::Stats,
    Self::Fixtures,
    Self::Transfers,
  ];

  fn as_str(self) -> &'static str {
    match self {
      Self::Overview => "overview",
      Self::Squad => "squad",
      Self::Standings => "standings",
      Self::Stats => "stats",
      Self::Fixtures => "fixtures",
      Self::Transfers => "transfers",
    }
  }
}

impl fmt::Display for TeamTab {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for TeamTab {
  type Err = Report;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    parse_tab(Team::KIND, s)
  }
}

/// Data shown on one team tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tab", rename_all = "lowercase")]
pub enum TeamPayload {
  Overview {
    matches: Vec<Fixture>,
    standings: Vec<Standing>,
    season_stats: Option<TeamSeasonStats>,
  },
  Squad {
    squad: Vec<SquadMember>,
    player_stats: BTreeMap<String, SquadPlayerStats>,
  },
  Standings {
    standings: Vec<Standing>,
  },
  Stats {
    season_stats: Option<TeamSeasonStats>,
    player_stats: BTreeMap<String, SquadPlayerStats>,
  },
  Fixtures {
    matches: Vec<Fixture>,
  },
  Transfers {
    transfers: TeamTransfers,
  },
}

const TEAM_REQUIREMENTS: &[TabRequirement<TeamTab>] = &[
  TabRequirement {
    tab: TeamTab::Overview,
    fields: &["teamData", "matches", "standings"],
    required: &["matches", "standings"],
    options: FetchOptions::new(&[FetchOption::Matches, FetchOption::Standings]),
  },
  TabRequirement {
    tab: TeamTab::Squad,
    fields: &["squad", "playerStats"],
    required: &["squad", "playerStats"],
    options: FetchOptions::new(&[FetchOption::Squad, FetchOption::PlayerStats]),
  },
  TabRequirement {
    tab: TeamTab::Standings,
    fields: &["standings"],
    required: &["standings"],
    options: FetchOptions::new(&[FetchOption::Standings]),
  },
  TabRequirement {
    tab: TeamTab::Stats,
    fields: &["teamData", "playerStats"],
    required: &["teamData", "playerStats"],
    options: FetchOptions::new(&[FetchOption::PlayerStats]),
  },
  TabRequirement {
    tab: TeamTab::Fixtures,
    fields: &["matches"],
    required: &["matches"],
    options: FetchOptions::new(&[FetchOption::Matches]),
  },
  TabRequirement {
    tab: TeamTab::Transfers,
    fields: &["transfers"],
    required: &["transfers"],
    options: FetchOptions::new(&[FetchOption::Transfers]),
  },
];

/// Team detail pages.
#[derive(Debug, Clone, Copy)]
pub struct Team;

impl EntityKind for Team {
  type Tab = TeamTab;
  type Payload = TeamPayload;
  type Profile = TeamProfile;
  type Response = TeamResponse;

  const KIND: &'static str = "team";
  const REQUIREMENTS: &'static [TabRequirement<TeamTab>] = TEAM_REQUIREMENTS;

  fn payload(tab: TeamTab, response: &TeamResponse) -> TeamPayload {
    match tab {
      TeamTab::Overview => TeamPayload::Overview {
        matches: sub_data(&response.matches),
        standings: sub_data(&response.standings),
        season_stats: response.season_stats(),
      },
      TeamTab::Squad => TeamPayload::Squad {
        squad: sub_data(&response.squad),
        player_stats: sub_data(&response.player_stats),
      },
      TeamTab::Standings => TeamPayload::Standings {
        standings: sub_data(&response.standings),
      },
      TeamTab::Stats => TeamPayload::Stats {
        season_stats: response.season_stats(),
        player_stats: sub_data(&response.player_stats),
      },
      TeamTab::Fixtures => TeamPayload::Fixtures {
        matches: sub_data(&response.matches),
      },
      TeamTab::Transfers => TeamPayload::Transfers {
        transfers: sub_data(&response.transfers),
      },
    }
  }

  fn profile(response: &TeamResponse) -> Option<TeamProfile> {
    response.team_data.as_ref().and_then(|t| t.team.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_requirement_table_is_total() {
    for tab in TeamTab::ALL {
      assert_eq!(Team::requirement(*tab).tab, *tab);
      let requirement = Team::requirement(*tab);
      assert!(!requirement.options.query_pairs().is_empty());
      assert!(!requirement.required.is_empty());
      assert!(requirement
        .required
        .iter()
        .all(|field| requirement.fields.contains(field)));
    }
    assert_eq!(TEAM_REQUIREMENTS.len(), TeamTab::ALL.len());
  }

  #[test]
  fn test_overview_asks_for_matches_and_standings() {
    assert_eq!(
      Team::requirement(TeamTab::Overview).options.query_pairs(),
      vec![("fetchMatches", "true"), ("fetchStandings", "true")]
    );
  }

  #[test]
  fn test_unknown_tab_is_rejected() {
    let err = "history".parse::<TeamTab>().unwrap_err().to_string();
    assert!(err.contains("unknown team tab 'history'"));
    assert!(err.contains("overview, squad, standings, stats, fixtures, transfers"));
  }

  #[test]
  fn test_squad_payload_keeps_player_stats_keyed_by_id() {
    let response: TeamResponse = serde_json::from_value(json!({
      "squad": { "success": true, "data": [{ "id": 882, "name": "D. de Gea", "number": 1 }] },
      "playerStats": { "success": true, "data": { "882": { "appearances": 38 } } }
    }))
    .unwrap();

    match Team::payload(TeamTab::Squad, &response) {
      TeamPayload::Squad {
        squad,
        player_stats,
      } => {
        assert_eq!(squad[0].number, Some(1));
        assert_eq!(player_stats["882"].appearances, Some(38));
      }
      other => panic!("unexpected payload {:?}", other),
    }
  }

  #[test]
  fn test_transfers_split_in_and_out() {
    let response: TeamResponse = serde_json::from_value(json!({
      "transfers": { "success": true, "data": { "in": [{ "date": "2023-07-05" }], "out": [] } }
    }))
    .unwrap();

    match Team::payload(TeamTab::Transfers, &response) {
      TeamPayload::Transfers { transfers } => {
        assert_eq!(transfers.incoming.len(), 1);
        assert!(transfers.outgoing.is_empty());
      }
      other => panic!("unexpected payload {:?}", other),
    }
  }

  #[test]
  fn test_profile_comes_from_team_data() {
    let response: TeamResponse = serde_json::from_value(json!({
      "teamData": {
        "success": true,
        "team": {
          "team": { "id": 33, "name": "Manchester United", "founded": 1878 },
          "venue": { "name": "Old Trafford", "capacity": 76212 }
        },
        "stats": { "form": "WWDLW" }
      }
    }))
    .unwrap();

    let profile = Team::profile(&response).unwrap();
    assert_eq!(profile.team.founded, Some(1878));
    assert_eq!(profile.venue.unwrap().capacity, Some(76212));
    assert_eq!(response.season_stats().unwrap().form.as_deref(), Some("WWDLW"));
  }
}
