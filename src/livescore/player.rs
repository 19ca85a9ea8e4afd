//! Player detail page configuration.

use color_eyre::Report;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::api_types::PlayerResponse;
use super::types::{
  Fixture, Injury, PlayerProfile, PlayerStatistic, Rankings, Transfer, Trophy,
};
use crate::cache::{parse_tab, EntityKind, FetchOption, FetchOptions, TabKey, TabRequirement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerTab {
  Stats,
  Fixtures,
  Trophies,
  Transfers,
  Injuries,
  Rankings,
}

impl TabKey for PlayerTab {
  const ALL: &'static [Self] = &[
    Self::Stats,
    Self::Fixtures,
    Self::Trophies,
    Self::Transfers,
    Self::Injuries,
    Self::Rankings,
  ];

  fn as_str(self) -> &'static str {
    match self {
      Self::Stats => "stats",
      Self::Fixtures => "fixtures",
      Self::Trophies => "trophies",
      Self::Transfers => "transfers",
      Self::Injuries => "injuries",
      Self::Rankings => "rankings",
    }
  }
}

impl fmt::Display for PlayerTab {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PlayerTab {
  type Err = Report;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    parse_tab(Player::KIND, s)
  }
}

/// Data shown on one player tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tab", rename_all = "lowercase")]
pub enum PlayerPayload {
  Stats {
    seasons: Vec<i32>,
    statistics: Vec<PlayerStatistic>,
  },
  Fixtures {
    fixtures: Vec<Fixture>,
  },
  Trophies {
    trophies: Vec<Trophy>,
  },
  Transfers {
    transfers: Vec<Transfer>,
  },
  Injuries {
    injuries: Vec<Injury>,
  },
  Rankings {
    rankings: Option<Rankings>,
  },
}

const PLAYER_REQUIREMENTS: &[TabRequirement<PlayerTab>] = &[
  TabRequirement {
    tab: PlayerTab::Stats,
    fields: &["seasons", "statistics"],
    required: &["statistics"],
    options: FetchOptions::new(&[FetchOption::Seasons, FetchOption::Stats]),
  },
  TabRequirement {
    tab: PlayerTab::Fixtures,
    fields: &["fixtures"],
    required: &["fixtures"],
    options: FetchOptions::new(&[FetchOption::Seasons, FetchOption::Fixtures]),
  },
  TabRequirement {
    tab: PlayerTab::Trophies,
    fields: &["trophies"],
    required: &["trophies"],
    options: FetchOptions::new(&[FetchOption::Trophies]),
  },
  TabRequirement {
    tab: PlayerTab::Transfers,
    fields: &["transfers"],
    required: &["transfers"],
    options: FetchOptions::new(&[FetchOption::Transfers]),
  },
  TabRequirement {
    tab: PlayerTab::Injuries,
    fields: &["injuries"],
    required: &["injuries"],
    options: FetchOptions::new(&[FetchOption::Injuries]),
  },
  TabRequirement {
    tab: PlayerTab::Rankings,
    fields: &["rankings"],
    required: &["rankings"],
    options: FetchOptions::new(&[FetchOption::Rankings]),
  },
];

/// Player detail pages.
#[derive(Debug, Clone, Copy)]
pub struct Player;

impl EntityKind for Player {
  type Tab = PlayerTab;
  type Payload = PlayerPayload;
  type Profile = PlayerProfile;
  type Response = PlayerResponse;

  const KIND: &'static str = "player";
  const REQUIREMENTS: &'static [TabRequirement<PlayerTab>] = PLAYER_REQUIREMENTS;

  fn payload(tab: PlayerTab, response: &PlayerResponse) -> PlayerPayload {
    match tab {
      PlayerTab::Stats => PlayerPayload::Stats {
        seasons: response.seasons.clone().unwrap_or_default(),
        statistics: response.statistics.clone().unwrap_or_default(),
      },
      PlayerTab::Fixtures => PlayerPayload::Fixtures {
        fixtures: response
          .fixtures
          .as_ref()
          .and_then(|f| f.data.clone())
          .unwrap_or_default(),
      },
      PlayerTab::Trophies => PlayerPayload::Trophies {
        trophies: response.trophies.clone().unwrap_or_default(),
      },
      PlayerTab::Transfers => PlayerPayload::Transfers {
        transfers: response.transfers.clone().unwrap_or_default(),
      },
      PlayerTab::Injuries => PlayerPayload::Injuries {
        injuries: response.injuries.clone().unwrap_or_default(),
      },
      PlayerTab::Rankings => PlayerPayload::Rankings {
        rankings: response.rankings.clone(),
      },
    }
  }

  fn profile(response: &PlayerResponse) -> Option<PlayerProfile> {
    response.player_data.clone()
  }
}
