//! Football player and team detail pages backed by the livescore API.

pub mod api_types;
mod client;
mod player;
mod team;
pub mod types;

pub use client::HttpDataSource;
pub use player::{Player, PlayerPayload, PlayerTab};
pub use team::{Team, TeamPayload, TeamTab};
pub use types::{PlayerProfile, TeamProfile};
