//! Per-entity tab cache for detail views.
//!
//! This module is entity-agnostic:
//! - `EntityKind` describes one kind of detail page (its tabs, payloads and shared profile)
//! - `TabRequirement` tables map each tab to the data fields and fetch options it needs
//! - `EntityCache` stores one loaded payload per (entity, tab) for the lifetime of a controller
//!
//! Entries never expire; they are only dropped when the viewed entity changes
//! or the owning controller is torn down.

mod store;
mod traits;

pub use store::{CacheEntry, EntityCache};
pub use traits::{
  parse_tab, requirement_for, EntityId, EntityKind, FetchOption, FetchOptions, TabKey,
  TabRequirement,
};
