//! In-memory entity cache store.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::traits::{EntityId, TabKey};

/// A loaded tab payload for one entity.
#[derive(Debug, Clone)]
pub struct CacheEntry<T, P> {
  pub tab: T,
  pub entity: EntityId,
  pub payload: P,
  /// When the payload was stored
  pub loaded_at: DateTime<Utc>,
  pub is_loaded: bool,
}

/// Mapping of entity id -> tab -> cached payload.
///
/// At most one entry exists per (entity, tab); `put` overwrites. None of the
/// operations can fail.
#[derive(Debug)]
pub struct EntityCache<T: TabKey, P> {
  entries: HashMap<EntityId, HashMap<T, CacheEntry<T, P>>>,
}

impl<T: TabKey, P> Default for EntityCache<T, P> {
  fn default() -> Self {
    Self {
      entries: HashMap::new(),
    }
  }
}

impl<T: TabKey, P> EntityCache<T, P> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, entity: &EntityId, tab: T) -> Option<&CacheEntry<T, P>> {
    self.entries.get(entity).and_then(|tabs| tabs.get(&tab))
  }

  /// Insert or overwrite the entry for (entity, tab) and mark it loaded.
  pub fn put(&mut self, entity: &EntityId, tab: T, payload: P) {
    let entry = CacheEntry {
      tab,
      entity: entity.clone(),
      payload,
      loaded_at: Utc::now(),
      is_loaded: true,
    };
    self
      .entries
      .entry(entity.clone())
      .or_default()
      .insert(tab, entry);
  }

  pub fn is_loaded(&self, entity: &EntityId, tab: T) -> bool {
    self.get(entity, tab).is_some_and(|entry| entry.is_loaded)
  }

  /// Whether every tab in `tabs` is loaded for `entity`.
  pub fn has_all(&self, entity: &EntityId, tabs: &[T]) -> bool {
    tabs.iter().all(|tab| self.is_loaded(entity, *tab))
  }

  /// Loaded tabs for `entity`, in presentation order.
  pub fn loaded_tabs(&self, entity: &EntityId) -> Vec<T> {
    T::ALL
      .iter()
      .copied()
      .filter(|tab| self.is_loaded(entity, *tab))
      .collect()
  }

  /// Drop every entry for `entity`.
  pub fn reset_for(&mut self, entity: &EntityId) {
    self.entries.remove(entity);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::livescore::PlayerTab;

  fn cache() -> EntityCache<PlayerTab, &'static str> {
    EntityCache::new()
  }

  #[test]
  fn test_put_then_get() {
    let mut cache = cache();
    let id = EntityId::from("42");

    assert!(cache.get(&id, PlayerTab::Stats).is_none());

    cache.put(&id, PlayerTab::Stats, "stats");
    let entry = cache.get(&id, PlayerTab::Stats).unwrap();
    assert!(entry.is_loaded);
    assert_eq!(entry.payload, "stats");
    assert_eq!(entry.entity, id);
    assert_eq!(entry.tab, PlayerTab::Stats);
  }

  #[test]
  fn test_put_overwrites_existing_entry() {
    let mut cache = cache();
    let id = EntityId::from("42");

    cache.put(&id, PlayerTab::Trophies, "first");
    let first_loaded_at = cache.get(&id, PlayerTab::Trophies).unwrap().loaded_at;
    cache.put(&id, PlayerTab::Trophies, "second");

    let entry = cache.get(&id, PlayerTab::Trophies).unwrap();
    assert_eq!(entry.payload, "second");
    assert!(entry.loaded_at >= first_loaded_at);
    assert_eq!(cache.loaded_tabs(&id), vec![PlayerTab::Trophies]);
  }

  #[test]
  fn test_has_all() {
    let mut cache = cache();
    let id = EntityId::from("7");

    cache.put(&id, PlayerTab::Stats, "stats");
    assert!(cache.has_all(&id, &[PlayerTab::Stats]));
    assert!(!cache.has_all(&id, &[PlayerTab::Stats, PlayerTab::Fixtures]));

    cache.put(&id, PlayerTab::Fixtures, "fixtures");
    assert!(cache.has_all(&id, &[PlayerTab::Stats, PlayerTab::Fixtures]));
    assert!(cache.has_all(&id, &[]));
  }

  #[test]
  fn test_reset_for_only_touches_that_entity() {
    let mut cache = cache();
    let a = EntityId::from("1");
    let b = EntityId::from("2");

    cache.put(&a, PlayerTab::Stats, "a");
    cache.put(&b, PlayerTab::Stats, "b");
    cache.reset_for(&a);

    assert!(cache.get(&a, PlayerTab::Stats).is_none());
    assert_eq!(cache.get(&b, PlayerTab::Stats).unwrap().payload, "b");
    assert!(cache.loaded_tabs(&a).is_empty());
  }

  #[test]
  fn test_loaded_tabs_in_presentation_order() {
    let mut cache = cache();
    let id = EntityId::from("9");

    cache.put(&id, PlayerTab::Rankings, "r");
    cache.put(&id, PlayerTab::Stats, "s");
    cache.put(&id, PlayerTab::Injuries, "i");

    assert_eq!(
      cache.loaded_tabs(&id),
      vec![PlayerTab::Stats, PlayerTab::Injuries, PlayerTab::Rankings]
    );
  }
}
