//! Detail page controller.
//!
//! One controller backs one open detail page. It owns the tab cache, the
//! shared profile and the fetch coordinator, and exposes the read-only state
//! the renderer draws from.

use color_eyre::{eyre::eyre, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{EntityCache, EntityId, EntityKind};
use crate::fetch::{Completion, DataSource, Ensure, FetchCoordinator};
use crate::merge;

pub struct DetailController<K: EntityKind> {
  entity: EntityId,
  current_tab: K::Tab,
  cache: EntityCache<K::Tab, K::Payload>,
  profile: Option<K::Profile>,
  error: Option<String>,
  hydrated: bool,
  coordinator: FetchCoordinator<K>,
}

impl<K: EntityKind> DetailController<K> {
  /// Mount a controller for `entity`. Nothing is fetched until a tab is
  /// selected.
  pub fn new(
    source: Arc<dyn DataSource>,
    entity: impl Into<EntityId>,
    initial_tab: K::Tab,
  ) -> Self {
    let mut coordinator = FetchCoordinator::new(source);
    coordinator.advance();
    Self {
      entity: entity.into(),
      current_tab: initial_tab,
      cache: EntityCache::new(),
      profile: None,
      error: None,
      hydrated: false,
      coordinator,
    }
  }

  /// Seed the cache with data delivered alongside the page.
  ///
  /// Allowed once per controller, for the current entity. A rejected
  /// payload does not count.
  pub fn hydrate(&mut self, initial: Value) -> Result<Vec<K::Tab>> {
    if self.hydrated {
      return Err(eyre!("{} {} was already hydrated", K::KIND, self.entity));
    }

    let seeded = merge::hydrate::<K>(&mut self.cache, &mut self.profile, &self.entity, initial)?;
    self.hydrated = true;
    info!(kind = K::KIND, entity = %self.entity, count = seeded.len(), "hydrated detail page");
    Ok(seeded)
  }

  /// Switch to `tab`, fetching its data unless it is cached or in flight.
  pub fn select_tab(&mut self, tab: K::Tab) -> Ensure {
    self.current_tab = tab;
    self.error = None;
    self.coordinator.ensure(&self.cache, &self.entity, tab)
  }

  /// Show `entity` on `tab`.
  ///
  /// A different entity drops everything cached for the previous one and
  /// cancels its in-flight requests before the tab is selected.
  pub fn load_entity(&mut self, entity: impl Into<EntityId>, tab: K::Tab) -> Ensure {
    let entity = entity.into();
    if entity != self.entity {
      info!(kind = K::KIND, from = %self.entity, to = %entity, "switching entity");
      self.cache.reset_for(&self.entity);
      self.coordinator.cancel_all();
      self.coordinator.advance();
      self.profile = None;
      self.entity = entity;
    }
    self.select_tab(tab)
  }

  /// Apply every finished request without waiting. Returns whether any
  /// visible state changed.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Some(completion) = self.coordinator.try_next() {
      changed |= self.apply(completion);
    }
    changed
  }

  /// Wait until no request is in flight, applying results as they arrive.
  pub async fn settle(&mut self) {
    while self.coordinator.has_pending() {
      match self.coordinator.next().await {
        Some(completion) => {
          self.apply(completion);
        }
        None => break,
      }
    }
    self.poll();
  }

  fn apply(&mut self, completion: Completion<K::Tab>) -> bool {
    let Some((key, result)) = self.coordinator.resolve(completion) else {
      return false;
    };

    let outcome = result.and_then(|raw| {
      merge::merge::<K>(&mut self.cache, &mut self.profile, &key.entity, key.tab, raw)
    });
    match outcome {
      Ok(()) => {
        debug!(kind = K::KIND, entity = %key.entity, tab = %key.tab, "tab loaded");
      }
      Err(e) => {
        warn!(kind = K::KIND, entity = %key.entity, tab = %key.tab, error = %e, "tab fetch failed");
        self.error = Some(e.to_string());
      }
    }
    true
  }

  pub fn entity_id(&self) -> &EntityId {
    &self.entity
  }

  pub fn current_tab(&self) -> K::Tab {
    self.current_tab
  }

  /// Whether the current tab's data is still on its way.
  pub fn is_loading(&self) -> bool {
    self.is_tab_loading(self.current_tab)
  }

  pub fn is_tab_loading(&self, tab: K::Tab) -> bool {
    self.coordinator.is_pending(&self.entity, tab)
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn shared_profile(&self) -> Option<&K::Profile> {
    self.profile.as_ref()
  }

  pub fn payload_for(&self, tab: K::Tab) -> Option<&K::Payload> {
    self
      .cache
      .get(&self.entity, tab)
      .filter(|entry| entry.is_loaded)
      .map(|entry| &entry.payload)
  }

  pub fn is_tab_loaded(&self, tab: K::Tab) -> bool {
    self.cache.is_loaded(&self.entity, tab)
  }

  pub fn loaded_tabs(&self) -> Vec<K::Tab> {
    self.cache.loaded_tabs(&self.entity)
  }

  pub fn has_all(&self, tabs: &[K::Tab]) -> bool {
    self.cache.has_all(&self.entity, tabs)
  }
}
