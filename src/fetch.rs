//! Fetch coordination for detail tabs.
//!
//! The coordinator issues at most one request per (entity, tab) key, runs it
//! on a spawned task and hands the result back over a channel, tagged with
//! the generation that was current at dispatch time.
//!
//! # Example
//!
//! ```ignore
//! let mut coordinator = FetchCoordinator::<Player>::new(source);
//! coordinator.advance();
//!
//! match coordinator.ensure(&cache, &id, PlayerTab::Stats) {
//!     Ensure::Cached => render_from_cache(),
//!     Ensure::Joined | Ensure::Dispatched => render_spinner(),
//! }
//!
//! // In event loop tick
//! while let Some(completion) = coordinator.try_next() {
//!     if let Some((key, result)) = coordinator.resolve(completion) {
//!         // fold into cache
//!     }
//! }
//! ```

use color_eyre::{eyre::eyre, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::cache::{EntityCache, EntityId, EntityKind, FetchOptions};

/// The external data service.
///
/// One multiplexed call per tab requirement. The returned JSON carries a
/// `success` flag, an optional `message` and any tab-specific fields.
pub trait DataSource: Send + Sync {
  fn fetch_entity_data(
    &self,
    kind: &'static str,
    id: &EntityId,
    options: FetchOptions,
  ) -> BoxFuture<'static, Result<Value>>;
}

/// Identifies one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey<T> {
  pub entity: EntityId,
  pub tab: T,
}

/// Outcome of `FetchCoordinator::ensure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensure {
  /// Payload already loaded, nothing dispatched
  Cached,
  /// A request for the same key is already in flight
  Joined,
  /// A new request was dispatched
  Dispatched,
}

/// Result of a finished request, as delivered by its task.
#[derive(Debug)]
pub struct Completion<T> {
  key: FetchKey<T>,
  generation: u64,
  result: Result<Value>,
}

#[derive(Debug)]
struct PendingFetch {
  generation: u64,
  abort: AbortHandle,
}

/// Deduplicating, generation-aware request dispatcher for one controller.
pub struct FetchCoordinator<K: EntityKind> {
  source: Arc<dyn DataSource>,
  generation: u64,
  pending: HashMap<FetchKey<K::Tab>, PendingFetch>,
  sender: mpsc::UnboundedSender<Completion<K::Tab>>,
  receiver: mpsc::UnboundedReceiver<Completion<K::Tab>>,
}

impl<K: EntityKind> FetchCoordinator<K> {
  pub fn new(source: Arc<dyn DataSource>) -> Self {
    let (sender, receiver) = mpsc::unbounded_channel();
    Self {
      source,
      generation: 0,
      pending: HashMap::new(),
      sender,
      receiver,
    }
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// Start a new generation. Results dispatched under older generations
  /// will be discarded on arrival.
  pub fn advance(&mut self) -> u64 {
    self.generation += 1;
    self.generation
  }

  pub fn is_pending(&self, entity: &EntityId, tab: K::Tab) -> bool {
    self.pending.contains_key(&FetchKey {
      entity: entity.clone(),
      tab,
    })
  }

  pub fn has_pending(&self) -> bool {
    !self.pending.is_empty()
  }

  /// Make sure data for (entity, tab) is loaded or on its way.
  ///
  /// Must be called from within a tokio runtime when a dispatch is needed.
  pub fn ensure(
    &mut self,
    cache: &EntityCache<K::Tab, K::Payload>,
    entity: &EntityId,
    tab: K::Tab,
  ) -> Ensure {
    if cache.is_loaded(entity, tab) {
      debug!(kind = K::KIND, %entity, %tab, "tab served from cache");
      return Ensure::Cached;
    }

    let key = FetchKey {
      entity: entity.clone(),
      tab,
    };
    if self.pending.contains_key(&key) {
      debug!(kind = K::KIND, %entity, %tab, "joining in-flight fetch");
      return Ensure::Joined;
    }

    self.dispatch(key);
    Ensure::Dispatched
  }

  fn dispatch(&mut self, key: FetchKey<K::Tab>) {
    let generation = self.generation;
    let requirement = K::requirement(key.tab);
    debug!(
      kind = K::KIND,
      entity = %key.entity,
      tab = %key.tab,
      generation,
      "dispatching fetch"
    );

    let future = self
      .source
      .fetch_entity_data(K::KIND, &key.entity, requirement.options);
    let sender = self.sender.clone();
    let task_key = key.clone();

    let task = tokio::spawn(async move {
      // A panicking data source still has to clear its pending key.
      let result = match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(eyre!("data source panicked")),
      };
      // Ignore send errors - the coordinator may have been dropped
      let _ = sender.send(Completion {
        key: task_key,
        generation,
        result,
      });
    });

    self.pending.insert(
      key,
      PendingFetch {
        generation,
        abort: task.abort_handle(),
      },
    );
  }

  /// Abort every in-flight request and forget its pending key.
  pub fn cancel_all(&mut self) {
    if self.pending.is_empty() {
      return;
    }
    info!(
      kind = K::KIND,
      count = self.pending.len(),
      "cancelling in-flight fetches"
    );
    for (_, fetch) in self.pending.drain() {
      fetch.abort.abort();
    }
  }

  /// Take the next finished request without waiting.
  pub fn try_next(&mut self) -> Option<Completion<K::Tab>> {
    self.receiver.try_recv().ok()
  }

  /// Wait for the next finished request.
  pub async fn next(&mut self) -> Option<Completion<K::Tab>> {
    self.receiver.recv().await
  }

  /// Settle a finished request.
  ///
  /// Releases the pending key unless a newer dispatch has taken it over.
  /// Returns the result only when it was dispatched under the current
  /// generation; superseded results are dropped silently.
  pub fn resolve(
    &mut self,
    completion: Completion<K::Tab>,
  ) -> Option<(FetchKey<K::Tab>, Result<Value>)> {
    let Completion {
      key,
      generation,
      result,
    } = completion;

    let owns_key = self
      .pending
      .get(&key)
      .is_some_and(|fetch| fetch.generation == generation);
    if owns_key {
      self.pending.remove(&key);
    }

    if generation != self.generation {
      debug!(
        kind = K::KIND,
        entity = %key.entity,
        tab = %key.tab,
        generation,
        current = self.generation,
        "discarding stale fetch result"
      );
      return None;
    }

    Some((key, result))
  }
}

impl<K: EntityKind> Drop for FetchCoordinator<K> {
  fn drop(&mut self) {
    self.advance();
    self.cancel_all();
  }
}


#[cfg(test)]
mod tests {
  use super::testing::ScriptedSource;
  use super::*;
  use crate::livescore::{Player, PlayerTab};
  use serde_json::json;

  fn ok_source() -> Arc<ScriptedSource> {
    Arc::new(ScriptedSource::new(|_, _| Ok(json!({ "success": true }))))
  }

  #[tokio::test]
  async fn test_ensure_dispatches_once_per_key() {
    let source = ok_source();
    let mut coordinator = FetchCoordinator::<Player>::new(source.clone());
    coordinator.advance();
    let cache = EntityCache::new();
    let id = EntityId::from("42");

    assert_eq!(
      coordinator.ensure(&cache, &id, PlayerTab::Stats),
      Ensure::Dispatched
    );
    assert_eq!(
      coordinator.ensure(&cache, &id, PlayerTab::Stats),
      Ensure::Joined
    );
    assert!(coordinator.is_pending(&id, PlayerTab::Stats));

    let completion = coordinator.next().await.unwrap();
    let (key, result) = coordinator.resolve(completion).unwrap();
    assert_eq!(key.tab, PlayerTab::Stats);
    assert!(result.is_ok());
    assert!(!coordinator.has_pending());
    assert_eq!(source.call_count(), 1);
  }

  #[tokio::test]
  async fn test_ensure_sends_tab_options() {
    let source = ok_source();
    let mut coordinator = FetchCoordinator::<Player>::new(source.clone());
    let cache = EntityCache::new();

    coordinator.ensure(&cache, &EntityId::from("42"), PlayerTab::Fixtures);

    let calls = source.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind, "player");
    assert_eq!(
      calls[0].options.query_pairs(),
      vec![("fetchSeasons", "true"), ("fetchFixtures", "true")]
    );
  }

  #[tokio::test]
  async fn test_cached_tab_is_not_fetched() {
    let source = ok_source();
    let mut coordinator = FetchCoordinator::<Player>::new(source.clone());
    let mut cache = EntityCache::new();
    let id = EntityId::from("42");
    cache.put(
      &id,
      PlayerTab::Trophies,
      crate::livescore::PlayerPayload::Trophies {
        trophies: Vec::new(),
      },
    );

    assert_eq!(
      coordinator.ensure(&cache, &id, PlayerTab::Trophies),
      Ensure::Cached
    );
    assert_eq!(source.call_count(), 0);
  }

  #[tokio::test]
  async fn test_stale_generation_is_discarded_but_key_released() {
    let (source, gate) = ScriptedSource::new(|_, _| Ok(json!({ "success": true }))).gated();
    let mut coordinator = FetchCoordinator::<Player>::new(Arc::new(source));
    coordinator.advance();
    let cache = EntityCache::new();
    let id = EntityId::from("42");

    coordinator.ensure(&cache, &id, PlayerTab::Stats);
    // Supersede without aborting: the result must still be dropped.
    coordinator.advance();
    gate.add_permits(1);

    let completion = coordinator.next().await.unwrap();
    assert!(coordinator.resolve(completion).is_none());
    assert!(!coordinator.has_pending());
  }

  #[tokio::test]
  async fn test_stale_completion_keeps_newer_pending_key() {
    let (source, _gate) = ScriptedSource::new(|_, _| Ok(json!({ "success": true }))).gated();
    let mut coordinator = FetchCoordinator::<Player>::new(Arc::new(source));
    let cache = EntityCache::new();
    let id = EntityId::from("42");

    coordinator.advance();
    coordinator.ensure(&cache, &id, PlayerTab::Stats);

    // A result from an earlier generation for the same key arrives late.
    let stale = Completion {
      key: FetchKey {
        entity: id.clone(),
        tab: PlayerTab::Stats,
      },
      generation: coordinator.generation() - 1,
      result: Ok(json!({ "success": true })),
    };

    assert!(coordinator.resolve(stale).is_none());
    assert!(coordinator.is_pending(&id, PlayerTab::Stats));
  }

  #[tokio::test]
  async fn test_cancel_all_aborts_and_clears() {
    let (source, gate) = ScriptedSource::new(|_, _| Ok(json!({ "success": true }))).gated();
    let mut coordinator = FetchCoordinator::<Player>::new(Arc::new(source));
    let cache = EntityCache::new();
    let id = EntityId::from("42");

    coordinator.ensure(&cache, &id, PlayerTab::Stats);
    coordinator.ensure(&cache, &id, PlayerTab::Injuries);
    coordinator.cancel_all();
    assert!(!coordinator.has_pending());

    gate.add_permits(2);
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert!(coordinator.try_next().is_none());
  }

  #[tokio::test]
  async fn test_panicking_source_releases_key() {
    let source = ScriptedSource::new(|_, _| panic!("boom"));
    let mut coordinator = FetchCoordinator::<Player>::new(Arc::new(source));
    let cache = EntityCache::new();
    let id = EntityId::from("42");

    coordinator.ensure(&cache, &id, PlayerTab::Rankings);
    let completion = coordinator.next().await.unwrap();
    let (_, result) = coordinator.resolve(completion).unwrap();

    assert!(result.is_err());
    assert!(!coordinator.has_pending());
  }
}
