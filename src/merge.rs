//! Folding data service responses into the tab cache and shared profile.

use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::{EntityCache, EntityId, EntityKind, TabKey};

/// Status fields every data service response carries.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
  success: Option<bool>,
  message: Option<String>,
}

/// Reject responses that do not report `success: true`.
pub fn check_envelope(raw: &Value) -> Result<()> {
  let envelope: Envelope = Envelope::deserialize(raw).unwrap_or_default();
  if envelope.success == Some(true) {
    return Ok(());
  }
  match envelope.message {
    Some(message) if !message.trim().is_empty() => Err(eyre!(message)),
    _ => Err(eyre!("request failed")),
  }
}

/// Fold a successful response for `tab` into the cache and shared profile.
///
/// The response is parsed completely before anything is written, so a
/// malformed response leaves both untouched.
pub fn merge<K: EntityKind>(
  cache: &mut EntityCache<K::Tab, K::Payload>,
  profile: &mut Option<K::Profile>,
  entity: &EntityId,
  tab: K::Tab,
  raw: Value,
) -> Result<()> {
  check_envelope(&raw)?;

  let response: K::Response = serde_json::from_value(raw)
    .map_err(|e| eyre!("Failed to parse {} {} data: {}", K::KIND, tab, e))?;

  if let Some(fresh) = K::profile(&response) {
    *profile = Some(fresh);
  }
  cache.put(entity, tab, K::payload(tab, &response));

  Ok(())
}

/// Seed the cache from data delivered with the page.
///
/// A tab is seeded when every required field of its requirement is present
/// and non-null; its other fields default to empty. Returns the seeded tabs
/// in presentation order.
pub fn hydrate<K: EntityKind>(
  cache: &mut EntityCache<K::Tab, K::Payload>,
  profile: &mut Option<K::Profile>,
  entity: &EntityId,
  initial: Value,
) -> Result<Vec<K::Tab>> {
  let fields = initial
    .as_object()
    .ok_or_else(|| eyre!("initial {} data must be a JSON object", K::KIND))?;

  let seeded: Vec<K::Tab> = K::Tab::ALL
    .iter()
    .copied()
    .filter(|tab| {
      K::requirement(*tab)
        .required
        .iter()
        .all(|field| fields.get(*field).is_some_and(|v| !v.is_null()))
    })
    .collect();

  let response: K::Response = serde_json::from_value(initial)
    .map_err(|e| eyre!("Failed to parse initial {} data: {}", K::KIND, e))?;

  if let Some(fresh) = K::profile(&response) {
    *profile = Some(fresh);
  }
  for tab in &seeded {
    cache.put(entity, *tab, K::payload(*tab, &response));
  }

  debug!(kind = K::KIND, %entity, tabs = ?seeded, "hydrated tabs");
  Ok(seeded)
}
