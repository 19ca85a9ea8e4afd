//! HTTP data source for the livescore football API.

use color_eyre::{eyre::eyre, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::cache::{EntityId, FetchOptions};
use crate::config::ApiConfig;
use crate::fetch::DataSource;

/// Calls `GET {base}/api/livescore/football/{players|teams}/{id}?fetchX=true`.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
  client: reqwest::Client,
  base_url: Url,
  api_key: Option<String>,
}

impl HttpDataSource {
  pub fn new(config: &ApiConfig, api_key: Option<String>) -> Result<Self> {
    let base_url = Url::parse(&config.url)
      .map_err(|e| eyre!("Failed to parse API url '{}': {}", config.url, e))?;
    if base_url.cannot_be_a_base() {
      return Err(eyre!("API url cannot be a base: {}", base_url));
    }

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      client,
      base_url,
      api_key,
    })
  }

  fn endpoint(&self, kind: &str, id: &EntityId) -> Result<Url> {
    let collection = match kind {
      "player" => "players",
      "team" => "teams",
      other => return Err(eyre!("Unsupported entity kind: {}", other)),
    };

    let mut url = self.base_url.clone();
    {
      let mut segments = url
        .path_segments_mut()
        .map_err(|_| eyre!("API url cannot be a base: {}", self.base_url))?;
      segments
        .pop_if_empty()
        .extend(["api", "livescore", "football", collection, id.as_str()]);
    }
    Ok(url)
  }
}

impl DataSource for HttpDataSource {
  fn fetch_entity_data(
    &self,
    kind: &'static str,
    id: &EntityId,
    options: FetchOptions,
  ) -> BoxFuture<'static, Result<Value>> {
    let endpoint = self.endpoint(kind, id);
    let client = self.client.clone();
    let api_key = self.api_key.clone();

    async move {
      let url = endpoint?;
      debug!(%url, ?options, "requesting entity data");

      let mut request = client.get(url.clone()).query(&options.query_pairs());
      if let Some(key) = api_key {
        request = request.header("x-api-key", key);
      }

      let response = request
        .send()
        .await
        .map_err(|e| eyre!("Failed to fetch {}: {}", url, e))?;
      let status = response.status();
      let body = response
        .bytes()
        .await
        .map_err(|e| eyre!("Failed to read response from {}: {}", url, e))?;

      if !status.is_success() {
        return Err(eyre!(
          "HTTP {} from {}: {}",
          status,
          url,
          String::from_utf8_lossy(&body)
        ));
      }

      serde_json::from_slice(&body)
        .map_err(|e| eyre!("Failed to parse response from {}: {}", url, e))
    }
    .boxed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn source(url: &str) -> HttpDataSource {
    let config = ApiConfig {
      url: url.to_string(),
      timeout_secs: 5,
    };
    HttpDataSource::new(&config, None).unwrap()
  }

  #[test]
  fn test_endpoint_per_kind() {
    let source = source("https://scores.example.com");
    assert_eq!(
      source
        .endpoint("player", &EntityId::from("276"))
        .unwrap()
        .as_str(),
      "https://scores.example.com/api/livescore/football/players/276"
    );
    assert_eq!(
      source.endpoint("team", &EntityId::from(33u64)).unwrap().path(),
      "/api/livescore/football/teams/33"
    );
  }

  #[test]
  fn test_endpoint_keeps_base_path_and_escapes_id() {
    let source = source("https://example.com/proxy/");
    assert_eq!(
      source
        .endpoint("player", &EntityId::from("a/b"))
        .unwrap()
        .path(),
      "/proxy/api/livescore/football/players/a%2Fb"
    );
  }

  #[test]
  fn test_unknown_kind_and_bad_url_are_errors() {
    let source = source("https://example.com");
    assert!(source.endpoint("coach", &EntityId::from("1")).is_err());

    let config = ApiConfig {
      url: "not a url".to_string(),
      timeout_secs: 5,
    };
    assert!(HttpDataSource::new(&config, None).is_err());
  }
}
