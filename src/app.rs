use color_eyre::{eyre::eyre, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::cache::{EntityId, EntityKind, TabKey};
use crate::commands::{self, Action};
use crate::config::Config;
use crate::detail::DetailController;
use crate::event::{Event, EventHandler};
use crate::fetch::DataSource;
use crate::livescore::{Player, Team};

/// Which kind of detail page to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EntityType {
  Player,
  Team,
}

/// What to show on startup
#[derive(Debug, Clone)]
pub struct Target {
  pub kind: EntityType,
  pub id: String,
  /// Tab name; falls back to the configured default, then the first tab
  pub tab: Option<String>,
  /// Data to hydrate the page with before anything is fetched
  pub initial: Option<Value>,
}

/// The open detail page
pub enum Detail {
  Player(DetailController<Player>),
  Team(DetailController<Team>),
}

macro_rules! with_detail {
  ($detail:expr, $c:ident => $body:expr) => {
    match $detail {
      Detail::Player($c) => $body,
      Detail::Team($c) => $body,
    }
  };
}

/// Rendered state of a detail page
#[derive(Serialize)]
struct View<'a, Pr, P> {
  kind: &'static str,
  entity: &'a EntityId,
  tab: &'static str,
  loading: bool,
  error: Option<&'a str>,
  profile: Option<&'a Pr>,
  payload: Option<&'a P>,
}

fn resolve_tab<T: TabKey>(explicit: Option<&str>, configured: Option<T>) -> Result<T> {
  match explicit {
    Some(name) => name.parse(),
    None => configured
      .or_else(|| T::ALL.first().copied())
      .ok_or_else(|| eyre!("no tabs defined")),
  }
}

fn mount<K: EntityKind>(
  source: Arc<dyn DataSource>,
  id: &str,
  tab: K::Tab,
  initial: Option<Value>,
) -> Result<DetailController<K>> {
  let mut detail = DetailController::<K>::new(source, id, tab);
  if let Some(initial) = initial {
    detail.hydrate(initial)?;
  }
  detail.select_tab(tab);
  Ok(detail)
}

fn select<K: EntityKind>(detail: &mut DetailController<K>, name: &str) -> Result<()> {
  let tab: K::Tab = name.parse()?;
  detail.select_tab(tab);
  Ok(())
}

fn open<K: EntityKind>(
  detail: &mut DetailController<K>,
  id: &str,
  tab: Option<&str>,
) -> Result<()> {
  let tab = match tab {
    Some(name) => name.parse()?,
    None => detail.current_tab(),
  };
  detail.load_entity(id, tab);
  Ok(())
}

fn render<K: EntityKind>(detail: &DetailController<K>) -> Result<String> {
  let view = View {
    kind: K::KIND,
    entity: detail.entity_id(),
    tab: detail.current_tab().as_str(),
    loading: detail.is_loading(),
    error: detail.error(),
    profile: detail.shared_profile(),
    payload: detail.payload_for(detail.current_tab()),
  };
  serde_json::to_string_pretty(&view).map_err(|e| eyre!("Failed to render view: {}", e))
}

fn tab_list<K: EntityKind>(detail: &DetailController<K>) -> String {
  K::Tab::ALL
    .iter()
    .map(|tab| {
      let marker = if *tab == detail.current_tab() { "*" } else { " " };
      let status = if detail.is_tab_loaded(*tab) {
        "loaded"
      } else if detail.is_tab_loading(*tab) {
        "loading"
      } else {
        ""
      };
      format!("{} {:<10} {}", marker, tab.as_str(), status)
        .trim_end()
        .to_string()
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Main application state
pub struct App {
  detail: Detail,
  should_quit: bool,
}

impl App {
  pub fn new(config: &Config, source: Arc<dyn DataSource>, target: Target) -> Result<Self> {
    let tab = target.tab.as_deref();
    let detail = match target.kind {
      EntityType::Player => {
        let tab = resolve_tab(tab, config.player.default_tab)?;
        Detail::Player(mount::<Player>(source, &target.id, tab, target.initial)?)
      }
      EntityType::Team => {
        let tab = resolve_tab(tab, config.team.default_tab)?;
        Detail::Team(mount::<Team>(source, &target.id, tab, target.initial)?)
      }
    };
    info!(kind = ?target.kind, id = %target.id, "opened detail page");

    Ok(Self {
      detail,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));
    println!("{}", self.render()?);

    while !self.should_quit {
      match events.next().await {
        Some(Event::Input(line)) => match self.handle_input(&line) {
          Ok(Some(output)) => println!("{}", output),
          Ok(None) => {}
          Err(e) => {
            warn!(input = %line, error = %e, "command failed");
            eprintln!("error: {}", e);
          }
        },
        Some(Event::Tick) => {
          if self.poll() {
            println!("{}", self.render()?);
          }
        }
        Some(Event::Closed) | None => {
          // Piped input ran out; finish what is in flight before exiting.
          self.settle().await;
          println!("{}", self.render()?);
          break;
        }
      }
    }

    Ok(())
  }

  /// Run one input line. Returns text to print, if any.
  pub fn handle_input(&mut self, line: &str) -> Result<Option<String>> {
    let Some(invocation) = commands::parse(line)? else {
      return Ok(None);
    };
    let args = &invocation.args;

    match invocation.action {
      Action::Tab => {
        let name = args.first().ok_or_else(|| eyre!("usage: tab <name>"))?;
        with_detail!(&mut self.detail, c => select(c, name))?;
        self.render().map(Some)
      }
      Action::Open => {
        let id = args.first().ok_or_else(|| eyre!("usage: open <id> [tab]"))?;
        let tab = args.get(1).copied();
        with_detail!(&mut self.detail, c => open(c, id, tab))?;
        self.render().map(Some)
      }
      Action::Show => self.render().map(Some),
      Action::Tabs => Ok(Some(with_detail!(&self.detail, c => tab_list(c)))),
      Action::Help => Ok(Some(commands::help_text())),
      Action::Quit => {
        self.should_quit = true;
        Ok(None)
      }
    }
  }

  /// Apply finished fetches. Returns whether the view changed.
  pub fn poll(&mut self) -> bool {
    with_detail!(&mut self.detail, c => c.poll())
  }

  pub async fn settle(&mut self) {
    with_detail!(&mut self.detail, c => c.settle().await)
  }

  pub fn render(&self) -> Result<String> {
    with_detail!(&self.detail, c => render(c))
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }
}
