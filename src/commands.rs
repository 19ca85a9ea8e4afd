//! Interactive commands and prefix/alias resolution

use color_eyre::{eyre::eyre, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Tab,
  Open,
  Show,
  Tabs,
  Help,
  Quit,
}

#[derive(Debug, Clone)]
pub struct Command {
  pub action: Action,
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub usage: &'static str,
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    action: Action::Tab,
    name: "tab",
    aliases: &["t", "select"],
    usage: "tab <name>",
    description: "Switch to a tab, fetching it if needed",
  },
  Command {
    action: Action::Open,
    name: "open",
    aliases: &["o", "load"],
    usage: "open <id> [tab]",
    description: "Show another entity",
  },
  Command {
    action: Action::Show,
    name: "show",
    aliases: &["s", "print"],
    usage: "show",
    description: "Print the current view",
  },
  Command {
    action: Action::Tabs,
    name: "tabs",
    aliases: &["ls"],
    usage: "tabs",
    description: "List tabs and whether they are loaded",
  },
  Command {
    action: Action::Help,
    name: "help",
    aliases: &["h", "?"],
    usage: "help",
    description: "List commands",
  },
  Command {
    action: Action::Quit,
    name: "quit",
    aliases: &["q", "exit"],
    usage: "quit",
    description: "Exit",
  },
];

/// Commands matching `input`, best match first.
///
/// Exact name beats exact alias beats name prefix beats alias prefix.
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let rank = |cmd: &Command| -> Option<u32> {
    if cmd.name == input_lower {
      Some(0)
    } else if cmd.aliases.contains(&input_lower.as_str()) {
      Some(1)
    } else if cmd.name.starts_with(&input_lower) {
      Some(2)
    } else if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      Some(3)
    } else {
      None
    }
  };

  let mut matches: Vec<(&'static Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| rank(cmd).map(|priority| (cmd, priority)))
    .collect();
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
pub struct Invocation<'a> {
  pub action: Action,
  pub args: Vec<&'a str>,
}

/// Parse an input line into the best matching command and its arguments.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse(line: &str) -> Result<Option<Invocation<'_>>> {
  let mut words = line.split_whitespace();
  let Some(word) = words.next() else {
    return Ok(None);
  };

  let command = get_suggestions(word)
    .into_iter()
    .next()
    .ok_or_else(|| eyre!("unknown command '{}' (type 'help' for a list)", word))?;

  Ok(Some(Invocation {
    action: command.action,
    args: words.collect(),
  }))
}

pub fn help_text() -> String {
  COMMANDS
    .iter()
    .map(|cmd| format!("  {:<18} {}", cmd.usage, cmd.description))
    .collect::<Vec<_>>()
    .join("\n")
}
