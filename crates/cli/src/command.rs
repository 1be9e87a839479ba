//! Shell command grammar.
//!
//! One command per line: a keyword followed by its arguments. Entry names
//! and custom-entry text take the rest of the line verbatim (trimmed), so
//! they may contain spaces.

use aniwheel_core::catalog::ShowStatus;
use aniwheel_core::filter::FilterValue;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands")]
    Unknown(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument '{value}': {reason}")]
    InvalidArgument { value: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,

    /// Print the current page of the view.
    List,
    NextPage,
    PrevPage,
    GoToPage(usize),

    /// Set the search text and run the name search.
    Search(String),
    ToggleFilter(FilterValue),
    ApplyFilters,
    ResetFilters,
    Facets,

    Toggle(String),
    Remove(String),
    Random(usize),

    /// Resize the custom-entry slots.
    Slots(usize),
    /// Set one custom slot; `slot` is 1-based as shown to the user.
    Custom { slot: usize, text: String },

    Wheel,
    Spin,
    Results,
    Clear,

    Detail(String),
    CloseDetail,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    let command = match keyword.to_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,

        "list" | "ls" => Command::List,
        "next" => Command::NextPage,
        "prev" => Command::PrevPage,
        "page" => Command::GoToPage(parse_number(required(rest, "page number")?)?),

        "search" => Command::Search(rest.to_string()),
        "filter" => Command::ToggleFilter(parse_filter(rest)?),
        "apply" => Command::ApplyFilters,
        "reset" => Command::ResetFilters,
        "facets" => Command::Facets,

        "toggle" | "add" => Command::Toggle(required(rest, "entry name")?.to_string()),
        "remove" | "rm" => Command::Remove(required(rest, "entry name")?.to_string()),
        "random" => Command::Random(parse_number(required(rest, "count")?)?),

        "slots" => Command::Slots(parse_number(required(rest, "slot count")?)?),
        "custom" => {
            let rest = required(rest, "slot number")?;
            let (slot, text) = match rest.split_once(char::is_whitespace) {
                Some((slot, text)) => (slot, text.trim()),
                None => (rest, ""),
            };
            let slot = parse_number(slot)?;
            if slot == 0 {
                return Err(CommandError::InvalidArgument {
                    value: "0".into(),
                    reason: "slots are numbered from 1".into(),
                });
            }
            Command::Custom {
                slot,
                text: text.to_string(),
            }
        }

        "wheel" => Command::Wheel,
        "spin" => Command::Spin,
        "results" | "history" => Command::Results,
        "clear" => Command::Clear,

        "detail" | "info" => Command::Detail(required(rest, "entry name")?.to_string()),
        "close" => Command::CloseDetail,

        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

fn required<'a>(rest: &'a str, what: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(what))
    } else {
        Ok(rest)
    }
}

fn parse_number(raw: &str) -> Result<usize, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::InvalidArgument {
            value: raw.to_string(),
            reason: "expected a non-negative number".into(),
        })
}

fn parse_filter(rest: &str) -> Result<FilterValue, CommandError> {
    let (category, value) = rest
        .split_once(char::is_whitespace)
        .map(|(c, v)| (c, v.trim()))
        .filter(|(_, v)| !v.is_empty())
        .ok_or(CommandError::MissingArgument("filter category and value"))?;

    match category.to_lowercase().as_str() {
        "status" => value
            .parse::<ShowStatus>()
            .map(FilterValue::Status)
            .map_err(|e| CommandError::InvalidArgument {
                value: value.to_string(),
                reason: e.to_string(),
            }),
        "genre" => Ok(FilterValue::Genre(value.to_string())),
        "trait" | "character" => Ok(FilterValue::CharacterTrait(value.to_string())),
        other => Err(CommandError::InvalidArgument {
            value: other.to_string(),
            reason: "category must be one of: status, genre, trait".into(),
        }),
    }
}

/// Command summary printed by `help`.
pub const HELP: &str = "\
Browsing
  list | next | prev | page <n>      show the current page / move between pages
  search <text>                      name search (empty text shows everything)
  filter status|genre|trait <value>  toggle a filter value
  apply | reset                      apply category filters / show the full catalog
  facets                             list available filter values
Wheel
  toggle <name> | remove <name>      add or remove a catalog entry
  random <n>                         add up to n random entries not yet on the wheel
  slots <n> | custom <i> <text>      resize custom slots (3-10) / set slot i
  wheel | spin | results | clear     show contents / spin / history / clear everything
Details
  detail <name> | close              show metadata and trailer for an entry
  quit";
