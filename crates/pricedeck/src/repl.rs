use pricedeck_core::{GroupKind, Lookback, RenderParams, Selection, SelectionError};
use std::str::FromStr;

pub const HELP: &str = "\
commands:
  days N                     lookback window, 1..50 trading days
  select GROUP [LABEL ..]    labels to show; no labels selects nothing
  range GROUP MIN MAX        value axis of GROUP's chart
  show                       render again
  chart GROUP                print GROUP's Vega-Lite chart
  help                       this text
  quit";

/// One line typed into an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Days(u32),
    Select(GroupKind, Vec<String>),
    Range(GroupKind, i64, i64),
    Show,
    Chart(GroupKind),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| "empty command".to_string())?;
        let rest: Vec<&str> = words.collect();

        let group = |word: Option<&&str>| -> Result<GroupKind, String> {
            let word = word.ok_or_else(|| format!("{verb}: missing group"))?;
            GroupKind::from_key(word).ok_or_else(|| format!("unknown group \"{word}\""))
        };
        let number = |word: Option<&&str>, what: &str| -> Result<i64, String> {
            word.ok_or_else(|| format!("{verb}: missing {what}"))?
                .parse::<i64>()
                .map_err(|e| format!("{what}: {e}"))
        };

        match verb.to_lowercase().as_str() {
            "days" => {
                let days = number(rest.first(), "days")?;
                u32::try_from(days)
                    .map(Command::Days)
                    .map_err(|_| format!("days: {days} is not a day count"))
            }
            "select" => Ok(Command::Select(
                group(rest.first())?,
                rest.iter().skip(1).map(|s| s.to_string()).collect(),
            )),
            "range" => Ok(Command::Range(
                group(rest.first())?,
                number(rest.get(1), "min")?,
                number(rest.get(2), "max")?,
            )),
            "show" => Ok(Command::Show),
            "chart" => Ok(Command::Chart(group(rest.first())?)),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command \"{other}\"; try help")),
        }
    }
}

impl Command {
    /// Apply a parameter change. Returns whether the dashboard needs a new
    /// render; invalid values leave `params` untouched.
    pub fn apply(&self, params: &mut RenderParams) -> Result<bool, SelectionError> {
        match self {
            Command::Days(days) => {
                params.lookback = Lookback::new(*days)?;
                Ok(true)
            }
            Command::Select(kind, labels) => {
                let range = params
                    .selection(*kind)
                    .map(|s| s.range)
                    .unwrap_or_else(|| Selection::defaults(&kind.group()).range);
                params.selections.insert(
                    *kind,
                    Selection {
                        labels: labels.clone(),
                        range,
                    },
                );
                Ok(true)
            }
            Command::Range(kind, min, max) => {
                let group = kind.group();
                let labels = params
                    .selection(*kind)
                    .map(|s| s.labels.clone())
                    .unwrap_or_else(|| Selection::defaults(&group).labels);
                let selection = Selection::new(&group, labels, (*min, *max))?;
                params.selections.insert(*kind, selection);
                Ok(true)
            }
            Command::Show => Ok(true),
            Command::Chart(_) | Command::Help | Command::Quit => Ok(false),
        }
    }
}
