//! Line-oriented command shell.
//!
//! Each input line parses into a [`Command`], which maps onto zero or more
//! store actions.

use crate::types::{FilterMode, TodoAction, TodoId};
use thiserror::Error;

/// Usage text printed by `help`
pub const HELP: &str = "\
Commands:
  add <text>          add an item (text may be empty)
  edit <id> <text>    change the text of an item
  toggle <id>         mark an item done / not done
  delete <id>         remove an item
  filter <mode>       all | done | notDone
  list                show the visible items
  stats               show completion statistics
  user                load the user name
  refresh-user        forget and reload the user name
  help                show this text
  quit                exit";

/// Errors raised while parsing a command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// The first word is not a known command
    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    /// A required argument is absent
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// What was expected
        argument: &'static str,
    },

    /// An id argument is not a number
    #[error("Not a valid item id: {0}")]
    InvalidId(String),
}

/// Part of the screen a command asks to see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Visible items
    List,
    /// Statistics
    Stats,
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add an item with this text
    Add(String),
    /// Change an item's text
    Edit(TodoId, String),
    /// Flip an item's completion flag
    Toggle(TodoId),
    /// Remove an item
    Delete(TodoId),
    /// Select a filter
    Filter(FilterMode),
    /// Show one section
    Show(Section),
    /// Load the user name
    User,
    /// Reset and reload the user name
    RefreshUser,
    /// Print usage
    Help,
    /// Leave the shell
    Quit,
}

impl Command {
    /// Parses one line; blank lines yield `None`
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] for unknown commands, missing arguments or
    /// malformed ids.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "add" => Self::Add(rest.to_string()),
            "edit" => {
                let (id, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Self::Edit(parse_id("edit", id)?, text.trim().to_string())
            },
            "toggle" => Self::Toggle(parse_id("toggle", rest)?),
            "delete" | "rm" => Self::Delete(parse_id("delete", rest)?),
            "filter" => {
                if rest.is_empty() {
                    return Err(ShellError::MissingArgument {
                        command: "filter",
                        argument: "a mode",
                    });
                }
                Self::Filter(FilterMode::from_selection(rest))
            },
            "list" | "ls" => Self::Show(Section::List),
            "stats" => Self::Show(Section::Stats),
            "user" => Self::User,
            "refresh-user" => Self::RefreshUser,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }

    /// Store actions that carry out this command, in order
    #[must_use]
    pub fn actions(&self) -> Vec<TodoAction> {
        match self {
            Self::Add(text) => vec![
                TodoAction::SetInput { text: text.clone() },
                TodoAction::AddTodo,
            ],
            Self::Edit(id, text) => vec![TodoAction::EditTodo {
                id: *id,
                text: text.clone(),
            }],
            Self::Toggle(id) => vec![TodoAction::ToggleTodo { id: *id }],
            Self::Delete(id) => vec![TodoAction::DeleteTodo { id: *id }],
            Self::Filter(mode) => vec![TodoAction::SetFilter { mode: *mode }],
            Self::User => vec![TodoAction::LoadUserName],
            Self::RefreshUser => vec![TodoAction::ResetUserName, TodoAction::LoadUserName],
            Self::Show(_) | Self::Help | Self::Quit => Vec::new(),
        }
    }
}

fn parse_id(command: &'static str, raw: &str) -> Result<TodoId, ShellError> {
    if raw.is_empty() {
        return Err(ShellError::MissingArgument {
            command,
            argument: "an item id",
        });
    }
    raw.parse()
        .map(TodoId::new)
        .map_err(|_| ShellError::InvalidId(raw.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests can use unwrap
mod tests {
    use super::*;
    use recall_core::action::Action;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn add_keeps_inner_spaces_and_allows_empty_text() {
        assert_eq!(parse("add  buy  milk "), Command::Add("buy  milk".to_string()));
        assert_eq!(parse("add"), Command::Add(String::new()));
    }

    #[test]
    fn edit_takes_id_then_text() {
        assert_eq!(
            parse("edit 3 walk the dog"),
            Command::Edit(TodoId::new(3), "walk the dog".to_string())
        );
        assert_eq!(parse("EDIT 3"), Command::Edit(TodoId::new(3), String::new()));
    }

    #[test]
    fn id_errors() {
        assert_eq!(
            Command::parse("toggle"),
            Err(ShellError::MissingArgument {
                command: "toggle",
                argument: "an item id",
            })
        );
        assert_eq!(
            Command::parse("delete first"),
            Err(ShellError::InvalidId("first".to_string()))
        );
    }

    #[test]
    fn filter_is_lenient_but_needs_a_word() {
        assert_eq!(parse("filter done"), Command::Filter(FilterMode::Done));
        assert_eq!(parse("filter notDone"), Command::Filter(FilterMode::NotDone));
        assert_eq!(parse("filter whatever"), Command::Filter(FilterMode::All));
        assert!(matches!(
            Command::parse("filter"),
            Err(ShellError::MissingArgument { command: "filter", .. })
        ));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            Command::parse("undo"),
            Err(ShellError::UnknownCommand("undo".to_string()))
        );
    }

    #[test]
    fn commands_map_to_actions() {
        let names = |command: Command| -> Vec<&'static str> {
            command.actions().iter().map(Action::name).collect()
        };

        assert_eq!(names(parse("add milk")), vec!["SetInput", "AddTodo"]);
        assert_eq!(names(parse("refresh-user")), vec!["ResetUserName", "LoadUserName"]);
        assert_eq!(names(parse("toggle 0")), vec!["ToggleTodo"]);
        assert!(names(parse("stats")).is_empty());
        assert!(names(parse("quit")).is_empty());
    }
}
