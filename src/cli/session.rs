//! Line-oriented editing session
//!
//! Each input line is one command. Positions are 1-based and refer to the
//! currently visible (filtered) list, the one `list` prints.

use std::io::{BufRead, Write};
use std::str::FromStr;

use tracing::{debug, info, instrument};

use crate::application::TodoListStore;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::domain::{TodoId, VisibilityFilter};
use crate::tree_traits::TreeNodeConvert;

pub const HELP: &str = "\
commands:
  add TEXT          append a todo at the top level
  after N TEXT      insert a todo right after todo N
  child N TEXT      append a todo under todo N
  delete N          delete todo N and everything below it
  toggle N          flip completion of todo N
  edit N TEXT       replace the text of todo N
  filter NAME       show all, active or completed todos
  list              print the visible todos
  tree              print the whole tree
  help              print this help
  quit              end the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Add(String),
    After(usize, String),
    Child(usize, String),
    Delete(usize),
    Toggle(usize),
    Edit(usize, String),
    Filter(VisibilityFilter),
    List,
    Tree,
    Help,
    Quit,
}

fn parse_position(arg: Option<&str>, verb: &str) -> CliResult<usize> {
    let arg = arg.ok_or_else(|| CliError::Usage(format!("{}: missing position", verb)))?;
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CliError::Usage(format!("{}: invalid position '{}'", verb, arg))),
    }
}

/// Splits `N TEXT` into position and (possibly empty) text.
fn parse_position_text(rest: &str, verb: &str) -> CliResult<(usize, String)> {
    let (position, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let position = if position.is_empty() { None } else { Some(position) };
    Ok((parse_position(position, verb)?, text.trim().to_string()))
}

impl FromStr for SessionCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match verb.to_ascii_lowercase().as_str() {
            "add" | "a" => Ok(SessionCommand::Add(rest.to_string())),
            "after" => {
                let (n, text) = parse_position_text(rest, verb)?;
                Ok(SessionCommand::After(n, text))
            }
            "child" => {
                let (n, text) = parse_position_text(rest, verb)?;
                Ok(SessionCommand::Child(n, text))
            }
            "edit" => {
                let (n, text) = parse_position_text(rest, verb)?;
                Ok(SessionCommand::Edit(n, text))
            }
            "delete" | "rm" => Ok(SessionCommand::Delete(parse_position(
                Some(rest).filter(|r| !r.is_empty()),
                verb,
            )?)),
            "toggle" | "t" => Ok(SessionCommand::Toggle(parse_position(
                Some(rest).filter(|r| !r.is_empty()),
                verb,
            )?)),
            "filter" => Ok(SessionCommand::Filter(rest.parse()?)),
            "list" | "ls" => Ok(SessionCommand::List),
            "tree" => Ok(SessionCommand::Tree),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
            _ => Err(CliError::Usage(format!("unknown command '{}'", verb))),
        }
    }
}

/// Write the visible todos, numbered by position.
pub fn write_list<W: Write>(store: &TodoListStore, out: &mut W) -> CliResult<()> {
    let visible = store.filtered_nodes();
    if visible.is_empty() {
        writeln!(out, "no todos ({})", store.visibility_filter())
            .map_err(|e| CliError::io("write list", e))?;
        return Ok(());
    }
    for (i, node) in visible.iter().enumerate() {
        let depth = store.depth(node.id()).unwrap_or(1);
        writeln!(out, "{}", output::todo_line(i + 1, node, depth))
            .map_err(|e| CliError::io("write list", e))?;
    }
    Ok(())
}

/// Drives a store from session commands.
pub struct Session<'a> {
    store: &'a mut TodoListStore,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a mut TodoListStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TodoListStore {
        &*self.store
    }

    fn resolve(&self, position: usize) -> CliResult<TodoId> {
        let visible = self.store.filtered_todos();
        position
            .checked_sub(1)
            .and_then(|i| visible.get(i).copied())
            .ok_or_else(|| CliError::Usage(format!("no todo at position {}", position)))
    }

    /// Applies one command. Returns false when the session should end.
    #[instrument(level = "debug", skip(self, out))]
    pub fn apply<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> CliResult<bool> {
        let message = match command {
            SessionCommand::Add(text) => {
                self.store.add_todo(text);
                None
            }
            SessionCommand::After(n, text) => {
                let id = self.resolve(n)?;
                self.store.add_todo_after(id, text)?;
                None
            }
            SessionCommand::Child(n, text) => {
                let id = self.resolve(n)?;
                self.store.add_child(id, text)?;
                None
            }
            SessionCommand::Delete(n) => {
                let id = self.resolve(n)?;
                let removed = self.store.delete_todo(id)?;
                Some(format!("deleted {} todo(s)", removed))
            }
            SessionCommand::Toggle(n) => {
                let id = self.resolve(n)?;
                self.store.toggle_completed(id)?;
                None
            }
            SessionCommand::Edit(n, text) => {
                let id = self.resolve(n)?;
                self.store.set_text(id, text)?;
                None
            }
            SessionCommand::Filter(filter) => {
                self.store.set_visibility_filter(filter);
                Some(format!("filter: {}", filter))
            }
            SessionCommand::List => {
                write_list(&*self.store, out)?;
                return Ok(true);
            }
            SessionCommand::Tree => {
                write!(out, "{}", self.store.to_tree_string())
                    .map_err(|e| CliError::io("write tree", e))?;
                return Ok(true);
            }
            SessionCommand::Help => {
                writeln!(out, "{}", HELP).map_err(|e| CliError::io("write help", e))?;
                return Ok(true);
            }
            SessionCommand::Quit => return Ok(false),
        };
        if let Some(message) = message {
            writeln!(out, "{}", output::success_line(&message))
                .map_err(|e| CliError::io("write status", e))?;
        }
        write_list(&*self.store, out)?;
        Ok(true)
    }

    /// Reads commands until EOF or `quit`.
    ///
    /// A failing command is reported on `out` and leaves the tree as it was;
    /// only I/O failures end the session early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> CliResult<()> {
        info!("session started with {} todo(s)", self.store.len());
        for line in input.lines() {
            let line = line.map_err(|e| CliError::io("read command", e))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            debug!("session command: {:?}", line);
            let result = line
                .parse::<SessionCommand>()
                .and_then(|command| self.apply(command, out));
            match result {
                Ok(true) => {}
                Ok(false) => break,
                Err(e @ CliError::Io { .. }) => return Err(e),
                Err(e) => writeln!(out, "{}", output::error_line(&e))
                    .map_err(|e| CliError::io("write error", e))?,
            }
        }
        info!("session ended with {} todo(s)", self.store.len());
        Ok(())
    }
}
