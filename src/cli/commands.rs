//! Command dispatch for the todotree binary

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::TodoListStore;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::session::{write_list, Session};
use crate::config::{global_config_path, Settings};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.no_demo {
        settings.seed_demo = false;
    }
    debug!("settings: {:?}", settings);

    match &cli.command {
        Some(Commands::List { filter }) => _list(&settings, filter.as_deref()),
        Some(Commands::Tree) => _tree(&settings),
        Some(Commands::Session) => _session(&settings),
        Some(Commands::Config { command }) => _config(&settings, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => _list(&settings, None),
    }
}

#[instrument(skip(settings))]
fn _list(settings: &Settings, filter: Option<&str>) -> CliResult<()> {
    let mut store = TodoListStore::from_settings(settings);
    if let Some(name) = filter {
        store.set_visibility_filter_str(name)?;
    }
    output::header(&format!(
        "{} of {} todo(s), {}",
        store.filtered_todos().len(),
        store.len(),
        store.visibility_filter()
    ));
    let mut stdout = io::stdout().lock();
    write_list(&store, &mut stdout)
}

#[instrument(skip(settings))]
fn _tree(settings: &Settings) -> CliResult<()> {
    let store = TodoListStore::from_settings(settings);
    output::info(&store.to_tree_string());
    Ok(())
}

#[instrument(skip(settings))]
fn _session(settings: &Settings) -> CliResult<()> {
    let mut store = TodoListStore::from_settings(settings);
    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    Session::new(&mut store).run(stdin, &mut stdout)?;
    stdout.flush().map_err(|e| CliError::io("flush stdout", e))?;
    drop(stdout);
    output::success(&format!("session closed with {} todo(s)", store.len()));
    Ok(())
}

#[instrument(skip(settings))]
fn _config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            debug!(
                "demo todos: {}",
                settings.demo_todos.iter().map(|t| format!("{:?}", t)).join(", ")
            );
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => {
                return Err(CliError::Usage(
                    "no home directory to place the global config in".to_string(),
                ))
            }
        },
    }
    Ok(())
}
