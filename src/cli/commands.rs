use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::book::{current_doc_version, AgilityRecordBook};
use crate::callbacks::{AcceptAllActions, ErrorLog};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Config;
use crate::element::ElementNode;
use crate::errors::ArbError;
use crate::schema::TREE_CONFIG;
use crate::settings::{self, Settings};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Check) => _check(cli),
        Some(Commands::Info) => _info(cli),
        Some(Commands::Points { dog }) => _points(cli, dog.as_deref()),
        Some(Commands::Update {
            config,
            dry_run,
            output,
        }) => _update(cli, config, *dry_run, output.as_deref()),
        Some(Commands::Config { command }) => _config(command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "arbook", &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// The record book file: command line first, then the settings.
fn book_path(cli: &Cli, settings: &Settings) -> CliResult<PathBuf> {
    cli.file
        .clone()
        .or_else(|| settings.file.clone())
        .ok_or_else(|| {
            CliError::InvalidArgs(
                "no record book file; pass --file or set one in the config".to_string(),
            )
        })
}

/// Load the book, surfacing skipped-entry warnings on stderr.
fn load_book(path: &Path) -> CliResult<AgilityRecordBook> {
    debug!("loading record book: {:?}", path);
    let mut log = ErrorLog::tolerant();
    let book = AgilityRecordBook::load_file(path, &mut log)?;
    for line in log.messages.lines().filter(|l| !l.is_empty()) {
        output::warning(line);
    }
    Ok(book)
}

#[instrument(skip(cli))]
fn _check(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load()?;
    let path = book_path(cli, &settings)?;
    let mut log = ErrorLog::tolerant();
    let book = AgilityRecordBook::load_file(&path, &mut log)?;
    let problems = log.messages.lines().filter(|l| !l.is_empty()).count();
    for line in log.messages.lines().filter(|l| !l.is_empty()) {
        output::warning(line);
    }
    if problems == 0 {
        output::success(&format!("{} is valid", path.display()));
    } else {
        output::info(&format!(
            "{}: loaded with {problems} problem(s)",
            path.display()
        ));
    }
    let runs: usize = book
        .dogs
        .iter()
        .flat_map(|d| d.trials.iter())
        .map(|t| t.runs.len())
        .sum();
    output::detail(&format!("{} dog(s), {} run(s)", book.dogs.len(), runs));
    Ok(())
}

#[instrument(skip(cli))]
fn _info(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load()?;
    let path = book_path(cli, &settings)?;
    let book = load_book(&path)?;

    output::header(&path.display());
    output::detail(&format!(
        "configuration: v{} ({} venues)",
        book.config.version,
        book.config.venues.len()
    ));
    let venues = book.config.venues.iter().map(|v| v.name.as_str()).join(", ");
    if !venues.is_empty() {
        output::detail(&venues);
    }
    output::detail(&format!("calendar entries: {}", book.calendar.len()));
    output::detail(&format!("training entries: {}", book.training.len()));
    for dog in book.dogs.iter() {
        let runs: usize = dog.trials.iter().map(|t| t.runs.len()).sum();
        output::detail(&format!(
            "{}: {} trial(s), {} run(s), {} title(s)",
            dog.call_name,
            dog.trials.len(),
            runs,
            dog.titles.len()
        ));
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _points(cli: &Cli, dog_name: Option<&str>) -> CliResult<()> {
    let settings = Settings::load()?;
    let path = book_path(cli, &settings)?;
    let book = load_book(&path)?;

    let mut shown = 0;
    for dog in book.dogs.iter() {
        if let Some(name) = dog_name {
            if dog.call_name != name {
                continue;
            }
        }
        shown += 1;
        output::header(&dog.call_name);
        for venue in book.config.venues.iter() {
            let mut total = 0.0;
            let mut qs = 0;
            for trial in dog.trials.iter().filter(|t| t.has_venue(&venue.name)) {
                for run in trial.runs.iter() {
                    if !run.q.qualified() {
                        continue;
                    }
                    let found = book.config.venues.find_event(
                        &venue.name,
                        &run.event,
                        &run.division,
                        &run.level,
                        run.date,
                    );
                    if let Some((_, scoring)) = found {
                        let (pts, _) = run.title_points(scoring, run.club(&trial.clubs));
                        total += pts;
                        qs += 1;
                    }
                }
            }
            if qs > 0 {
                output::detail(&format!("{}: {} Qs, {} title points", venue.name, qs, total));
            }
        }
    }
    if shown == 0 {
        if let Some(name) = dog_name {
            return Err(CliError::InvalidArgs(format!("no dog named '{name}'")));
        }
        output::info("no dogs recorded");
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _update(cli: &Cli, config_file: &Path, dry_run: bool, out: Option<&Path>) -> CliResult<()> {
    let settings = Settings::load()?;
    let path = book_path(cli, &settings)?;
    let mut book = load_book(&path)?;

    debug!("loading configuration update: {:?}", config_file);
    let tree = ElementNode::load_xml_file(config_file)?;
    let config_tree = if tree.name() == TREE_CONFIG {
        &tree
    } else {
        // Accept a full document (or DefaultConfig wrapper) as the
        // update source too.
        tree.find_element_node(TREE_CONFIG).ok_or_else(|| {
            CliError::InvalidArgs(format!(
                "{} contains no {TREE_CONFIG} element",
                config_file.display()
            ))
        })?
    };
    let mut log = ErrorLog::tolerant();
    let mut config_new = Config::default();
    config_new.load(config_tree, current_doc_version(), &mut log)?;

    let mut report = String::new();
    let mut cb = AcceptAllActions::default();
    let changed = book.update(0, &config_new, &mut report, &mut cb);

    for line in report.lines() {
        output::info(line);
    }
    if !changed {
        output::success("configuration is already up to date");
        return Ok(());
    }
    if dry_run {
        output::info("dry run; nothing written");
        return Ok(());
    }
    let target = out.unwrap_or(&path);
    book.save_file(target)?;
    output::success(&format!("wrote {}", target.display()));
    Ok(())
}

fn _config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init => {
            let path = settings::global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine the config directory".to_string())
            })?;
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir).map_err(ArbError::from)?;
            }
            std::fs::write(&path, Settings::template()).map_err(ArbError::from)?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            match settings::global_config_path() {
                Some(path) => output::info(&path.display()),
                None => output::info("<unknown>"),
            }
            Ok(())
        }
    }
}
