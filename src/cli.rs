//! The command line interface for demeter.
use crate::input::load_model;
use crate::log;
use crate::market::Marketplace;
use crate::output::metadata::write_metadata;
use crate::output::{create_output_directory, get_output_dir};
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The top-level argument parser
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The command to run, if any
    #[command(subcommand)]
    command: Option<Commands>,
    /// Print the CLI documentation as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options accepted by the `run` and `example run` commands
#[derive(Args)]
pub struct RunOpts {
    /// Where to write the output files, overriding the default location
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Replace the output folder if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Also write CSV files with per-sub-resource debug data
    #[arg(long)]
    pub debug_model: bool,
}

/// The commands understood by the program.
#[derive(Subcommand)]
enum Commands {
    /// Run the model in the given folder.
    Run {
        /// The folder containing the model's input files.
        model_dir: PathBuf,
        /// Further options for the run
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Work with the bundled example models.
    Example {
        /// The subcommands for working with examples.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Work with the program settings file.
    Settings {
        /// The subcommands for working with settings.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
    /// Load a model and report errors without running it.
    Validate {
        /// The folder containing the model's input files.
        model_dir: PathBuf,
    },
}

impl Commands {
    /// Dispatch to the handler for the chosen command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { model_dir, opts } => handle_run_command(&model_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
            Self::Validate { model_dir } => handle_validate_command(&model_dir, None),
        }
    }
}

/// Parse the command line and run the chosen command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Hidden flag used to generate the CLI reference documentation
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    match cli.command {
        Some(command) => command.execute(),
        None => {
            // Without a command there is nothing to do but explain the options
            Cli::command().print_long_help()?;
            Ok(())
        }
    }
}

/// Program settings as supplied by the caller, falling back on the user's settings file
fn resolve_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
///
/// Tests pass their own `settings` so that runs do not depend on the user's settings file.
pub fn handle_run_command(
    model_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let mut settings = resolve_settings(settings)?;

    // Command-line flags take precedence over the settings file
    settings.debug_model |= opts.debug_model;
    settings.overwrite |= opts.overwrite;

    let output_path = match &opts.output_dir {
        Some(output_dir) => output_dir.clone(),
        None => get_output_dir(model_path)?,
    };
    let overwritten =
        create_output_directory(&output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    log::init(Some(settings.log_level.as_str()), Some(output_path.as_path()))
        .context("Failed to initialise logging.")?;

    let mut model = load_model(model_path).context("Failed to load model.")?;
    info!("Model read from {}", model_path.display());
    info!("Results will be written to {}", output_path.display());

    // The folder was replaced before the logger came up, so the warning had to wait until now
    if overwritten {
        warn!("Replacing existing output folder");
    }

    write_metadata(&output_path, model_path, &model).context("Failed to write run metadata.")?;

    let mut markets = Marketplace::new(&model.modeltime);
    crate::simulation::run(&mut model, &mut markets, &output_path, settings.debug_model)?;
    info!("Model run finished");

    Ok(())
}

/// Handle the `validate` command, which loads a model and discards it.
///
/// Nothing is written to disk, so the logger only writes to the terminal.
pub fn handle_validate_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = resolve_settings(settings)?;

    log::init(Some(settings.log_level.as_str()), None)
        .context("Failed to initialise logging.")?;

    load_model(model_path).context("Failed to validate model.")?;
    info!("Model in {} is valid", model_path.display());

    Ok(())
}
