//! Example models bundled into the binary and the CLI subcommands for working with them.
use super::{RunOpts, handle_run_command};
use crate::settings::Settings;
use anyhow::{Context, Result, ensure};
use clap::Subcommand;
use include_dir::{Dir, DirEntry, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The example models compiled into the binary
const MODELS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/models");

/// The subcommands for working with examples.
#[derive(Subcommand)]
pub enum ExampleSubcommands {
    /// Print the names of the bundled examples.
    List,
    /// Show the README for a bundled example.
    Info {
        /// The name of the example.
        name: String,
    },
    /// Copy a bundled example into a new folder.
    Extract {
        /// The name of the example to extract.
        name: String,
        /// The destination folder, defaulting to the example's name.
        new_path: Option<PathBuf>,
    },
    /// Run a bundled example.
    Run {
        /// The name of the example to run.
        name: String,
        /// Further options for the run
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl ExampleSubcommands {
    /// Dispatch to the handler for the chosen subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => {
                handle_example_list_command();
                Ok(())
            }
            Self::Info { name } => handle_example_info_command(&name),
            Self::Extract { name, new_path } => {
                handle_example_extract_command(&name, new_path.as_deref())
            }
            Self::Run { name, opts } => handle_example_run_command(&name, &opts, None),
        }
    }
}

/// Print the name of every bundled example
fn handle_example_list_command() {
    for entry in MODELS_DIR.dirs() {
        println!("{}", entry.path().display());
    }
}

/// Print the README of the named example
fn handle_example_info_command(name: &str) -> Result<()> {
    let path: PathBuf = [name, "README.txt"].iter().collect();
    let readme = MODELS_DIR
        .get_file(path)
        .context("Example not found.")?
        .contents_utf8()
        .expect("README.txt must be UTF-8");

    println!("{readme}");

    Ok(())
}

/// Handle the `example extract` command, defaulting the destination to the example's name
fn handle_example_extract_command(name: &str, dest: Option<&Path>) -> Result<()> {
    let dest = dest.unwrap_or(Path::new(name));
    extract_example(name, dest)
}

/// Copy the named example's files out of the binary into `new_path`
fn extract_example(name: &str, new_path: &Path) -> Result<()> {
    let sub_dir = MODELS_DIR.get_dir(name).context("Example not found.")?;

    ensure!(
        !new_path.exists(),
        "Destination directory {} already exists",
        new_path.display()
    );

    fs::create_dir(new_path)?;
    for entry in sub_dir.entries() {
        let DirEntry::File(f) = entry else {
            panic!("Subdirectories in bundled models not supported");
        };

        let file_name = f.path().file_name().unwrap();
        fs::write(new_path.join(file_name), f.contents())?;
    }

    Ok(())
}

/// Handle the `example run` command.
///
/// The example is extracted to a temporary folder, which lives as long as the run does.
pub fn handle_example_run_command(
    name: &str,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let model_path = temp_dir.path().join(name);
    extract_example(name, &model_path)?;
    handle_run_command(&model_path, opts, settings)
}
