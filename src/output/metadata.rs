//! A record of how, where and from what each run was made.
//!
//! The record lands next to the result files as `metadata.toml`, so a set of results can always
//! be traced back to the model, binary and machine that produced it.
use crate::model::Model;
use anyhow::Result;
use chrono::prelude::*;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Compile-time constants collected by the `built` crate
mod built_info {
    // Generated by the build script
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Short git commit hash of the build, with a `-dirty` suffix for uncommitted changes
fn get_git_hash() -> String {
    match built_info::GIT_COMMIT_HASH_SHORT {
        Some(hash) if built_info::GIT_DIRTY == Some(true) => format!("{hash}-dirty"),
        Some(hash) => hash.into(),
        None => "unknown".into(),
    }
}

/// The full contents of the metadata file, one section per struct
#[derive(Serialize)]
struct Metadata<'a> {
    run: RunRecord<'a>,
    build: BuildRecord<'a>,
    host: HostRecord,
}

/// What was run, over which years, and when
#[derive(Serialize)]
struct RunRecord<'a> {
    /// The folder the model was read from
    model_path: &'a Path,
    /// The milestone years the model covers
    milestone_years: &'a [u32],
    /// When the run started
    datetime: String,
}

impl<'a> RunRecord<'a> {
    fn new(model_path: &'a Path, model: &'a Model) -> Self {
        Self {
            model_path,
            milestone_years: model.modeltime.milestone_years(),
            datetime: Local::now().to_rfc2822(),
        }
    }
}

/// The binary that made the run, as recorded at compile time
#[derive(Serialize)]
struct BuildRecord<'a> {
    /// The package name
    name: &'a str,
    /// The package version
    version: &'a str,
    /// The build's target triple
    target: &'a str,
    /// Whether this was a debug build
    is_debug: bool,
    /// The rustc version that compiled the binary
    rustc_version: &'a str,
    /// When the binary was compiled
    build_time_utc: &'a str,
    /// The git commit the binary was compiled from, if known
    git_commit_hash: String,
}

impl BuildRecord<'_> {
    fn gather() -> Self {
        Self {
            name: built_info::PKG_NAME,
            version: built_info::PKG_VERSION,
            target: built_info::TARGET,
            is_debug: built_info::DEBUG,
            rustc_version: built_info::RUSTC_VERSION,
            build_time_utc: built_info::BUILT_TIME_UTC,
            git_commit_hash: get_git_hash(),
        }
    }
}

/// The machine the run was made on, with one field per `uname` value
#[derive(Serialize)]
struct HostRecord {
    sysname: String,
    nodename: String,
    release: String,
    version: String,
    machine: String,
    osname: String,
}

impl HostRecord {
    fn gather() -> Self {
        let info = PlatformInfo::new().expect("Could not read platform information");
        Self {
            sysname: info.sysname().to_string_lossy().into(),
            nodename: info.nodename().to_string_lossy().into(),
            release: info.release().to_string_lossy().into(),
            version: info.version().to_string_lossy().into(),
            machine: info.machine().to_string_lossy().into(),
            osname: info.osname().to_string_lossy().into(),
        }
    }
}

/// Write the run, build and host records to a TOML file under `output_path`
pub fn write_metadata(output_path: &Path, model_path: &Path, model: &Model) -> Result<()> {
    let metadata = Metadata {
        run: RunRecord::new(model_path, model),
        build: BuildRecord::gather(),
        host: HostRecord::gather(),
    };
    fs::write(
        output_path.join(METADATA_FILE_NAME),
        toml::to_string(&metadata)?,
    )?;

    Ok(())
}
