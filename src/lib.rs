//! Common functionality for demeter, a resource supply and market core for multi-region,
//! multi-period techno-economic simulations.
#![warn(missing_docs)]
pub mod cli;
pub mod gdp;
pub mod grade;
pub mod id;
pub mod input;
pub mod land;
pub mod log;
pub mod market;
pub mod model;
pub mod modeltime;
pub mod output;
pub mod region;
pub mod resource;
pub mod sector;
pub mod settings;
pub mod simulation;
pub mod subresource;
pub mod units;

#[cfg(test)]
mod fixture;

use std::path::PathBuf;

/// Get the path to the demeter configuration directory.
///
/// This is in a platform-dependent location (e.g. `~/.config/demeter` on Linux).
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_default().join("demeter")
}
