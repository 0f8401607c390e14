//! Code for reading model data from input files.
use crate::id::{HasID, IDLike};
use crate::model::Model;
use crate::modeltime::Modeltime;
use anyhow::{Context, Result, bail, ensure};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub mod gdp;
use gdp::read_gdp;
pub mod land;
use land::read_land_allocation;
pub mod region;
use region::read_regions;
pub mod resource;
use resource::read_resources;
pub mod sector;
use sector::read_sectors;

/// The model file name
const MODEL_FILE_NAME: &str = "model.toml";

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
struct ModelFile {
    /// The milestone years over which the simulation runs
    milestone_years: Vec<u32>,
}

/// Read a model from the specified directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The static model data, or an error if any input file is missing or invalid.
pub fn load_model(model_dir: &Path) -> Result<Model> {
    let model_file: ModelFile = read_toml(&model_dir.join(MODEL_FILE_NAME))?;
    let modeltime = Modeltime::new(model_file.milestone_years)
        .context("Invalid milestone years in model file")?;

    let regions = read_regions(model_dir)?;
    let region_ids = regions.keys().cloned().collect::<HashSet<_>>();

    let gdp = read_gdp(model_dir, &region_ids, &modeltime)?;
    let land = read_land_allocation(model_dir, &region_ids)?;
    let resources = read_resources(model_dir, &region_ids, &modeltime)?;
    let sectors = read_sectors(model_dir, &region_ids, &modeltime, land.as_ref())?;

    Ok(Model {
        modeltime,
        regions,
        gdp,
        land,
        resources,
        sectors,
    })
}

/// The message to display if a file could not be read
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().to_string_lossy())
}

/// Read a series of type `T`s from a CSV file.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
///
/// # Returns
///
/// An iterator over the deserialised rows, or an error if the file is missing, malformed or
/// empty.
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<impl Iterator<Item = T> + use<T>> {
    let records: Vec<T> = csv::Reader::from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .try_collect()
        .with_context(|| input_err_msg(file_path))?;

    ensure!(
        !records.is_empty(),
        "CSV file {} cannot be empty",
        file_path.to_string_lossy()
    );

    Ok(records.into_iter())
}

/// Read a CSV file of items with unique IDs.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
///
/// # Returns
///
/// A map of IDs to items, preserving file order, or an error if the file is invalid or an ID
/// appears more than once.
pub fn read_csv_id_file<ID, T>(file_path: &Path) -> Result<IndexMap<ID, T>>
where
    ID: IDLike,
    T: HasID<ID> + DeserializeOwned,
{
    let mut map = IndexMap::new();
    for record in read_csv::<T>(file_path)? {
        let id = record.get_id().clone();
        ensure!(
            map.insert(id.clone(), record).is_none(),
            "Duplicate ID {id} found in {}",
            file_path.to_string_lossy()
        );
    }

    Ok(map)
}

/// Parse a TOML file at the specified path.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;

    Ok(toml_data)
}

/// Check that the slice is sorted in ascending order with no duplicate entries
pub fn is_sorted_and_unique<T: PartialOrd>(items: &[T]) -> bool {
    items.windows(2).all(|pair| pair[0] < pair[1])
}
