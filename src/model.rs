//! The static description of a simulation model, assembled from its input files.
use crate::gdp::Gdp;
use crate::input::load_model;
use crate::land::LandAllocator;
use crate::modeltime::Modeltime;
use crate::region::RegionMap;
use crate::resource::Resource;
use crate::sector::Sector;
use anyhow::Result;
use std::path::Path;

/// Model definition
pub struct Model {
    /// The simulation timeline
    pub modeltime: Modeltime,
    /// The regions covered by the model
    pub regions: RegionMap,
    /// GDP for every region and period
    pub gdp: Gdp,
    /// The land allocated to agriculture in each region, if given
    pub land: Option<LandAllocator>,
    /// All resources across all regions
    pub resources: Vec<Resource>,
    /// All sectors across all regions
    pub sectors: Vec<Sector>,
}

impl Model {
    /// Load and validate the model in the given directory.
    ///
    /// Returns an error if any of the input files are missing or invalid.
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
        load_model(model_dir.as_ref())
    }
}
