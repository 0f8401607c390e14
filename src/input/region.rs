//! Code for reading the regions input file.
use super::*;
use crate::region::RegionMap;
use std::path::Path;

const REGIONS_FILE_NAME: &str = "regions.csv";

/// Read regions from the regions CSV file in `model_dir`, keyed by region ID.
pub fn read_regions(model_dir: &Path) -> Result<RegionMap> {
    read_csv_id_file(&model_dir.join(REGIONS_FILE_NAME))
}
