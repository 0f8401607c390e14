//! Code for reading sectors from CSV files.
use super::*;
use crate::id::IDCollection;
use crate::land::LandAllocator;
use crate::market::GoodID;
use crate::region::RegionID;
use crate::sector::{Sector, SectorConfig, SectorKind};
use crate::units::MoneyPerQuantity;
use std::path::Path;

const SECTORS_FILE_NAME: &str = "sectors.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct SectorRow {
    /// The good the sector supplies
    id: GoodID,
    /// The region in which the sector operates
    region_id: String,
    /// The sector's reporting classification (defaults to agriculture)
    kind: Option<SectorKind>,
    /// The calibration price for the good, if one is given
    cal_price: Option<MoneyPerQuantity>,
    /// The region under whose name the good's market clears, if not the sector's own
    market_region_id: Option<String>,
    /// A text description of the sector
    description: String,
}

/// Reads sectors from a CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `region_ids` - All possible region IDs
/// * `modeltime` - The simulation timeline
/// * `land` - The land allocator, if land allocations were given
///
/// # Returns
///
/// All sectors in file order, or an error
pub fn read_sectors(
    model_dir: &Path,
    region_ids: &HashSet<RegionID>,
    modeltime: &Modeltime,
    land: Option<&LandAllocator>,
) -> Result<Vec<Sector>> {
    let file_path = model_dir.join(SECTORS_FILE_NAME);
    read_sectors_from_iter(read_csv(&file_path)?, region_ids, modeltime, land)
        .with_context(|| input_err_msg(&file_path))
}

fn read_sectors_from_iter<I>(
    iter: I,
    region_ids: &HashSet<RegionID>,
    modeltime: &Modeltime,
    land: Option<&LandAllocator>,
) -> Result<Vec<Sector>>
where
    I: Iterator<Item = SectorRow>,
{
    let mut seen = HashSet::new();
    let mut sectors = Vec::new();
    for row in iter {
        let region_id = region_ids.get_id_by_str(&row.region_id)?;
        ensure!(
            seen.insert((row.id.clone(), region_id.clone())),
            "Duplicate sector {} in region {region_id}",
            row.id
        );

        let market_region_id = row
            .market_region_id
            .as_deref()
            .map(|market_region| region_ids.get_id_by_str(market_region))
            .transpose()?;
        let config = SectorConfig {
            id: row.id,
            region_id,
            kind: row.kind.unwrap_or_default(),
            cal_price: row.cal_price,
            market_region_id,
            description: row.description,
        };
        sectors.push(Sector::new(config, modeltime, land)?);
    }

    Ok(sectors)
}
