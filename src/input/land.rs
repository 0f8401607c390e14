//! Code for reading land allocations from CSV files.
use super::*;
use crate::id::IDCollection;
use crate::land::LandAllocator;
use crate::region::RegionID;
use crate::units::Quantity;
use std::collections::HashMap;
use std::path::Path;

const LAND_ALLOCATION_FILE_NAME: &str = "land_allocation.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct LandAllocationRow {
    /// The region to which this entry applies
    region_id: String,
    /// The land area allocated to agriculture in the region
    area: Quantity,
}

/// Reads land allocations from a CSV file, if the file is present.
///
/// The file is optional: sectors in regions without an allocation log an error but still run.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `region_ids` - All possible region IDs
///
/// # Returns
///
/// The land allocator, `None` if the file is absent, or an error
pub fn read_land_allocation(
    model_dir: &Path,
    region_ids: &HashSet<RegionID>,
) -> Result<Option<LandAllocator>> {
    let file_path = model_dir.join(LAND_ALLOCATION_FILE_NAME);
    if !file_path.exists() {
        return Ok(None);
    }

    let land = read_land_allocation_from_iter(read_csv(&file_path)?, region_ids)
        .with_context(|| input_err_msg(&file_path))?;

    Ok(Some(land))
}

fn read_land_allocation_from_iter<I>(
    iter: I,
    region_ids: &HashSet<RegionID>,
) -> Result<LandAllocator>
where
    I: Iterator<Item = LandAllocationRow>,
{
    let mut areas = HashMap::new();
    for row in iter {
        let region_id = region_ids.get_id_by_str(&row.region_id)?;
        ensure!(
            row.area.is_finite() && row.area >= Quantity(0.0),
            "Land area for region {region_id} must be finite and non-negative"
        );
        ensure!(
            areas.insert(region_id.clone(), row.area).is_none(),
            "Duplicate land allocation for region {region_id}"
        );
    }

    Ok(LandAllocator::new(areas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, region_ids};
    use rstest::rstest;

    fn row(region_id: &str, area: f64) -> LandAllocationRow {
        LandAllocationRow {
            region_id: region_id.to_string(),
            area: Quantity(area),
        }
    }

    #[rstest]
    fn test_read_land_allocation_from_iter(region_ids: HashSet<RegionID>) {
        let rows = [row("NA", 1500.0), row("EU", 800.0)];
        let land = read_land_allocation_from_iter(rows.into_iter(), &region_ids).unwrap();
        assert_eq!(land.area(&"NA".into()), Some(Quantity(1500.0)));
        assert_eq!(land.area(&"EU".into()), Some(Quantity(800.0)));
    }

    #[rstest]
    fn test_read_land_allocation_from_iter_unknown_region(region_ids: HashSet<RegionID>) {
        let rows = [row("XX", 1500.0)];
        assert_error!(
            read_land_allocation_from_iter(rows.into_iter(), &region_ids),
            "Unknown ID XX found"
        );
    }

    #[rstest]
    fn test_read_land_allocation_from_iter_duplicate(region_ids: HashSet<RegionID>) {
        let rows = [row("NA", 1500.0), row("NA", 100.0)];
        assert_error!(
            read_land_allocation_from_iter(rows.into_iter(), &region_ids),
            "Duplicate land allocation for region NA"
        );
    }

    #[rstest]
    fn test_read_land_allocation_from_iter_negative_area(region_ids: HashSet<RegionID>) {
        let rows = [row("NA", -1.0)];
        assert_error!(
            read_land_allocation_from_iter(rows.into_iter(), &region_ids),
            "Land area for region NA must be finite and non-negative"
        );
    }

    #[test]
    fn test_read_land_allocation_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let region_ids = HashSet::from(["NA".into()]);
        assert_eq!(
            read_land_allocation(dir.path(), &region_ids).unwrap(),
            None
        );
    }
}
