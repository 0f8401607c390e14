//! Code for reading regional GDP trajectories from CSV files.
use super::*;
use crate::gdp::Gdp;
use crate::id::IDCollection;
use crate::region::RegionID;
use crate::units::Money;
use std::collections::HashMap;
use std::path::Path;

const GDP_FILE_NAME: &str = "gdp.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct GdpRow {
    /// The region to which this entry applies
    region_id: String,
    /// The milestone year to which this entry applies
    year: u32,
    /// GDP for the region in that year
    gdp: Money,
}

/// Reads GDP trajectories from a CSV file.
///
/// Every region must have an entry for every milestone year.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `region_ids` - All possible region IDs
/// * `modeltime` - The simulation timeline
///
/// # Returns
///
/// GDP values for every region and period, or an error
pub fn read_gdp(
    model_dir: &Path,
    region_ids: &HashSet<RegionID>,
    modeltime: &Modeltime,
) -> Result<Gdp> {
    let file_path = model_dir.join(GDP_FILE_NAME);
    let iter = read_csv(&file_path)?;
    read_gdp_from_iter(iter, region_ids, modeltime).with_context(|| input_err_msg(&file_path))
}

fn read_gdp_from_iter<I>(
    iter: I,
    region_ids: &HashSet<RegionID>,
    modeltime: &Modeltime,
) -> Result<Gdp>
where
    I: Iterator<Item = GdpRow>,
{
    let periods: HashMap<u32, usize> = modeltime
        .periods()
        .map(|period| (modeltime.year(period), period))
        .collect();

    let mut values = HashMap::new();
    for row in iter {
        let region_id = region_ids.get_id_by_str(&row.region_id)?;
        let period = *periods
            .get(&row.year)
            .with_context(|| format!("Year {} is not a milestone year", row.year))?;
        ensure!(
            row.gdp.is_finite() && row.gdp > Money(0.0),
            "GDP for region {region_id} in year {} must be finite and positive",
            row.year
        );

        let series = values
            .entry(region_id.clone())
            .or_insert_with(|| vec![None; modeltime.max_periods()]);
        ensure!(
            series[period].replace(row.gdp).is_none(),
            "Duplicate GDP entry for region {region_id} in year {}",
            row.year
        );
    }

    let values = region_ids
        .iter()
        .map(|region_id| {
            let series = values
                .remove(region_id)
                .with_context(|| format!("No GDP given for region {region_id}"))?;
            let series: Vec<Money> = series
                .into_iter()
                .enumerate()
                .map(|(period, value)| {
                    value.with_context(|| {
                        format!(
                            "Missing GDP for region {region_id} in year {}",
                            modeltime.year(period)
                        )
                    })
                })
                .try_collect()?;

            Ok::<_, anyhow::Error>((region_id.clone(), series))
        })
        .try_collect()?;

    Ok(Gdp::new(values))
}
