//! Writing simulation results to CSV files on disk.
use crate::market::{GoodID, MarketKind, Marketplace};
use crate::region::RegionID;
use crate::resource::Resource;
use crate::sector::Sector;
use crate::subresource::SubResourceID;
use crate::units::{MoneyPerQuantity, Quantity};
use anyhow::{Context, Result, ensure};
use csv;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "demeter_results";

/// The output file name for market prices
const MARKET_PRICES_FILE_NAME: &str = "market_prices.csv";

/// The output file name for market supplies and demands
const MARKET_QUANTITIES_FILE_NAME: &str = "market_quantities.csv";

/// The output file name for sector prices
const SECTOR_PRICES_FILE_NAME: &str = "sector_prices.csv";

/// The output file name for per-sub-resource supply
const SUBRESOURCE_SUPPLY_FILE_NAME: &str = "debug_subresource_supply.csv";

/// The default output folder for the given model, derived from the model's directory name
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Canonicalise first so that a relative path such as "." still yields a usable name
    let model_dir = model_dir
        .canonicalize()
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory for the model specified at `model_dir`.
///
/// If the directory already exists it is only replaced when `overwrite` is set. Returns whether
/// an existing directory was replaced.
pub fn create_output_directory(output_dir: &Path, overwrite: bool) -> Result<bool> {
    if !output_dir.is_dir() {
        // Try to create the directory, with parents
        fs::create_dir_all(output_dir)?;
        return Ok(false);
    }

    ensure!(
        overwrite,
        "Output folder {} already exists. Pass --overwrite to replace it.",
        output_dir.display()
    );

    // Replace the existing directory so no files from a previous run survive
    fs::remove_dir_all(output_dir)?;
    fs::create_dir_all(output_dir)?;

    Ok(true)
}

/// Represents a row in the market prices CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct MarketPriceRow {
    milestone_year: u32,
    good_id: GoodID,
    market_region_id: RegionID,
    kind: MarketKind,
    price: MoneyPerQuantity,
}

/// Represents a row in the market quantities CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct MarketQuantityRow {
    milestone_year: u32,
    good_id: GoodID,
    market_region_id: RegionID,
    kind: MarketKind,
    supply: Quantity,
    demand: Quantity,
}

/// Represents a row in the sector prices CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SectorPriceRow {
    milestone_year: u32,
    sector_id: GoodID,
    region_id: RegionID,
    price: MoneyPerQuantity,
}

/// Represents a row in the sub-resource supply CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SubResourceSupplyRow {
    milestone_year: u32,
    good_id: GoodID,
    region_id: RegionID,
    subresource_id: SubResourceID,
    price: MoneyPerQuantity,
    cumulative: Quantity,
    annual: Quantity,
}

/// Writes the optional per-sub-resource debug file
struct DebugDataWriter {
    subresource_supply_writer: csv::Writer<File>,
}

impl DebugDataWriter {
    /// Open CSV files to write debug info to
    fn create(output_path: &Path) -> Result<Self> {
        let file_path = output_path.join(SUBRESOURCE_SUPPLY_FILE_NAME);

        Ok(Self {
            subresource_supply_writer: csv::Writer::from_path(file_path)?,
        })
    }

    /// Write the supply of every sub-resource to file
    fn write_subresource_supply(
        &mut self,
        milestone_year: u32,
        resources: &[Resource],
        period: usize,
    ) -> Result<()> {
        for resource in resources {
            for subresource in resource.subresources() {
                let row = SubResourceSupplyRow {
                    milestone_year,
                    good_id: resource.id.clone(),
                    region_id: resource.region_id.clone(),
                    subresource_id: subresource.id.clone(),
                    price: subresource.price(period),
                    cumulative: subresource.cumulative(period),
                    annual: subresource.annual(period),
                };
                self.subresource_supply_writer.serialize(row)?;
            }
        }

        Ok(())
    }

    /// Flush the underlying streams
    fn flush(&mut self) -> Result<()> {
        self.subresource_supply_writer.flush()?;

        Ok(())
    }
}

/// Writes the per-period result files for a run
pub struct DataWriter {
    market_prices_writer: csv::Writer<File>,
    market_quantities_writer: csv::Writer<File>,
    sector_prices_writer: csv::Writer<File>,
    debug_writer: Option<DebugDataWriter>,
}

impl DataWriter {
    /// Open CSV files to write output data to.
    ///
    /// The debug file is only created when `save_debug_info` is set.
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let debug_writer = if save_debug_info {
            Some(DebugDataWriter::create(output_path)?)
        } else {
            None
        };

        Ok(Self {
            market_prices_writer: new_writer(MARKET_PRICES_FILE_NAME)?,
            market_quantities_writer: new_writer(MARKET_QUANTITIES_FILE_NAME)?,
            sector_prices_writer: new_writer(SECTOR_PRICES_FILE_NAME)?,
            debug_writer,
        })
    }

    /// Write the price of every market to a CSV file
    pub fn write_market_prices(
        &mut self,
        milestone_year: u32,
        markets: &Marketplace,
        period: usize,
    ) -> Result<()> {
        for market in markets.markets() {
            let row = MarketPriceRow {
                milestone_year,
                good_id: market.good_id.clone(),
                market_region_id: market.market_region_id.clone(),
                kind: market.kind,
                price: market.price(period),
            };
            self.market_prices_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write the supply and demand of every market to a CSV file
    pub fn write_market_quantities(
        &mut self,
        milestone_year: u32,
        markets: &Marketplace,
        period: usize,
    ) -> Result<()> {
        for market in markets.markets() {
            let row = MarketQuantityRow {
                milestone_year,
                good_id: market.good_id.clone(),
                market_region_id: market.market_region_id.clone(),
                kind: market.kind,
                supply: market.supply(period),
                demand: market.demand(period),
            };
            self.market_quantities_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write the price of every sector to a CSV file
    pub fn write_sector_prices(
        &mut self,
        milestone_year: u32,
        sectors: &[Sector],
        period: usize,
    ) -> Result<()> {
        for sector in sectors {
            let row = SectorPriceRow {
                milestone_year,
                sector_id: sector.id.clone(),
                region_id: sector.region_id.clone(),
                price: sector.price(period),
            };
            self.sector_prices_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Write debug information to CSV files
    pub fn write_debug_info(
        &mut self,
        milestone_year: u32,
        resources: &[Resource],
        period: usize,
    ) -> Result<()> {
        if let Some(wtr) = &mut self.debug_writer {
            wtr.write_subresource_supply(milestone_year, resources, period)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.market_prices_writer.flush()?;
        self.market_quantities_writer.flush()?;
        self.sector_prices_writer.flush()?;
        if let Some(wtr) = &mut self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{gdp, land, markets, modeltime, resource, sector_config};
    use crate::gdp::Gdp;
    use crate::land::LandAllocator;
    use crate::market::MarketKind;
    use crate::modeltime::Modeltime;
    use crate::sector::SectorConfig;
    use itertools::{Itertools, assert_equal};
    use rstest::rstest;
    use std::fs::File;
    use tempfile::tempdir;

    #[rstest]
    fn test_create_output_directory(#[values(false, true)] overwrite: bool) {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("results");

        // A fresh directory is created along with its parents
        assert!(!create_output_directory(&output_dir, overwrite).unwrap());
        let stale_file = output_dir.join("stale.csv");
        File::create(&stale_file).unwrap();

        if overwrite {
            // Replacing the directory must remove files from the previous run
            assert!(create_output_directory(&output_dir, true).unwrap());
            assert!(!stale_file.exists());
        } else {
            assert!(create_output_directory(&output_dir, false).is_err());
            assert!(stale_file.exists());
        }
    }

    #[rstest]
    fn test_write_market_prices(mut markets: Marketplace) {
        let good = GoodID::new("oil");

        // A calibration market, so the row's kind label is exercised too
        markets.create_market(&"NA".into(), &"NA".into(), &good, MarketKind::Calibration);
        markets.set_price(&good, &"NA".into(), 1, MoneyPerQuantity(4.5));

        let milestone_year = 2005;
        let dir = tempdir().unwrap();

        // Write the price
        {
            let mut writer = DataWriter::create(dir.path(), false).unwrap();
            writer
                .write_market_prices(milestone_year, &markets, 1)
                .unwrap();
            writer.flush().unwrap();
        }

        // Read back and compare
        let expected = MarketPriceRow {
            milestone_year,
            good_id: good,
            market_region_id: "NA".into(),
            kind: MarketKind::Calibration,
            price: MoneyPerQuantity(4.5),
        };
        let records: Vec<MarketPriceRow> =
            csv::Reader::from_path(dir.path().join(MARKET_PRICES_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_equal(records, std::iter::once(expected));
    }

    #[rstest]
    fn test_write_market_quantities(mut markets: Marketplace) {
        let good = GoodID::new("oil");
        markets.create_market(&"NA".into(), &"NA".into(), &good, MarketKind::Normal);
        markets.add_to_supply(&good, &"NA".into(), 1, Quantity(15.0));
        markets.add_to_demand(&good, &"NA".into(), 1, Quantity(7.0));

        let milestone_year = 2005;
        let dir = tempdir().unwrap();

        // Write the quantities
        {
            let mut writer = DataWriter::create(dir.path(), false).unwrap();
            writer
                .write_market_quantities(milestone_year, &markets, 1)
                .unwrap();
            writer.flush().unwrap();
        }

        // Read back and compare
        let expected = MarketQuantityRow {
            milestone_year,
            good_id: good,
            market_region_id: "NA".into(),
            kind: MarketKind::Normal,
            supply: Quantity(15.0),
            demand: Quantity(7.0),
        };
        let records: Vec<MarketQuantityRow> =
            csv::Reader::from_path(dir.path().join(MARKET_QUANTITIES_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_equal(records, std::iter::once(expected));
    }

    #[rstest]
    fn test_write_sector_prices(
        sector_config: SectorConfig,
        modeltime: Modeltime,
        land: LandAllocator,
    ) {
        let sector = Sector::new(sector_config, &modeltime, Some(&land)).unwrap();
        let milestone_year = 1990;
        let dir = tempdir().unwrap();

        // Write the price
        {
            let mut writer = DataWriter::create(dir.path(), false).unwrap();
            writer
                .write_sector_prices(milestone_year, std::slice::from_ref(&sector), 0)
                .unwrap();
            writer.flush().unwrap();
        }

        // Read back and compare
        let expected = SectorPriceRow {
            milestone_year,
            sector_id: sector.id.clone(),
            region_id: sector.region_id.clone(),
            price: sector.price(0),
        };
        let records: Vec<SectorPriceRow> =
            csv::Reader::from_path(dir.path().join(SECTOR_PRICES_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_equal(records, std::iter::once(expected));
    }

    #[rstest]
    fn test_write_subresource_supply(
        mut resource: Resource,
        mut markets: Marketplace,
        modeltime: Modeltime,
        gdp: Gdp,
    ) {
        resource.set_market(&mut markets, &modeltime);
        markets.set_price(&resource.id, &resource.region_id, 0, MoneyPerQuantity(10.0));
        resource.compute_supply(&mut markets, &modeltime, &gdp, 0);

        let milestone_year = 1990;
        let dir = tempdir().unwrap();

        // Write one row per sub-resource
        {
            let mut writer = DebugDataWriter::create(dir.path()).unwrap();
            writer
                .write_subresource_supply(milestone_year, std::slice::from_ref(&resource), 0)
                .unwrap();
            writer.flush().unwrap();
        }

        // Read back and compare
        let expected = resource.subresources().iter().map(|subresource| {
            SubResourceSupplyRow {
                milestone_year,
                good_id: resource.id.clone(),
                region_id: resource.region_id.clone(),
                subresource_id: subresource.id.clone(),
                price: subresource.price(0),
                cumulative: subresource.cumulative(0),
                annual: subresource.annual(0),
            }
        });
        let records: Vec<SubResourceSupplyRow> =
            csv::Reader::from_path(dir.path().join(SUBRESOURCE_SUPPLY_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_equal(records, expected);
    }
}
