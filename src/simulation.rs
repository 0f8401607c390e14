//! Functionality for running the demeter simulation.
use crate::market::Marketplace;
use crate::model::Model;
use crate::output::DataWriter;
use anyhow::Result;
use log::{info, warn};
use std::path::Path;

/// Register a market for every resource and sector in the model.
///
/// Resources register first so that a sector sharing a good with a resource joins the
/// resource's market rather than the other way round.
fn register_markets(model: &Model, markets: &mut Marketplace) {
    for resource in &model.resources {
        resource.set_market(markets, &model.modeltime);
    }

    for sector in &model.sectors {
        if !sector.set_market(markets, &model.modeltime) {
            warn!(
                "Sector {} in region {} joined an existing market, so its calibration price was \
                 not applied",
                sector.id, sector.region_id
            );
        }
    }
}

/// Evaluate the supply of every resource for one period.
///
/// The period's recorded flows are cleared first, so the call stands alone: a price solver can
/// set trial prices and call this any number of times per period without flows from earlier
/// probes surviving.
pub fn evaluate_period(model: &mut Model, markets: &mut Marketplace, period: usize) {
    let Model {
        modeltime,
        gdp,
        resources,
        ..
    } = model;

    markets.reset_flows(period);
    for resource in resources.iter_mut() {
        resource.compute_supply(markets, modeltime, gdp, period);
    }
}

/// Run the simulation.
///
/// # Arguments:
///
/// * `model` - The model to run
/// * `markets` - The marketplace in which the model's goods clear
/// * `output_path` - The folder to which output files will be saved
/// * `debug_model` - Whether to write additional CSV files for debugging
pub fn run(
    model: &mut Model,
    markets: &mut Marketplace,
    output_path: &Path,
    debug_model: bool,
) -> Result<()> {
    register_markets(model, markets);

    let mut writer = DataWriter::create(output_path, debug_model)?;
    for period in model.modeltime.periods() {
        let year = model.modeltime.year(period);
        info!("Milestone year: {year}");

        evaluate_period(model, markets, period);

        // Sectors take the cleared price for the period as their own
        for sector in &mut model.sectors {
            sector.record_market_price(markets, period);
        }

        writer.write_market_prices(year, markets, period)?;
        writer.write_market_quantities(year, markets, period)?;
        writer.write_sector_prices(year, &model.sectors, period)?;
        writer.write_debug_info(year, &model.resources, period)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::model;
    use crate::units::Quantity;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_evaluate_period(mut model: Model) {
        let mut markets = Marketplace::new(&model.modeltime);
        register_markets(&model, &mut markets);

        evaluate_period(&mut model, &mut markets, 0);
        let resource = &model.resources[0];
        let (resource_id, region_id) = (resource.id.clone(), resource.region_id.clone());
        let supplied = markets.supply(&resource_id, &region_id, 0);
        assert_approx_eq!(Quantity, supplied, resource.annual(0));

        // A second probe of the same period must not double-count flows
        evaluate_period(&mut model, &mut markets, 0);
        assert_approx_eq!(
            Quantity,
            markets.supply(&resource_id, &region_id, 0),
            supplied
        );
    }

    #[rstest]
    fn test_run_writes_output_files(mut model: Model) {
        let mut markets = Marketplace::new(&model.modeltime);
        let dir = tempdir().unwrap();

        run(&mut model, &mut markets, dir.path(), true).unwrap();

        for file_name in [
            "market_prices.csv",
            "market_quantities.csv",
            "sector_prices.csv",
            "debug_subresource_supply.csv",
        ] {
            assert!(dir.path().join(file_name).is_file());
        }

        // Sector prices now mirror the market
        let sector = &model.sectors[0];
        for period in model.modeltime.periods() {
            assert_eq!(
                sector.price(period),
                markets.price(&sector.id, &sector.region_id, period)
            );
        }
    }
}
