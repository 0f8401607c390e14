//! Sectors supply goods at calibrated prices, for markets cleared by the solver from the
//! second period onwards.
use crate::land::LandAllocator;
use crate::market::{GoodID, MarketKind, Marketplace};
use crate::modeltime::{Modeltime, PeriodSeries};
use crate::region::RegionID;
use crate::units::{CURRENCY_CONVERSION, MoneyPerQuantity};
use anyhow::{Result, ensure};
use log::{error, warn};
use serde_string_enum::DeserializeLabeledStringEnum;

/// The market info key under which a sector's calibration price is published
pub const CAL_PRICE_KEY: &str = "cal_price";

/// Classifies a sector for reporting
#[derive(PartialEq, Default, Clone, Copy, Debug, DeserializeLabeledStringEnum)]
pub enum SectorKind {
    /// Food and other land-based supply
    #[default]
    #[string = "agriculture"]
    Agriculture,
    /// Fuel transformation and delivery
    #[string = "energy"]
    Energy,
}

/// The raw description of a sector, prior to validation
#[derive(Debug, Clone, PartialEq)]
pub struct SectorConfig {
    /// The good this sector supplies
    pub id: GoodID,
    /// The region in which this sector operates
    pub region_id: RegionID,
    /// The sector's reporting classification
    pub kind: SectorKind,
    /// The calibration price for the good, if one is given
    pub cal_price: Option<MoneyPerQuantity>,
    /// The region under whose name the good's market clears, if not the sector's own
    pub market_region_id: Option<RegionID>,
    /// A text description of the sector
    pub description: String,
}

/// A supplier of one good in one region at a calibrated price.
///
/// If a calibration price is given it seeds the sector's own price for every period, converted
/// to the internal currency basis, before any equilibrium iteration begins.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    /// The good this sector supplies
    pub id: GoodID,
    /// The region in which this sector operates
    pub region_id: RegionID,
    /// The region under whose name the good's market clears
    pub market_region_id: RegionID,
    /// The sector's reporting classification
    pub kind: SectorKind,
    /// A text description of the sector
    pub description: String,
    cal_price: Option<MoneyPerQuantity>,
    prices: PeriodSeries<MoneyPerQuantity>,
}

impl Sector {
    /// Validate a configuration and prepare the sector for the given timeline.
    ///
    /// A sector without a land allocation is unusual enough to log, but not an error. A missing
    /// market region is also not an error: the sector then clears in its own region and a
    /// warning is logged.
    pub fn new(
        config: SectorConfig,
        modeltime: &Modeltime,
        land: Option<&LandAllocator>,
    ) -> Result<Self> {
        if land.is_none_or(|land| land.area(&config.region_id).is_none()) {
            error!("No land allocation found in region {}.", config.region_id);
        }

        if let Some(cal_price) = config.cal_price {
            ensure!(
                cal_price.is_finite() && cal_price >= MoneyPerQuantity(0.0),
                "Calibration price for sector {} must be finite and non-negative",
                config.id
            );
        }

        let market_region_id = match config.market_region_id {
            Some(market_region_id) => market_region_id,
            None => {
                warn!(
                    "Market region for sector {} was not set. Defaulting to regional market.",
                    config.id
                );
                config.region_id.clone()
            }
        };

        let mut prices = PeriodSeries::new(modeltime);
        if let Some(cal_price) = config.cal_price {
            for period in modeltime.periods() {
                prices.set(period, cal_price / CURRENCY_CONVERSION);
            }
        }

        Ok(Self {
            id: config.id,
            region_id: config.region_id,
            market_region_id,
            kind: config.kind,
            description: config.description,
            cal_price: config.cal_price,
            prices,
        })
    }

    /// Register the market in which this sector's good clears.
    ///
    /// Only the call which creates the market writes to it: the calibration price seeds the
    /// market's price trajectory and is published in the market info for every period, and every
    /// period after the first is flagged for the solver. Returns whether the market was newly
    /// created.
    pub fn set_market(&self, markets: &mut Marketplace, modeltime: &Modeltime) -> bool {
        let created = markets.create_market(
            &self.region_id,
            &self.market_region_id,
            &self.id,
            MarketKind::Normal,
        );
        if created {
            if let Some(cal_price) = self.cal_price {
                let prices = vec![cal_price / CURRENCY_CONVERSION; modeltime.max_periods()];
                markets.set_price_vector(&self.id, &self.region_id, &prices);

                // The market info carries the calibration price on its input basis
                for period in modeltime.periods() {
                    if let Some(info) = markets.market_info_mut(&self.id, &self.region_id, period)
                    {
                        info.set_value(CAL_PRICE_KEY, cal_price.value());
                    }
                }
            }
            for period in modeltime.periods().skip(1) {
                markets.set_market_to_solve(&self.id, &self.region_id, period);
            }
        }

        created
    }

    /// Take the market's price for the given period as the sector's own
    pub fn record_market_price(&mut self, markets: &Marketplace, period: usize) {
        self.prices
            .set(period, markets.price(&self.id, &self.region_id, period));
    }

    /// The sector's price for the given period
    pub fn price(&self, period: usize) -> MoneyPerQuantity {
        self.prices.get(period)
    }

    /// The calibration price for the sector's good, if one was given
    pub fn cal_price(&self) -> Option<MoneyPerQuantity> {
        self.cal_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, land, markets, modeltime, sector_config};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_new_seeds_prices_from_cal_price(
        sector_config: SectorConfig,
        modeltime: Modeltime,
        land: LandAllocator,
    ) {
        let sector = Sector::new(sector_config, &modeltime, Some(&land)).unwrap();

        // 5.0 converted to the internal currency basis
        for period in modeltime.periods() {
            assert_approx_eq!(
                MoneyPerQuantity,
                sector.price(period),
                MoneyPerQuantity(2.2604),
                epsilon = 1e-4
            );
        }
        assert_eq!(sector.cal_price(), Some(MoneyPerQuantity(5.0)));
    }

    #[rstest]
    fn test_new_without_cal_price(
        mut sector_config: SectorConfig,
        modeltime: Modeltime,
        land: LandAllocator,
    ) {
        sector_config.cal_price = None;
        let sector = Sector::new(sector_config, &modeltime, Some(&land)).unwrap();
        for period in modeltime.periods() {
            assert_eq!(sector.price(period), MoneyPerQuantity(0.0));
        }
        assert_eq!(sector.cal_price(), None);
    }

    #[rstest]
    fn test_new_with_negative_cal_price(
        mut sector_config: SectorConfig,
        modeltime: Modeltime,
        land: LandAllocator,
    ) {
        sector_config.cal_price = Some(MoneyPerQuantity(-1.0));
        assert_error!(
            Sector::new(sector_config, &modeltime, Some(&land)),
            "Calibration price for sector food must be finite and non-negative"
        );
    }

    #[rstest]
    fn test_new_without_land_allocation(sector_config: SectorConfig, modeltime: Modeltime) {
        // Missing land allocation is logged, not fatal
        let sector = Sector::new(sector_config, &modeltime, None).unwrap();
        assert_eq!(sector.kind, SectorKind::Agriculture);
    }

    #[rstest]
    fn test_market_region_defaults_to_own_region(
        mut sector_config: SectorConfig,
        modeltime: Modeltime,
        land: LandAllocator,
    ) {
        sector_config.market_region_id = None;
        let sector = Sector::new(sector_config, &modeltime, Some(&land)).unwrap();
        assert_eq!(sector.market_region_id, sector.region_id);
    }

    #[rstest]
    fn test_set_market(
        sector_config: SectorConfig,
        modeltime: Modeltime,
        land: LandAllocator,
        mut markets: Marketplace,
    ) {
        let sector = Sector::new(sector_config, &modeltime, Some(&land)).unwrap();
        assert!(sector.set_market(&mut markets, &modeltime));

        for period in modeltime.periods() {
            assert_approx_eq!(
                MoneyPerQuantity,
                markets.price(&sector.id, &sector.region_id, period),
                MoneyPerQuantity(2.2604),
                epsilon = 1e-4
            );
            let info = markets
                .market_info(&sector.id, &sector.region_id, period)
                .unwrap();
            assert_eq!(info.value(CAL_PRICE_KEY), Some(5.0));
        }
        assert!(!markets.is_market_to_solve(&sector.id, &sector.region_id, 0));
        assert!(markets.is_market_to_solve(&sector.id, &sector.region_id, 1));
    }

    #[rstest]
    fn test_set_market_twice_writes_once(
        sector_config: SectorConfig,
        modeltime: Modeltime,
        land: LandAllocator,
        mut markets: Marketplace,
    ) {
        let sector = Sector::new(sector_config, &modeltime, Some(&land)).unwrap();
        assert!(sector.set_market(&mut markets, &modeltime));

        // The second registration must not reseed the market's prices
        markets.set_price(&sector.id, &sector.region_id, 1, MoneyPerQuantity(9.0));
        assert!(!sector.set_market(&mut markets, &modeltime));
        assert_eq!(
            markets.price(&sector.id, &sector.region_id, 1),
            MoneyPerQuantity(9.0)
        );
        assert_eq!(markets.markets().count(), 1);
    }

    #[rstest]
    fn test_record_market_price(
        sector_config: SectorConfig,
        modeltime: Modeltime,
        land: LandAllocator,
        mut markets: Marketplace,
    ) {
        let mut sector = Sector::new(sector_config, &modeltime, Some(&land)).unwrap();
        sector.set_market(&mut markets, &modeltime);

        markets.set_price(&sector.id, &sector.region_id, 2, MoneyPerQuantity(3.3));
        sector.record_market_price(&markets, 2);
        assert_eq!(sector.price(2), MoneyPerQuantity(3.3));
    }
}
