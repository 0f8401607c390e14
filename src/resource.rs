//! Resources produce a good for one region from a set of sub-resource supply curves.
use crate::gdp::Gdp;
use crate::market::{GoodID, MarketKind, Marketplace};
use crate::modeltime::{Modeltime, PeriodSeries};
use crate::region::RegionID;
use crate::subresource::SubResource;
use crate::units::{MoneyPerQuantity, Quantity};
use anyhow::{Result, ensure};
use log::warn;

/// The raw description of a resource, prior to validation
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceConfig {
    /// The good this resource produces
    pub id: GoodID,
    /// The region in which this resource produces
    pub region_id: RegionID,
    /// The region under whose name the good's market clears, if not the resource's own
    pub market_region_id: Option<RegionID>,
    /// A text description of the resource
    pub description: String,
}

/// A supplier of one good in one region.
///
/// The resource responds to the good's market price with the summed supply of its
/// sub-resources, and reports that supply back to the market.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// The good this resource produces
    pub id: GoodID,
    /// The region in which this resource produces
    pub region_id: RegionID,
    /// The region under whose name the good's market clears
    pub market_region_id: RegionID,
    /// A text description of the resource
    pub description: String,
    subresources: Vec<SubResource>,
    annual: PeriodSeries<Quantity>,
    prices: PeriodSeries<MoneyPerQuantity>,
}

impl Resource {
    /// Validate a configuration and prepare the resource for the given timeline.
    ///
    /// A missing market region is not an error: the resource then clears in its own region and
    /// a warning is logged.
    pub fn new(
        config: ResourceConfig,
        modeltime: &Modeltime,
        subresources: Vec<SubResource>,
    ) -> Result<Self> {
        ensure!(
            !subresources.is_empty(),
            "Resource {} must have at least one sub-resource",
            config.id
        );

        let market_region_id = match config.market_region_id {
            Some(market_region_id) => market_region_id,
            None => {
                warn!(
                    "Market region for resource {} was not set. Defaulting to regional market.",
                    config.id
                );
                config.region_id.clone()
            }
        };

        Ok(Self {
            id: config.id,
            region_id: config.region_id,
            market_region_id,
            description: config.description,
            subresources,
            annual: PeriodSeries::new(modeltime),
            prices: PeriodSeries::new(modeltime),
        })
    }

    /// Register the market in which this resource's good clears.
    ///
    /// If this call creates the market, every period after the first is flagged for the solver.
    /// Returns whether the market was newly created.
    pub fn set_market(&self, markets: &mut Marketplace, modeltime: &Modeltime) -> bool {
        let created = markets.create_market(
            &self.region_id,
            &self.market_region_id,
            &self.id,
            MarketKind::Normal,
        );
        if created {
            for period in modeltime.periods().skip(1) {
                markets.set_market_to_solve(&self.id, &self.region_id, period);
            }
        }

        created
    }

    /// Evaluate every sub-resource at the market's trial price and report the summed annual
    /// supply back to the market.
    ///
    /// The previous period's price is passed along for curves with an investment lag. For the
    /// first period the current price stands in for it.
    pub fn compute_supply(
        &mut self,
        markets: &mut Marketplace,
        modeltime: &Modeltime,
        gdp: &Gdp,
        period: usize,
    ) {
        let price = markets.price(&self.id, &self.region_id, period);
        let prev_price = if period == 0 {
            price
        } else {
            markets.price(&self.id, &self.region_id, period - 1)
        };
        let gdp_value = gdp.get(&self.region_id, period);

        let annual: Quantity = self
            .subresources
            .iter_mut()
            .map(|subresource| {
                subresource.cumulative_supply(price, period, gdp_value);
                subresource.annual_supply(period, modeltime, gdp_value, price, prev_price)
            })
            .sum();

        self.annual.set(period, annual);
        self.prices.set(period, price);
        markets.add_to_supply(&self.id, &self.region_id, period, annual);
    }

    /// The summed cumulative production of every sub-resource for the given period
    pub fn cumulative(&self, period: usize) -> Quantity {
        self.subresources
            .iter()
            .map(|subresource| subresource.cumulative(period))
            .sum()
    }

    /// The summed annual supply recorded for the given period
    pub fn annual(&self, period: usize) -> Quantity {
        self.annual.get(period)
    }

    /// The price at which the given period was last evaluated
    pub fn price(&self, period: usize) -> MoneyPerQuantity {
        self.prices.get(period)
    }

    /// The sub-resources this resource produces from
    pub fn subresources(&self) -> &[SubResource] {
        &self.subresources
    }
}
