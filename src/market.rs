//! The marketplace ledger which records prices, supplies and demands for traded goods.
//!
//! Each market clears one good under the name of one region. Several regions can share a market
//! by naming the same market region when they register, in which case flows from all of them
//! accumulate in the same entry.
use crate::id::define_id_type;
use crate::modeltime::Modeltime;
use crate::region::RegionID;
use crate::units::{MoneyPerQuantity, Quantity};
use log::warn;
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::collections::{HashMap, HashSet};

define_id_type! {GoodID}

/// The price reported for a good with no market
pub const NO_MARKET_PRICE: MoneyPerQuantity = MoneyPerQuantity(f64::NAN);

/// The trial price of every market before any price has been set
const INITIAL_PRICE: MoneyPerQuantity = MoneyPerQuantity(1.0);

/// Classifies how a market's price is determined
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, SerializeLabeledStringEnum, DeserializeLabeledStringEnum,
)]
pub enum MarketKind {
    /// The price is a trial value adjusted by the solver
    #[string = "normal"]
    Normal,
    /// The price is pinned to a calibration value and never solved
    #[string = "calibration"]
    Calibration,
}

/// Keyed metadata attached to a market for one period
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketInfo(HashMap<String, f64>);

impl MarketInfo {
    /// Store a value under the given key, replacing any previous value
    pub fn set_value(&mut self, key: &str, value: f64) {
        self.0.insert(key.to_string(), value);
    }

    /// The value stored under the given key, if any
    pub fn value(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }
}

/// A single market clearing one good across one or more regions
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    /// The good traded in this market
    pub good_id: GoodID,
    /// The region under whose name the market clears
    pub market_region_id: RegionID,
    /// How the market's price is determined
    pub kind: MarketKind,
    regions: HashSet<RegionID>,
    prices: Vec<MoneyPerQuantity>,
    supplies: Vec<Quantity>,
    demands: Vec<Quantity>,
    solve: Vec<bool>,
    info: Vec<MarketInfo>,
}

impl Market {
    fn new(
        good_id: GoodID,
        market_region_id: RegionID,
        kind: MarketKind,
        max_periods: usize,
    ) -> Self {
        Self {
            good_id,
            market_region_id,
            kind,
            regions: HashSet::new(),
            prices: vec![INITIAL_PRICE; max_periods],
            supplies: vec![Quantity(0.0); max_periods],
            demands: vec![Quantity(0.0); max_periods],
            solve: vec![false; max_periods],
            info: vec![MarketInfo::default(); max_periods],
        }
    }

    /// The trial price for the given period
    pub fn price(&self, period: usize) -> MoneyPerQuantity {
        self.prices[period]
    }

    /// The total supply recorded for the given period
    pub fn supply(&self, period: usize) -> Quantity {
        self.supplies[period]
    }

    /// The total demand recorded for the given period
    pub fn demand(&self, period: usize) -> Quantity {
        self.demands[period]
    }

    /// The regions whose supply and demand flow into this market
    pub fn regions(&self) -> &HashSet<RegionID> {
        &self.regions
    }

    /// The metadata attached to this market for the given period
    pub fn info(&self, period: usize) -> &MarketInfo {
        &self.info[period]
    }
}

/// The ledger of all markets, indexed by good and region.
///
/// Every operation which takes a good and a region resolves them to a market through the alias
/// table filled in by [`Marketplace::create_market`]. Queries for a good with no market never
/// fail: reads log a warning and report a neutral value, writes log a warning and are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Marketplace {
    markets: Vec<Market>,
    lookup: HashMap<(GoodID, RegionID), usize>,
    max_periods: usize,
}

impl Marketplace {
    /// Create an empty marketplace covering the timeline's periods
    pub fn new(modeltime: &Modeltime) -> Self {
        Self {
            markets: Vec::new(),
            lookup: HashMap::new(),
            max_periods: modeltime.max_periods(),
        }
    }

    /// Register a market for a good on behalf of one region.
    ///
    /// The market clears under `market_region_id`, so regions registering the same good with the
    /// same market region share one market. Returns true if the market was newly created and
    /// false if the region joined an existing one.
    pub fn create_market(
        &mut self,
        region_id: &RegionID,
        market_region_id: &RegionID,
        good_id: &GoodID,
        kind: MarketKind,
    ) -> bool {
        let market_key = (good_id.clone(), market_region_id.clone());
        let mut created = false;
        let index = match self.lookup.get(&market_key) {
            Some(&index) => index,
            None => {
                let index = self.markets.len();
                self.markets.push(Market::new(
                    good_id.clone(),
                    market_region_id.clone(),
                    kind,
                    self.max_periods,
                ));
                self.lookup.insert(market_key, index);
                created = true;
                index
            }
        };

        self.markets[index].regions.insert(region_id.clone());
        self.lookup
            .insert((good_id.clone(), region_id.clone()), index);

        created
    }

    /// Iterate over all markets in creation order
    pub fn markets(&self) -> impl Iterator<Item = &Market> {
        self.markets.iter()
    }

    fn market_index(&self, good_id: &GoodID, region_id: &RegionID) -> Option<usize> {
        self.lookup
            .get(&(good_id.clone(), region_id.clone()))
            .copied()
    }

    /// The price of the given good for one region and period.
    ///
    /// If the good has no market, a warning is logged and [`NO_MARKET_PRICE`] returned.
    pub fn price(&self, good_id: &GoodID, region_id: &RegionID, period: usize) -> MoneyPerQuantity {
        let Some(index) = self.market_index(good_id, region_id) else {
            warn!("Queried price of good {good_id} in region {region_id}, which has no market");
            return NO_MARKET_PRICE;
        };

        self.markets[index].prices[period]
    }

    /// Overwrite the price of the given good for one period
    pub fn set_price(
        &mut self,
        good_id: &GoodID,
        region_id: &RegionID,
        period: usize,
        price: MoneyPerQuantity,
    ) {
        let Some(index) = self.market_index(good_id, region_id) else {
            warn!("Tried to price good {good_id} in region {region_id}, which has no market");
            return;
        };

        self.markets[index].prices[period] = price;
    }

    /// Seed the price trajectory of the given good, one entry per period.
    ///
    /// Extra entries beyond the timeline's periods are ignored.
    pub fn set_price_vector(
        &mut self,
        good_id: &GoodID,
        region_id: &RegionID,
        prices: &[MoneyPerQuantity],
    ) {
        let Some(index) = self.market_index(good_id, region_id) else {
            warn!("Tried to price good {good_id} in region {region_id}, which has no market");
            return;
        };

        let market = &mut self.markets[index];
        for (slot, price) in market.prices.iter_mut().zip(prices) {
            *slot = *price;
        }
    }

    /// Flag the given good's market so the solver adjusts its price in this period
    pub fn set_market_to_solve(&mut self, good_id: &GoodID, region_id: &RegionID, period: usize) {
        let Some(index) = self.market_index(good_id, region_id) else {
            warn!("Tried to flag good {good_id} in region {region_id}, which has no market");
            return;
        };

        self.markets[index].solve[period] = true;
    }

    /// Whether the given good's market price is to be solved in this period
    pub fn is_market_to_solve(
        &self,
        good_id: &GoodID,
        region_id: &RegionID,
        period: usize,
    ) -> bool {
        let Some(index) = self.market_index(good_id, region_id) else {
            return false;
        };

        self.markets[index].solve[period]
    }

    /// The metadata for the given good's market in one period
    pub fn market_info(
        &self,
        good_id: &GoodID,
        region_id: &RegionID,
        period: usize,
    ) -> Option<&MarketInfo> {
        let index = self.market_index(good_id, region_id)?;
        Some(&self.markets[index].info[period])
    }

    /// The mutable metadata for the given good's market in one period
    pub fn market_info_mut(
        &mut self,
        good_id: &GoodID,
        region_id: &RegionID,
        period: usize,
    ) -> Option<&mut MarketInfo> {
        let index = self.market_index(good_id, region_id)?;
        Some(&mut self.markets[index].info[period])
    }

    /// Add to the supply of the given good for one period
    pub fn add_to_supply(
        &mut self,
        good_id: &GoodID,
        region_id: &RegionID,
        period: usize,
        quantity: Quantity,
    ) {
        let Some(index) = self.market_index(good_id, region_id) else {
            warn!("Dropped supply of good {good_id} in region {region_id}, which has no market");
            return;
        };

        self.markets[index].supplies[period] += quantity;
    }

    /// Add to the demand for the given good for one period
    pub fn add_to_demand(
        &mut self,
        good_id: &GoodID,
        region_id: &RegionID,
        period: usize,
        quantity: Quantity,
    ) {
        let Some(index) = self.market_index(good_id, region_id) else {
            warn!("Dropped demand for good {good_id} in region {region_id}, which has no market");
            return;
        };

        self.markets[index].demands[period] += quantity;
    }

    /// The total supply of the given good recorded for one period
    pub fn supply(&self, good_id: &GoodID, region_id: &RegionID, period: usize) -> Quantity {
        let Some(index) = self.market_index(good_id, region_id) else {
            warn!("Queried supply of good {good_id} in region {region_id}, which has no market");
            return Quantity(0.0);
        };

        self.markets[index].supplies[period]
    }

    /// The total demand for the given good recorded for one period
    pub fn demand(&self, good_id: &GoodID, region_id: &RegionID, period: usize) -> Quantity {
        let Some(index) = self.market_index(good_id, region_id) else {
            warn!("Queried demand for good {good_id} in region {region_id}, which has no market");
            return Quantity(0.0);
        };

        self.markets[index].demands[period]
    }

    /// Zero the recorded supply and demand of every market for the given period
    pub fn reset_flows(&mut self, period: usize) {
        for market in &mut self.markets {
            market.supplies[period] = Quantity(0.0);
            market.demands[period] = Quantity(0.0);
        }
    }
}
