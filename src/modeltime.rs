//! The simulation timeline and containers indexed by its periods.
//!
//! The timeline is an ordered list of milestone years. Each milestone year closes one period,
//! so the length of a period is the gap back to the previous milestone year.
use crate::input::is_sorted_and_unique;
use crate::units::Quantity;
use anyhow::{Result, ensure};
use std::ops::Range;

/// The milestone years over which the simulation runs
#[derive(Debug, Clone, PartialEq)]
pub struct Modeltime {
    years: Vec<u32>,
}

impl Modeltime {
    /// Create a timeline from milestone years, which must be sorted and unique.
    pub fn new(years: Vec<u32>) -> Result<Self> {
        ensure!(
            !years.is_empty(),
            "Model must cover at least one milestone year"
        );
        ensure!(
            is_sorted_and_unique(&years),
            "Milestone years must be sorted and unique"
        );

        Ok(Self { years })
    }

    /// The number of periods in the timeline
    pub fn max_periods(&self) -> usize {
        self.years.len()
    }

    /// Iterate over period indices in order
    pub fn periods(&self) -> Range<usize> {
        0..self.years.len()
    }

    /// The milestone year which closes the given period
    pub fn year(&self, period: usize) -> u32 {
        self.years[period]
    }

    /// All milestone years in order
    pub fn milestone_years(&self) -> &[u32] {
        &self.years
    }

    /// The number of years covered by the given period.
    ///
    /// The first period borrows the gap to the second milestone year so that every period has a
    /// nonzero length. A single-year timeline has a timestep of one.
    pub fn timestep(&self, period: usize) -> u32 {
        if self.years.len() == 1 {
            1
        } else if period == 0 {
            self.years[1] - self.years[0]
        } else {
            self.years[period] - self.years[period - 1]
        }
    }
}

/// A value of some copyable type for every period of the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSeries<T>(Vec<T>);

impl<T: Copy + Default> PeriodSeries<T> {
    /// Create a series with one default entry per period
    pub fn new(modeltime: &Modeltime) -> Self {
        Self(vec![T::default(); modeltime.max_periods()])
    }

    /// The value stored for the given period
    pub fn get(&self, period: usize) -> T {
        self.0[period]
    }

    /// Overwrite the value stored for the given period
    pub fn set(&mut self, period: usize, value: T) {
        self.0[period] = value;
    }

    /// Iterate over the stored values in period order
    pub fn iter(&self) -> impl Iterator<Item = T> {
        self.0.iter().copied()
    }
}

/// A running total per period which never falls below the level of the period before.
///
/// Totals are only written through [`CumulativeSeries::record`], which clamps each update to the
/// level already reached in the previous period.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeSeries(Vec<Quantity>);

impl CumulativeSeries {
    /// Create a series with a zero entry per period
    pub fn new(modeltime: &Modeltime) -> Self {
        Self(vec![Quantity(0.0); modeltime.max_periods()])
    }

    /// The total recorded for the given period
    pub fn get(&self, period: usize) -> Quantity {
        self.0[period]
    }

    /// The level below which the total for the given period cannot fall
    pub fn floor(&self, period: usize) -> Quantity {
        if period == 0 {
            Quantity(0.0)
        } else {
            self.0[period - 1]
        }
    }

    /// Store a total for the given period, returning the value actually stored.
    pub fn record(&mut self, period: usize, value: Quantity) -> Quantity {
        let stored = value.max(self.floor(period));
        self.0[period] = stored;
        stored
    }
}
