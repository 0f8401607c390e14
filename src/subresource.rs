//! Sub-resources hold the supply curves from which resources produce their goods.
//!
//! A depletable curve is a ladder of cost grades: a trial price buys every grade it can cover,
//! and production carried out in earlier periods is never given back. A renewable curve renews
//! every period and is bounded by a ceiling which scales with regional GDP.
use crate::grade::Grade;
use crate::id::define_id_type;
use crate::modeltime::{CumulativeSeries, Modeltime, PeriodSeries};
use crate::units::{Dimensionless, Money, MoneyPerQuantity, Quantity};
use anyhow::{Context, Result, ensure};

define_id_type! {SubResourceID}

/// The raw parameters for one sub-resource's supply curve
#[derive(Debug, Clone, PartialEq)]
pub enum SupplyCurveConfig {
    /// A cost ladder of grades which deplete across periods
    Depletable {
        /// The steps of the ladder, in any order
        grades: Vec<Grade>,
    },
    /// A flow which renews every period, bounded by a GDP-scaled ceiling
    Renewable {
        /// The annual supply available at the base GDP level
        max_annual_supply: Quantity,
        /// The GDP level at which the ceiling equals `max_annual_supply`
        base_gdp: Money,
        /// How strongly the ceiling responds to GDP growth
        gdp_supply_elasticity: Dimensionless,
        /// The read-in variability of the resource's output
        variance: Dimensionless,
        /// The read-in average capacity factor of the resource
        capacity_factor: Dimensionless,
    },
}

/// The raw description of a sub-resource, prior to validation
#[derive(Debug, Clone, PartialEq)]
pub struct SubResourceConfig {
    /// A unique identifier for the sub-resource within its resource
    pub id: SubResourceID,
    /// The supply curve parameters
    pub curve: SupplyCurveConfig,
}

/// A ladder of grades sorted by ascending cost
#[derive(Debug, Clone, PartialEq)]
struct GradeLadder {
    grades: Vec<Grade>,
}

impl GradeLadder {
    fn new(mut grades: Vec<Grade>) -> Result<Self> {
        ensure!(
            !grades.is_empty(),
            "A depletable supply curve must have at least one grade"
        );
        for grade in &grades {
            ensure!(grade.cost.is_finite(), "Grade costs must be finite");
            ensure!(
                grade.available.is_finite() && grade.available >= Quantity(0.0),
                "Grade quantities must be finite and non-negative"
            );
        }
        grades.sort_by(|a, b| a.cost.value().total_cmp(&b.cost.value()));

        Ok(Self { grades })
    }

    /// The total quantity of every grade whose cost the given price covers
    fn available_at(&self, price: MoneyPerQuantity) -> Quantity {
        self.grades
            .iter()
            .take_while(|grade| grade.cost <= price)
            .map(|grade| grade.available)
            .sum()
    }
}

/// The parameters of a GDP-scaled renewable supply ceiling
#[derive(Debug, Clone, PartialEq)]
struct RenewableCurve {
    max_annual_supply: Quantity,
    base_gdp: Money,
    gdp_supply_elasticity: Dimensionless,
    variance: Dimensionless,
    capacity_factor: Dimensionless,
}

impl RenewableCurve {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.max_annual_supply.is_finite() && self.max_annual_supply > Quantity(0.0),
            "Maximum annual supply must be finite and positive"
        );
        ensure!(
            self.base_gdp.is_finite() && self.base_gdp > Money(0.0),
            "Base GDP must be finite and positive"
        );
        ensure!(
            self.gdp_supply_elasticity.is_finite()
                && self.gdp_supply_elasticity >= Dimensionless(0.0),
            "GDP supply elasticity must be finite and non-negative"
        );
        ensure!(
            self.variance.is_finite() && self.variance >= Dimensionless(0.0),
            "Variance must be finite and non-negative"
        );
        ensure!(
            self.capacity_factor > Dimensionless(0.0)
                && self.capacity_factor <= Dimensionless(1.0),
            "Capacity factor must be in the range (0, 1]"
        );

        Ok(())
    }

    /// The supply ceiling for the given GDP level
    fn ceiling(&self, gdp: Money) -> Quantity {
        self.max_annual_supply * (gdp / self.base_gdp).powf(self.gdp_supply_elasticity)
    }

    /// The full ceiling at any positive price, otherwise nothing
    fn available_at(&self, price: MoneyPerQuantity, gdp: Money) -> Quantity {
        if price > MoneyPerQuantity(0.0) {
            self.ceiling(gdp)
        } else {
            Quantity(0.0)
        }
    }
}

/// The supply curve of a sub-resource, together with its recorded production
#[derive(Debug, Clone, PartialEq)]
enum SupplyCurve {
    Depletable {
        ladder: GradeLadder,
        cumulative: CumulativeSeries,
    },
    Renewable {
        curve: RenewableCurve,
        available: PeriodSeries<Quantity>,
    },
}

/// One supply curve of a resource, with the production it has recorded so far
#[derive(Debug, Clone, PartialEq)]
pub struct SubResource {
    /// A unique identifier for the sub-resource within its resource
    pub id: SubResourceID,
    curve: SupplyCurve,
    annual: PeriodSeries<Quantity>,
    prices: PeriodSeries<MoneyPerQuantity>,
}

impl SubResource {
    /// Validate a configuration and prepare the sub-resource for the given timeline.
    ///
    /// Grades are sorted by ascending cost here, so evaluation can assume a monotone ladder.
    pub fn new(config: SubResourceConfig, modeltime: &Modeltime) -> Result<Self> {
        let curve = match config.curve {
            SupplyCurveConfig::Depletable { grades } => SupplyCurve::Depletable {
                ladder: GradeLadder::new(grades).with_context(|| {
                    format!("Invalid supply curve for sub-resource {}", config.id)
                })?,
                cumulative: CumulativeSeries::new(modeltime),
            },
            SupplyCurveConfig::Renewable {
                max_annual_supply,
                base_gdp,
                gdp_supply_elasticity,
                variance,
                capacity_factor,
            } => {
                let curve = RenewableCurve {
                    max_annual_supply,
                    base_gdp,
                    gdp_supply_elasticity,
                    variance,
                    capacity_factor,
                };
                curve.validate().with_context(|| {
                    format!("Invalid supply curve for sub-resource {}", config.id)
                })?;

                SupplyCurve::Renewable {
                    curve,
                    available: PeriodSeries::new(modeltime),
                }
            }
        };

        Ok(Self {
            id: config.id,
            curve,
            annual: PeriodSeries::new(modeltime),
            prices: PeriodSeries::new(modeltime),
        })
    }

    /// Record and return the quantity available up to the given trial price.
    ///
    /// For a depletable curve this covers every grade whose cost the price reaches and never
    /// falls below the total recorded for the previous period. For a renewable curve it is the
    /// GDP-scaled ceiling, which stands in for cumulative production. `gdp` has no effect on
    /// depletable curves.
    pub fn cumulative_supply(
        &mut self,
        price: MoneyPerQuantity,
        period: usize,
        gdp: Money,
    ) -> Quantity {
        self.prices.set(period, price);
        match &mut self.curve {
            SupplyCurve::Depletable { ladder, cumulative } => {
                cumulative.record(period, ladder.available_at(price))
            }
            SupplyCurve::Renewable { curve, available } => {
                let quantity = curve.available_at(price, gdp);
                available.set(period, quantity);
                quantity
            }
        }
    }

    /// Compute and record the annual supply flow for one period.
    ///
    /// A depletable curve turns the change in cumulative production into an average annual flow
    /// over the period's timestep. The flow is never negative: when the price implies one, the
    /// flow is zero and cumulative production holds at the previous period's level. A renewable
    /// curve supplies its full availability at the mean of the current and previous periods'
    /// prices, since its capacity was built under the earlier price.
    ///
    /// Repeating the call with the same arguments leaves the recorded state unchanged, so the
    /// solver may probe each period as often as it needs.
    pub fn annual_supply(
        &mut self,
        period: usize,
        modeltime: &Modeltime,
        gdp: Money,
        price: MoneyPerQuantity,
        prev_price: MoneyPerQuantity,
    ) -> Quantity {
        let annual = match &mut self.curve {
            SupplyCurve::Depletable { ladder, cumulative } => {
                let current = cumulative.record(period, ladder.available_at(price));
                let timestep = Dimensionless(modeltime.timestep(period).into());
                if period == 0 {
                    current / timestep
                } else {
                    let previous = cumulative.get(period - 1);
                    // Twice the average flow over the timestep, less the flow already
                    // attributed to the previous period
                    let flow = Dimensionless(2.0) * (current - previous) / timestep
                        - self.annual.get(period - 1);
                    if flow <= Quantity(0.0) {
                        cumulative.record(period, previous);
                        Quantity(0.0)
                    } else {
                        flow
                    }
                }
            }
            SupplyCurve::Renewable { curve, available } => {
                let effective = if period == 0 {
                    price
                } else {
                    (price + prev_price) / Dimensionless(2.0)
                };
                let quantity = curve.available_at(effective, gdp);
                available.set(period, quantity);
                quantity
            }
        };
        self.prices.set(period, price);
        self.annual.set(period, annual);

        annual
    }

    /// The cumulative quantity recorded for the given period
    pub fn cumulative(&self, period: usize) -> Quantity {
        match &self.curve {
            SupplyCurve::Depletable { cumulative, .. } => cumulative.get(period),
            SupplyCurve::Renewable { available, .. } => available.get(period),
        }
    }

    /// The annual supply flow recorded for the given period
    pub fn annual(&self, period: usize) -> Quantity {
        self.annual.get(period)
    }

    /// The price at which the given period was last evaluated
    pub fn price(&self, period: usize) -> MoneyPerQuantity {
        self.prices.get(period)
    }

    /// The read-in output variability, present only for renewable curves
    pub fn variance(&self) -> Option<Dimensionless> {
        match &self.curve {
            SupplyCurve::Depletable { .. } => None,
            SupplyCurve::Renewable { curve, .. } => Some(curve.variance),
        }
    }

    /// The read-in average capacity factor, present only for renewable curves
    pub fn capacity_factor(&self) -> Option<Dimensionless> {
        match &self.curve {
            SupplyCurve::Depletable { .. } => None,
            SupplyCurve::Renewable { curve, .. } => Some(curve.capacity_factor),
        }
    }
}
