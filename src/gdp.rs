//! Regional GDP trajectories, used to scale the availability of renewable resources.
use crate::region::RegionID;
use crate::units::Money;
use std::collections::HashMap;

/// GDP for every region and milestone year
#[derive(Debug, Clone, PartialEq)]
pub struct Gdp(HashMap<RegionID, Vec<Money>>);

impl Gdp {
    /// Create GDP trajectories from per-period values keyed by region
    pub fn new(values: HashMap<RegionID, Vec<Money>>) -> Self {
        Self(values)
    }

    /// GDP for the given region and period.
    ///
    /// # Panics
    ///
    /// Panics if there is no entry for this region and period. The input layer guarantees a
    /// value for every region and milestone year.
    pub fn get(&self, region_id: &RegionID, period: usize) -> Money {
        *self
            .0
            .get(region_id)
            .expect("No GDP trajectory for region")
            .get(period)
            .expect("No GDP value for period")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get() {
        let gdp = Gdp::new(HashMap::from([(
            "NA".into(),
            vec![Money(1000.0), Money(1500.0)],
        )]));

        assert_eq!(gdp.get(&"NA".into(), 1), Money(1500.0));
    }

    #[test]
    #[should_panic(expected = "No GDP trajectory for region")]
    fn test_get_unknown_region() {
        let gdp = Gdp::new(HashMap::new());
        gdp.get(&"NA".into(), 0);
    }
}
