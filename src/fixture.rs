//! Fixtures for tests
use crate::gdp::Gdp;
use crate::grade::Grade;
use crate::land::LandAllocator;
use crate::market::Marketplace;
use crate::model::Model;
use crate::modeltime::Modeltime;
use crate::region::{Region, RegionID, RegionMap};
use crate::resource::{Resource, ResourceConfig};
use crate::sector::{Sector, SectorConfig, SectorKind};
use crate::subresource::{SubResource, SubResourceConfig, SupplyCurveConfig};
use crate::units::{Dimensionless, Money, MoneyPerQuantity, Quantity};
use rstest::fixture;
use std::collections::{HashMap, HashSet};

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn region_ids() -> HashSet<RegionID> {
    ["NA".into(), "EU".into()].into_iter().collect()
}

#[fixture]
pub fn modeltime() -> Modeltime {
    Modeltime::new(vec![1990, 2005, 2020, 2035]).unwrap()
}

#[fixture]
pub fn markets(modeltime: Modeltime) -> Marketplace {
    Marketplace::new(&modeltime)
}

#[fixture]
pub fn grades() -> Vec<Grade> {
    vec![
        Grade {
            cost: MoneyPerQuantity(1.0),
            available: Quantity(10.0),
        },
        Grade {
            cost: MoneyPerQuantity(3.0),
            available: Quantity(5.0),
        },
        Grade {
            cost: MoneyPerQuantity(5.0),
            available: Quantity(20.0),
        },
    ]
}

#[fixture]
pub fn depletable(grades: Vec<Grade>, modeltime: Modeltime) -> SubResource {
    SubResource::new(
        SubResourceConfig {
            id: "conventional".into(),
            curve: SupplyCurveConfig::Depletable { grades },
        },
        &modeltime,
    )
    .unwrap()
}

#[fixture]
pub fn renewable(modeltime: Modeltime) -> SubResource {
    SubResource::new(
        SubResourceConfig {
            id: "plantation".into(),
            curve: SupplyCurveConfig::Renewable {
                max_annual_supply: Quantity(100.0),
                base_gdp: Money(1000.0),
                gdp_supply_elasticity: Dimensionless(1.0),
                variance: Dimensionless(0.15),
                capacity_factor: Dimensionless(0.35),
            },
        },
        &modeltime,
    )
    .unwrap()
}

#[fixture]
pub fn gdp() -> Gdp {
    Gdp::new(HashMap::from([
        (
            "NA".into(),
            vec![
                Money(1000.0),
                Money(1500.0),
                Money(2000.0),
                Money(2600.0),
            ],
        ),
        (
            "EU".into(),
            vec![Money(800.0), Money(1100.0), Money(1400.0), Money(1700.0)],
        ),
    ]))
}

#[fixture]
pub fn resource_config() -> ResourceConfig {
    ResourceConfig {
        id: "oil".into(),
        region_id: "NA".into(),
        market_region_id: Some("NA".into()),
        description: "Crude oil".into(),
    }
}

#[fixture]
pub fn resource(
    resource_config: ResourceConfig,
    modeltime: Modeltime,
    depletable: SubResource,
) -> Resource {
    let unconventional = SubResource::new(
        SubResourceConfig {
            id: "unconventional".into(),
            curve: SupplyCurveConfig::Depletable {
                grades: vec![Grade {
                    cost: MoneyPerQuantity(8.0),
                    available: Quantity(40.0),
                }],
            },
        },
        &modeltime,
    )
    .unwrap();

    Resource::new(resource_config, &modeltime, vec![depletable, unconventional]).unwrap()
}

#[fixture]
pub fn sector_config() -> SectorConfig {
    SectorConfig {
        id: "food".into(),
        region_id: "NA".into(),
        kind: SectorKind::Agriculture,
        cal_price: Some(MoneyPerQuantity(5.0)),
        market_region_id: Some("NA".into()),
        description: "Food supply".into(),
    }
}

#[fixture]
pub fn land() -> LandAllocator {
    LandAllocator::new(HashMap::from([
        ("NA".into(), Quantity(1500.0)),
        ("EU".into(), Quantity(800.0)),
    ]))
}

#[fixture]
pub fn model(
    modeltime: Modeltime,
    gdp: Gdp,
    resource: Resource,
    sector_config: SectorConfig,
    land: LandAllocator,
) -> Model {
    let sector = Sector::new(sector_config, &modeltime, Some(&land)).unwrap();
    let regions: RegionMap = ["NA", "EU"]
        .into_iter()
        .map(|id| {
            (
                RegionID::new(id),
                Region {
                    id: id.into(),
                    description: id.into(),
                },
            )
        })
        .collect();

    Model {
        modeltime,
        regions,
        gdp,
        land: Some(land),
        resources: vec![resource],
        sectors: vec![sector],
    }
}
