//! Code for reading resources and their supply curves from CSV files.
//!
//! Resources are described across three files: the resources themselves, the sub-resources
//! providing their supply curves, and the grades of each depletable curve.
use super::*;
use crate::grade::Grade;
use crate::id::IDCollection;
use crate::market::GoodID;
use crate::region::RegionID;
use crate::resource::{Resource, ResourceConfig};
use crate::subresource::{SubResource, SubResourceConfig, SubResourceID, SupplyCurveConfig};
use crate::units::{Dimensionless, Money, MoneyPerQuantity, Quantity};
use serde_string_enum::DeserializeLabeledStringEnum;
use std::collections::HashMap;
use std::path::Path;

const RESOURCES_FILE_NAME: &str = "resources.csv";
const SUBRESOURCES_FILE_NAME: &str = "subresources.csv";
const GRADES_FILE_NAME: &str = "grades.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct ResourceRow {
    /// The good the resource produces
    id: GoodID,
    /// The region in which the resource produces
    region_id: String,
    /// The region under whose name the good's market clears, if not the resource's own
    market_region_id: Option<String>,
    /// A text description of the resource
    description: String,
}

/// The kind of supply curve a sub-resource follows
#[derive(Debug, Clone, Copy, PartialEq, DeserializeLabeledStringEnum)]
enum SupplyCurveKind {
    #[string = "depletable"]
    Depletable,
    #[string = "renewable"]
    Renewable,
}

#[derive(Debug, Deserialize, PartialEq)]
struct SubResourceRow {
    /// The resource this sub-resource belongs to
    resource_id: GoodID,
    /// The region of that resource
    region_id: String,
    /// A unique identifier for the sub-resource within its resource
    id: SubResourceID,
    /// The kind of supply curve
    kind: SupplyCurveKind,
    /// The annual supply available at the base GDP level (renewable only)
    max_annual_supply: Option<Quantity>,
    /// The GDP level at which the ceiling equals `max_annual_supply` (renewable only)
    base_gdp: Option<Money>,
    /// How strongly the ceiling responds to GDP growth (renewable only)
    gdp_supply_elasticity: Option<Dimensionless>,
    /// The variability of the resource's output (renewable only, defaults to 0)
    variance: Option<Dimensionless>,
    /// The average capacity factor of the resource (renewable only, defaults to 1)
    capacity_factor: Option<Dimensionless>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct GradeRow {
    /// The resource the grade belongs to
    resource_id: GoodID,
    /// The region of that resource
    region_id: String,
    /// The sub-resource whose curve the grade is a step of
    subresource_id: SubResourceID,
    /// The extraction cost at which the grade becomes available
    cost: MoneyPerQuantity,
    /// The physical quantity available from the grade
    available: Quantity,
}

/// Grades grouped by the sub-resource they belong to
type GradeMap = HashMap<(GoodID, RegionID, SubResourceID), Vec<Grade>>;

/// Sub-resources grouped by the resource they belong to
type SubResourceMap = HashMap<(GoodID, RegionID), Vec<SubResource>>;

/// Reads resources and their supply curves from CSV files.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `region_ids` - All possible region IDs
/// * `modeltime` - The simulation timeline
///
/// # Returns
///
/// All resources in file order, or an error
pub fn read_resources(
    model_dir: &Path,
    region_ids: &HashSet<RegionID>,
    modeltime: &Modeltime,
) -> Result<Vec<Resource>> {
    let grades = read_grades(model_dir, region_ids)?;
    let subresources = read_subresources(model_dir, region_ids, modeltime, grades)?;

    let file_path = model_dir.join(RESOURCES_FILE_NAME);
    read_resources_from_iter(read_csv(&file_path)?, region_ids, modeltime, subresources)
        .with_context(|| input_err_msg(&file_path))
}

fn read_grades(model_dir: &Path, region_ids: &HashSet<RegionID>) -> Result<GradeMap> {
    let file_path = model_dir.join(GRADES_FILE_NAME);
    read_grades_from_iter(read_csv(&file_path)?, region_ids)
        .with_context(|| input_err_msg(&file_path))
}

fn read_grades_from_iter<I>(iter: I, region_ids: &HashSet<RegionID>) -> Result<GradeMap>
where
    I: Iterator<Item = GradeRow>,
{
    let mut map: GradeMap = HashMap::new();
    for row in iter {
        let region_id = region_ids.get_id_by_str(&row.region_id)?;
        map.entry((row.resource_id, region_id, row.subresource_id))
            .or_default()
            .push(Grade {
                cost: row.cost,
                available: row.available,
            });
    }

    Ok(map)
}

fn read_subresources(
    model_dir: &Path,
    region_ids: &HashSet<RegionID>,
    modeltime: &Modeltime,
    grades: GradeMap,
) -> Result<SubResourceMap> {
    let file_path = model_dir.join(SUBRESOURCES_FILE_NAME);
    read_subresources_from_iter(read_csv(&file_path)?, region_ids, modeltime, grades)
        .with_context(|| input_err_msg(&file_path))
}

fn read_subresources_from_iter<I>(
    iter: I,
    region_ids: &HashSet<RegionID>,
    modeltime: &Modeltime,
    mut grades: GradeMap,
) -> Result<SubResourceMap>
where
    I: Iterator<Item = SubResourceRow>,
{
    let mut map: SubResourceMap = HashMap::new();
    for row in iter {
        let region_id = region_ids.get_id_by_str(&row.region_id)?;
        let grade_key = (row.resource_id.clone(), region_id.clone(), row.id.clone());
        let curve = match row.kind {
            SupplyCurveKind::Depletable => {
                ensure!(
                    row.max_annual_supply.is_none()
                        && row.base_gdp.is_none()
                        && row.gdp_supply_elasticity.is_none()
                        && row.variance.is_none()
                        && row.capacity_factor.is_none(),
                    "Depletable sub-resource {} cannot have renewable curve parameters",
                    row.id
                );
                let grades = grades.remove(&grade_key).with_context(|| {
                    format!(
                        "No grades given for depletable sub-resource {} of resource {} in \
                         region {region_id}",
                        row.id, row.resource_id
                    )
                })?;

                SupplyCurveConfig::Depletable { grades }
            }
            SupplyCurveKind::Renewable => {
                ensure!(
                    grades.remove(&grade_key).is_none(),
                    "Renewable sub-resource {} cannot have grades",
                    row.id
                );

                SupplyCurveConfig::Renewable {
                    max_annual_supply: row
                        .max_annual_supply
                        .with_context(|| missing_field_msg("max_annual_supply", &row.id))?,
                    base_gdp: row
                        .base_gdp
                        .with_context(|| missing_field_msg("base_gdp", &row.id))?,
                    gdp_supply_elasticity: row
                        .gdp_supply_elasticity
                        .with_context(|| missing_field_msg("gdp_supply_elasticity", &row.id))?,
                    variance: row.variance.unwrap_or(Dimensionless(0.0)),
                    capacity_factor: row.capacity_factor.unwrap_or(Dimensionless(1.0)),
                }
            }
        };

        let subresource = SubResource::new(SubResourceConfig { id: row.id, curve }, modeltime)?;
        let entry = map.entry((grade_key.0, grade_key.1)).or_default();
        ensure!(
            entry.iter().all(|existing| existing.id != subresource.id),
            "Duplicate sub-resource {} for resource {} in region {region_id}",
            subresource.id,
            row.resource_id
        );
        entry.push(subresource);
    }

    // Every grade must belong to a sub-resource which was actually declared
    if let Some((resource_id, region_id, subresource_id)) = grades.keys().next() {
        bail!(
            "Grades given for unknown sub-resource {subresource_id} of resource {resource_id} \
             in region {region_id}"
        );
    }

    Ok(map)
}

fn missing_field_msg(field: &str, id: &SubResourceID) -> String {
    format!("Missing {field} for renewable sub-resource {id}")
}

fn read_resources_from_iter<I>(
    iter: I,
    region_ids: &HashSet<RegionID>,
    modeltime: &Modeltime,
    mut subresources: SubResourceMap,
) -> Result<Vec<Resource>>
where
    I: Iterator<Item = ResourceRow>,
{
    let mut seen = HashSet::new();
    let mut resources = Vec::new();
    for row in iter {
        let region_id = region_ids.get_id_by_str(&row.region_id)?;
        ensure!(
            seen.insert((row.id.clone(), region_id.clone())),
            "Duplicate resource {} in region {region_id}",
            row.id
        );

        let market_region_id = row
            .market_region_id
            .as_deref()
            .map(|market_region| region_ids.get_id_by_str(market_region))
            .transpose()?;
        let subresources = subresources
            .remove(&(row.id.clone(), region_id.clone()))
            .with_context(|| {
                format!(
                    "No sub-resources given for resource {} in region {region_id}",
                    row.id
                )
            })?;

        let config = ResourceConfig {
            id: row.id,
            region_id,
            market_region_id,
            description: row.description,
        };
        resources.push(Resource::new(config, modeltime, subresources)?);
    }

    if let Some((resource_id, region_id)) = subresources.keys().next() {
        bail!("Sub-resources given for unknown resource {resource_id} in region {region_id}");
    }

    Ok(resources)
}
