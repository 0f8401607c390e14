//! Geographical areas of the model. Markets, resources and sectors all attach to regions.
use crate::id::{define_id_getter, define_id_type};
use indexmap::IndexMap;
use serde::Deserialize;

define_id_type! {RegionID}

/// A single region read from the regions input file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct Region {
    /// A unique identifier for the region (e.g. "NA")
    pub id: RegionID,
    /// A text description of the region (e.g. "North America")
    pub description: String,
}
define_id_getter! {Region, RegionID}

/// A map of [`Region`]s, keyed by region ID and kept in file order
pub type RegionMap = IndexMap<RegionID, Region>;
