//! Land allocations record the area available to agricultural sectors in each region.
use crate::region::RegionID;
use crate::units::Quantity;
use std::collections::HashMap;

/// The land area allocated to agriculture in each region
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandAllocator(HashMap<RegionID, Quantity>);

impl LandAllocator {
    /// Create an allocator from per-region areas
    pub fn new(areas: HashMap<RegionID, Quantity>) -> Self {
        Self(areas)
    }

    /// The area allocated in the given region, if any
    pub fn area(&self, region_id: &RegionID) -> Option<Quantity> {
        self.0.get(region_id).copied()
    }
}
