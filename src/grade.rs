//! Grades are the steps of a depletable resource's cost curve.
use crate::units::{MoneyPerQuantity, Quantity};

/// One step of a depletable supply curve.
///
/// The whole of the grade's quantity becomes available once the market price reaches its cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    /// The extraction cost at which this grade becomes available
    pub cost: MoneyPerQuantity,
    /// The physical quantity available from this grade
    pub available: Quantity,
}
