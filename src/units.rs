#![allow(missing_docs)]

//! This module defines various unit types and their conversions.
use serde::{Deserialize, Serialize};

/// Represents a dimensionless quantity.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless::new(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless::new(self.0 / rhs.0)
    }
}

impl Dimensionless {
    /// Creates a new instance from an f64 value.
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the value as an f64.
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns true unless the value is infinite or NaN.
    pub const fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Raises the value to an integer power.
    pub fn powi(self, rhs: i32) -> Self {
        Dimensionless::new(self.0.powi(rhs))
    }

    /// Raises the value to a dimensionless power.
    pub fn powf(self, rhs: Dimensionless) -> Self {
        Dimensionless::new(self.0.powf(rhs.0))
    }
}

impl float_cmp::ApproxEq for Dimensionless {
    type Margin = float_cmp::F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        self.0.approx_eq(other.0, margin.into())
    }
}

macro_rules! unit_struct {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from an f64 value.
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Returns the value of the unit type as an f64.
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Returns true unless the value is infinite or NaN.
            pub const fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Returns the greater of the two values.
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }

        impl std::ops::AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl std::ops::SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|item| item.0).sum())
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name::new(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name::new(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name::new(self.0 / rhs.0)
            }
        }

        impl float_cmp::ApproxEq for $name {
            type Margin = float_cmp::F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                self.0.approx_eq(other.0, margin.into())
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(
    /// An amount of money on the internal currency basis.
    Money
);
unit_struct!(
    /// A physical amount of a traded good.
    Quantity
);

// Derived quantities
unit_struct!(
    /// A price for one unit of a traded good.
    MoneyPerQuantity
);

// Division rules
impl_div!(Money, Money, Dimensionless);
impl_div!(Quantity, Quantity, Dimensionless);

// Multiplication rules
impl_mul!(MoneyPerQuantity, Quantity, Money);

/// Converts prices quoted in the input currency year to the internal currency basis.
pub const CURRENCY_CONVERSION: Dimensionless = Dimensionless(2.212);
