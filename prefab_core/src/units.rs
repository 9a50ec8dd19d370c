//! # Unit Types
//!
//! Type-safe wrappers for the metric quantities used by the estimator. They
//! are plain f64 newtypes with `#[serde(transparent)]`, so JSON stays clean
//! (just numbers).
//!
//! ## Metric Units
//!
//! Prefab catalogs are priced per square meter, per liter, or per piece:
//! - Length: meters (m)
//! - Area: square meters (m²)
//! - Angle: degrees, converted to radians only for trigonometry
//!
//! ## Example
//!
//! ```rust
//! use prefab_core::units::{Meters, SquareMeters, Degrees};
//!
//! let floor: SquareMeters = Meters(4.0) * Meters(3.0);
//! assert_eq!(floor.0, 12.0);
//!
//! let pitch = Degrees(60.0);
//! assert!((pitch.cos() - 0.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length and Area
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

impl Mul<Meters> for Meters {
    type Output = SquareMeters;
    fn mul(self, rhs: Meters) -> SquareMeters {
        SquareMeters(self.0 * rhs.0)
    }
}

impl SquareMeters {
    pub const ZERO: SquareMeters = SquareMeters(0.0);

    /// Clamp negative areas (over-deducted openings) to zero
    pub fn clamp_non_negative(self) -> Self {
        if self.0 < 0.0 {
            SquareMeters::ZERO
        } else {
            self
        }
    }
}

impl Sum for SquareMeters {
    fn sum<I: Iterator<Item = SquareMeters>>(iter: I) -> Self {
        iter.fold(SquareMeters::ZERO, |acc, a| acc + a)
    }
}

// ============================================================================
// Angle
// ============================================================================

/// Angle in degrees (roof pitch)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    pub fn cos(self) -> f64 {
        self.0.to_radians().cos()
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(SquareMeters);
