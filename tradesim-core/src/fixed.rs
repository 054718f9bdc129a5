//! Fixed-point arithmetic for deterministic simulation.
//!
//! Every trade value, power figure, share percentage and resource reserve is a
//! [`Fixed`]. Floats only appear at the boundary: scenario files are parsed as
//! decimals and converted once, and display code converts back with
//! [`Fixed::to_f64`]. Inside the simulation all arithmetic is integer, so two
//! runs over the same inputs produce bit-identical reports.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Fixed-point value with scale 10000.
///
/// Represents decimal values as integers: 0.25 → 2500, 1.0 → 10000.
/// All arithmetic saturates at the i64 range, so a turn never panics on
/// extreme scenario values.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(pub i64);

impl Fixed {
    /// Scale factor: 10000 = 1.0
    pub const SCALE: i64 = 10000;

    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(10000);
    pub const HALF: Fixed = Fixed(5000);
    pub const HUNDRED: Fixed = Fixed(100 * 10000);

    /// Create from raw scaled value
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Fixed(raw)
    }

    /// Create from integer (e.g., 5 → 50_000)
    #[inline]
    pub const fn from_int(v: i64) -> Self {
        Fixed(v.saturating_mul(Self::SCALE))
    }

    /// Convert from f64 (parse layer only, not in sim logic).
    ///
    /// Rounds to the nearest raw unit. NaN and infinities map to zero, values
    /// outside the representable range saturate.
    pub fn from_f64(v: f64) -> Self {
        if !v.is_finite() {
            return Fixed::ZERO;
        }

        let scaled = (v * Self::SCALE as f64).round();
        if scaled >= i64::MAX as f64 {
            return Fixed(i64::MAX);
        }
        if scaled <= i64::MIN as f64 {
            return Fixed(i64::MIN);
        }

        Fixed(scaled as i64)
    }

    /// Convert from f32 (test fixtures and config literals).
    #[inline]
    pub fn from_f32(v: f32) -> Self {
        // Go through the decimal representation so 1.1f32 becomes exactly 1.1
        match format!("{v}").parse::<f64>() {
            Ok(parsed) => Self::from_f64(parsed),
            Err(_) => Fixed::ZERO,
        }
    }

    /// Convert to f64 (display only)
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Raw integer value
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn min(self, other: Fixed) -> Fixed {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    #[inline]
    pub fn max(self, other: Fixed) -> Fixed {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    #[inline]
    pub fn abs(self) -> Fixed {
        Fixed(self.0.saturating_abs())
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Clamp negatives to zero. Reserves and flows are never below zero.
    #[inline]
    pub fn non_negative(self) -> Fixed {
        self.max(Fixed::ZERO)
    }

    /// Saturating add (clamps at i64::MAX/MIN)
    #[inline]
    pub fn saturating_add(self, other: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(other.0))
    }

    /// `self` as a percentage of `whole`, truncated. Zero when `whole` is zero.
    pub fn percent_of(self, whole: Fixed) -> Fixed {
        self.percent_of_raw(i128::from(whole.0))
    }

    /// Like [`Fixed::percent_of`] against a raw total that may exceed i64,
    /// such as the sum of many saturated powers.
    pub fn percent_of_raw(self, whole: i128) -> Fixed {
        if whole == 0 {
            return Fixed::ZERO;
        }
        clamp_raw(i128::from(self.0) * i128::from(Fixed::HUNDRED.0) / whole)
    }

    /// `percent`% of `self`: `self × percent / 100`, truncated once.
    pub fn apply_percent(self, percent: Fixed) -> Fixed {
        clamp_raw(i128::from(self.0) * i128::from(percent.0) / i128::from(Fixed::HUNDRED.0))
    }

    /// Integer ceiling of `self / divisor` for positive operands.
    ///
    /// Computed on raw units so no precision is lost. Returns `None` when
    /// either operand is not positive.
    pub fn ceil_div(self, divisor: Fixed) -> Option<u32> {
        if self.0 <= 0 || divisor.0 <= 0 {
            return None;
        }
        let quotient = self.0 / divisor.0 + i64::from(self.0 % divisor.0 != 0);
        Some(u32::try_from(quotient).unwrap_or(u32::MAX))
    }
}

/// Narrow an i128 intermediate back to i64, saturating.
#[inline]
fn clamp_raw(wide: i128) -> Fixed {
    Fixed(i64::try_from(wide).unwrap_or(if wide < 0 { i64::MIN } else { i64::MAX }))
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, other: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, other: Fixed) {
        *self = *self + other;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, other: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, other: Fixed) {
        *self = *self - other;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.saturating_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, other: Fixed) -> Fixed {
        clamp_raw(i128::from(self.0) * i128::from(other.0) / i128::from(Fixed::SCALE))
    }
}

impl Div for Fixed {
    type Output = Fixed;
    #[inline]
    fn div(self, other: Fixed) -> Fixed {
        if other.0 == 0 {
            return Fixed::ZERO;
        }
        clamp_raw(i128::from(self.0) * i128::from(Fixed::SCALE) / i128::from(other.0))
    }
}

impl std::iter::Sum for Fixed {
    fn sum<I: Iterator<Item = Fixed>>(iter: I) -> Fixed {
        iter.fold(Fixed::ZERO, |acc, v| acc + v)
    }
}

impl<'a> std::iter::Sum<&'a Fixed> for Fixed {
    fn sum<I: Iterator<Item = &'a Fixed>>(iter: I) -> Fixed {
        iter.fold(Fixed::ZERO, |acc, v| acc + *v)
    }
}

impl std::fmt::Debug for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fixed({} = {})", self.0, self.to_f64())
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.to_f64())
    }
}

// Scenario and report files carry plain decimals, not raw scaled integers.
impl Serialize for Fixed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Fixed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Fixed::from_f64)
    }
}
