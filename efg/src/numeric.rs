use approx::AbsDiffEq;
use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Scalar type used for payoffs and probabilities.
///
/// Everything in this crate is generic over `Number`, so the same algorithms
/// run on floating point or on exact types supplied by the caller. Only the
/// arithmetic, the total-order-like comparisons and the `approx` tolerance
/// comparison below are relied upon.
pub trait Number:
    Copy
    + AbsDiffEq<Epsilon = Self>
    + Debug
    + Display
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
{
    fn zero() -> Self;

    fn one() -> Self;

    fn from_usize(n: usize) -> Self;

    /// Magnitude below which iterative numerics (the simplex) treat a value
    /// as zero. Exact types should return zero.
    fn tolerance() -> Self;

    fn abs(self) -> Self {
        if self < Self::zero() {
            -self
        } else {
            self
        }
    }

    fn is_zero(self) -> bool {
        self == Self::zero()
    }

    /// Compares against zero using `tolerance()`.
    fn is_negligible(self) -> bool {
        abs_diff_eq!(self, Self::zero(), epsilon = Self::tolerance())
    }

    fn approx_eq(self, other: Self) -> bool {
        abs_diff_eq!(self, other, epsilon = Self::tolerance())
    }
}

macro_rules! impl_float_number {
    ($t:ty, $tol:expr) => {
        impl Number for $t {
            fn zero() -> Self {
                0.0
            }

            fn one() -> Self {
                1.0
            }

            fn from_usize(n: usize) -> Self {
                n as $t
            }

            fn tolerance() -> Self {
                $tol
            }
        }
    };
}

impl_float_number!(f64, 1e-9);
impl_float_number!(f32, 1e-5);
