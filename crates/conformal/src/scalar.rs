//! Traits that govern the scalar data type used by conformal
//!
//! Because geometric operations are generally done through various sums and products,
//! the scalar datatype needs only be a [Ring] for the generated algebra to work.
//! The Lie-group maps and the robotics layer need the full [Real] umbrella.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// A scalar datatype whose absolute value can be taken.
pub trait Abs {
    type Output;

    /// Computes the absolute value of a scalar.
    fn abs(self) -> Self::Output;
}

/// A scalar datatype which is closed under addition and multiplication.
///
/// see <https://en.wikipedia.org/wiki/Ring_(mathematics)>
///
/// `Ring` requires that its datatype is `Copy` to avoid the need to clone or borrow when writing
/// mathematical expressions.
/// The conformal metric has off-diagonal entries (e0 · ei = -1),
/// so generated expressions use [from_integer](Ring::from_integer) for small integer weights.
pub trait Ring:
    Clone
    + Copy
    + Neg<Output = Self>
    + Abs<Output = Self>
    + Add<Self, Output = Self>
    + Mul<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Default
{
    /// The additive identity
    fn zero() -> Self {
        Self::default()
    }

    /// The multiplicative identity
    fn one() -> Self {
        Self::from_integer(1)
    }

    /// Construct an integer scalar
    fn from_integer(i: isize) -> Self;
}

/// A scalar datatype which can represent fractional values such as ½.
///
/// Versors act on geometry through a sandwich product,
/// so the generator of a motion by θ carries θ/2.
pub trait Rational: Ring {
    /// Construct a rational scalar
    /// from an integer numerator and integer denominator
    fn from_fraction(numerator: isize, denominator: isize) -> Self;

    /// A scalar value that when multiplied by 2 equals [one](Ring::one)
    fn one_half() -> Self {
        Self::from_fraction(1, 2)
    }
}

/// A scalar datatype which is closed under the square root function.
///
/// ## `sqrt()` of negative numbers
///
/// When given a negative value,
/// this function must either return a valid scalar datatype (e.g. `f64::NaN`)
/// or panic.
/// Norms in this library take the square root of `|squared_norm|`,
/// which is never negative.
pub trait Sqrt: Ring {
    // The scalar datatype for the square root
    type Output;

    // This scalar's positive square root
    fn sqrt(self) -> <Self as Sqrt>::Output;
}

/// A scalar datatype which implements trigonometric functions.
///
/// `Trig` comes implemented for `f32` → `f32` and `f64` → `f64`.
pub trait Trig {
    // The scalar datatype for linear quantities
    // (output of `sin()` and `cos()`)
    type Output: Ring;

    // The cosine of a scalar (in radians)
    fn cos(self) -> Self::Output;

    // The sine of a scalar (in radians)
    fn sin(self) -> Self::Output;

    // Computes sin(x) / x
    // (including at `0`, where the result should be `1`)
    fn sinc(self) -> Self::Output;
}

/// A scalar datatype whose reciprocal can be taken.
///
/// ## `recip()` of `0`
///
/// When given an input of zero,
/// this function must return a valid scalar datatype (e.g. `f64::INFINITY`) or panic.
/// Library code checks norms against [Real::epsilon] before dividing
/// and reports [ZeroNorm](crate::Error::ZeroNorm) instead.
pub trait Recip {
    type Output;
    fn recip(self) -> Self::Output;
}

/// The natural exponential and logarithm.
///
/// Needed by [dilators](crate::Dilator), whose generator is a log-scale.
pub trait Exp {
    fn exp(self) -> Self;
    fn ln(self) -> Self;
}

/// The two-argument arctangent, used when taking logarithms of versors.
pub trait Atan2 {
    fn atan2(self, x: Self) -> Self;
}

/// Real numbers, as needed by the Lie-group maps, kinematics and dynamics.
///
/// This is implemented for `f32`, `f64`,
/// and [DualNumber](crate::DualNumber) over any `Real`
/// (which is how the exponential and logarithm Jacobians are computed.)
pub trait Real:
    Rational
    + Sqrt<Output = Self>
    + Trig<Output = Self>
    + Recip<Output = Self>
    + Exp
    + Atan2
    + Div<Self, Output = Self>
    + PartialOrd
    + Debug
    + 'static
{
    fn from_f64(value: f64) -> Self;

    /// The value part, dropping any derivative information
    fn to_f64(self) -> f64;

    /// Threshold below which a norm or angle is treated as zero
    fn epsilon() -> Self;

    fn pi() -> Self {
        Self::from_f64(core::f64::consts::PI)
    }

    fn max(self, other: Self) -> Self {
        if self < other {
            other
        } else {
            self
        }
    }
}

macro_rules! impl_for_float {
    ($type:ident, $epsilon:expr) => {
        impl Abs for $type {
            type Output = $type;
            fn abs(self) -> $type {
                self.abs()
            }
        }

        impl Ring for $type {
            fn from_integer(i: isize) -> $type {
                i as $type
            }
        }

        impl Rational for $type {
            fn from_fraction(numerator: isize, denominator: isize) -> $type {
                numerator as $type / denominator as $type
            }
        }

        impl Sqrt for $type {
            type Output = $type;
            fn sqrt(self) -> $type {
                self.sqrt()
            }
        }

        impl Trig for $type {
            type Output = $type;

            fn cos(self) -> $type {
                self.cos()
            }
            fn sin(self) -> $type {
                self.sin()
            }
            fn sinc(self) -> $type {
                let self_adj = self.abs() + $type::EPSILON;
                self_adj.sin() / self_adj
            }
        }

        impl Recip for $type {
            type Output = $type;

            fn recip(self) -> $type {
                self.recip()
            }
        }

        impl Exp for $type {
            fn exp(self) -> $type {
                self.exp()
            }
            fn ln(self) -> $type {
                self.ln()
            }
        }

        impl Atan2 for $type {
            fn atan2(self, x: $type) -> $type {
                self.atan2(x)
            }
        }

        impl Real for $type {
            fn from_f64(value: f64) -> $type {
                value as $type
            }
            fn to_f64(self) -> f64 {
                self as f64
            }
            fn epsilon() -> $type {
                $epsilon
            }
        }
    };
}

impl_for_float!(f32, 1e-6);
impl_for_float!(f64, 1e-12);
