//! Forward-mode automatic differentiation
//!
//! `DualNumber<T>` represents `a + bε` where ε² = 0.
//! Running a generic computation over `DualNumber<T>` with one input seeded
//! as a [variable](DualNumber::variable) yields the derivative of every output
//! with respect to that input. This is how the exponential and logarithm
//! Jacobians of [Motor](crate::Motor) are computed.

use crate::scalar::*;
use core::cmp::Ordering;
use core::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DualNumber<T> {
    pub real: T,
    pub dual: T,
}

impl<T: Real> DualNumber<T> {
    pub fn new(real: T, dual: T) -> Self {
        DualNumber { real, dual }
    }

    /// Constant (derivative = 0)
    pub fn constant(real: T) -> Self {
        DualNumber {
            real,
            dual: T::zero(),
        }
    }

    /// Variable (derivative = 1)
    pub fn variable(real: T) -> Self {
        DualNumber {
            real,
            dual: T::one(),
        }
    }
}

// Comparisons only look at the value so that branches in generic code
// follow the same path as the plain scalar computation
impl<T: Real> PartialEq for DualNumber<T> {
    fn eq(&self, other: &Self) -> bool {
        self.real == other.real
    }
}

impl<T: Real> PartialOrd for DualNumber<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.real.partial_cmp(&other.real)
    }
}

impl<T: Real> Add for DualNumber<T> {
    type Output = Self;
    fn add(self, r: Self) -> Self {
        DualNumber {
            real: self.real + r.real,
            dual: self.dual + r.dual,
        }
    }
}

impl<T: Real> Sub for DualNumber<T> {
    type Output = Self;
    fn sub(self, r: Self) -> Self {
        DualNumber {
            real: self.real - r.real,
            dual: self.dual - r.dual,
        }
    }
}

impl<T: Real> Mul for DualNumber<T> {
    type Output = Self;
    fn mul(self, r: Self) -> Self {
        DualNumber {
            real: self.real * r.real,
            dual: self.real * r.dual + self.dual * r.real,
        }
    }
}

impl<T: Real> Div for DualNumber<T> {
    type Output = Self;
    fn div(self, r: Self) -> Self {
        let inv = r.real.recip();
        DualNumber {
            real: self.real * inv,
            dual: (self.dual * r.real - self.real * r.dual) * inv * inv,
        }
    }
}

impl<T: Real> Neg for DualNumber<T> {
    type Output = Self;
    fn neg(self) -> Self {
        DualNumber {
            real: -self.real,
            dual: -self.dual,
        }
    }
}

impl<T: Real> Abs for DualNumber<T> {
    type Output = Self;
    fn abs(self) -> Self {
        if self.real < T::zero() {
            -self
        } else {
            self
        }
    }
}

impl<T: Real> Ring for DualNumber<T> {
    fn from_integer(i: isize) -> Self {
        DualNumber::constant(T::from_integer(i))
    }
}

impl<T: Real> Rational for DualNumber<T> {
    fn from_fraction(numerator: isize, denominator: isize) -> Self {
        DualNumber::constant(T::from_fraction(numerator, denominator))
    }
}

impl<T: Real> Sqrt for DualNumber<T> {
    type Output = Self;
    fn sqrt(self) -> Self {
        let s = self.real.sqrt();
        DualNumber {
            real: s,
            dual: self.dual * (s + s).recip(),
        }
    }
}

impl<T: Real> Trig for DualNumber<T> {
    type Output = Self;

    fn cos(self) -> Self {
        DualNumber {
            real: self.real.cos(),
            dual: -self.real.sin() * self.dual,
        }
    }

    fn sin(self) -> Self {
        DualNumber {
            real: self.real.sin(),
            dual: self.real.cos() * self.dual,
        }
    }

    fn sinc(self) -> Self {
        let a = self.real;
        let value = a.sinc();
        // d/dx sin(x)/x = (cos x - sinc x) / x, which tends to -x/3
        let slope = if a.abs() > T::from_f64(1e-4) {
            (a.cos() - value) / a
        } else {
            -a * T::from_fraction(1, 3)
        };
        DualNumber {
            real: value,
            dual: slope * self.dual,
        }
    }
}

impl<T: Real> Recip for DualNumber<T> {
    type Output = Self;
    fn recip(self) -> Self {
        let inv = self.real.recip();
        DualNumber {
            real: inv,
            dual: -self.dual * inv * inv,
        }
    }
}

impl<T: Real> Exp for DualNumber<T> {
    fn exp(self) -> Self {
        let e = self.real.exp();
        DualNumber {
            real: e,
            dual: e * self.dual,
        }
    }

    fn ln(self) -> Self {
        DualNumber {
            real: self.real.ln(),
            dual: self.dual / self.real,
        }
    }
}

impl<T: Real> Atan2 for DualNumber<T> {
    fn atan2(self, x: Self) -> Self {
        let denominator = x.real * x.real + self.real * self.real;
        DualNumber {
            real: self.real.atan2(x.real),
            dual: (x.real * self.dual - self.real * x.dual) / denominator,
        }
    }
}

impl<T: Real> Real for DualNumber<T> {
    fn from_f64(value: f64) -> Self {
        DualNumber::constant(T::from_f64(value))
    }

    fn to_f64(self) -> f64 {
        self.real.to_f64()
    }

    fn epsilon() -> Self {
        DualNumber::constant(T::epsilon())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_rule() {
        // f(x) = x² at x = 3
        let x = DualNumber::variable(3.0_f64);
        let y = x * x;
        assert_eq!(y.real, 9.);
        assert_eq!(y.dual, 6.);
    }

    #[test]
    fn test_sinc_slope() {
        let h = 1e-6;
        for a in [0.0_f64, 1e-5, 0.3, 1.7] {
            let d = DualNumber::variable(a).sinc().dual;
            let fd = ((a + h).sinc() - (a - h).sinc()) / (2. * h);
            assert!((d - fd).abs() < 1e-5, "{} {} {}", a, d, fd);
        }
    }

    #[test]
    fn test_atan2_slope() {
        // d/dy atan2(y, 1) at y = 1 is 1/2
        let y = DualNumber::variable(1.0_f64);
        let x = DualNumber::constant(1.0_f64);
        let r = y.atan2(x);
        assert!((r.real - core::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert!((r.dual - 0.5).abs() < 1e-12);
    }
}
