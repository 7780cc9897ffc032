//! Norm-based operations shared by every multivector type

use crate::algebraic_ops::*;
use crate::error::{Error, Result};
use crate::scalar::*;
use core::ops::Mul;

/// Norms, normalization and inversion
///
/// Implemented for every type with a [squared norm](SquaredNorm).
///
/// ```
/// use conformal::*;
///
/// let t = Translator::new(1., 2., 3.);
/// let t_inv = t.inverse().unwrap();
/// assert!(((t * t_inv).scalar - 1.).abs() < 1e-12);
/// assert!(Translator::<f64>::zero().inverse().is_err());
/// ```
pub trait Norm<T>: Sized {
    /// `sqrt(|squared_norm|)`
    fn norm(self) -> T;

    /// The norm, carrying the sign of the squared norm
    fn signed_norm(self) -> T;

    /// Divide by the norm, failing with [ZeroNorm](Error::ZeroNorm) at zero
    fn normalized(self) -> Result<Self>;

    /// `reverse / squared_norm`, failing with [ZeroNorm](Error::ZeroNorm) at zero
    fn inverse(self) -> Result<Self>;
}

impl<T, X> Norm<T> for X
where
    T: Real,
    X: Copy + SquaredNorm<T> + Reverse + Mul<T, Output = X>,
{
    fn norm(self) -> T {
        self.squared_norm().abs().sqrt()
    }

    fn signed_norm(self) -> T {
        let squared_norm = self.squared_norm();
        let norm = squared_norm.abs().sqrt();
        if squared_norm < T::zero() {
            -norm
        } else {
            norm
        }
    }

    fn normalized(self) -> Result<X> {
        let norm = self.norm();
        if norm <= T::epsilon() {
            return Err(Error::ZeroNorm);
        }
        Ok(self * norm.recip())
    }

    fn inverse(self) -> Result<X> {
        let squared_norm = self.squared_norm();
        if squared_norm.abs() <= T::epsilon() {
            return Err(Error::ZeroNorm);
        }
        Ok(self.reverse() * squared_norm.recip())
    }
}
