//! Uniform scaling about the origin, and its combination with rigid body motion

use crate::algebra::*;
use crate::algebraic_ops::*;
use crate::error::{Error, Result};
use crate::ops::Norm;
use crate::scalar::*;

impl<T: Real> Dilator<T> {
    /// Scaling by `e^σ`, `cosh(σ/2) + sinh(σ/2) e0i`
    pub fn exp(log_scale: T) -> Dilator<T> {
        let a = (log_scale * T::one_half()).exp();
        let a_inv = a.recip();
        Dilator {
            scalar: (a + a_inv) * T::one_half(),
            e0i: (a - a_inv) * T::one_half(),
        }
    }

    /// Scaling distances from the origin by `scale`
    pub fn new(scale: T) -> Dilator<T> {
        Dilator::exp(scale.ln())
    }

    /// The log-scale σ
    pub fn log(self) -> T {
        ((self.scalar + self.e0i) / (self.scalar - self.e0i)).ln()
    }

    pub fn scale(self) -> T {
        (self.scalar + self.e0i) / (self.scalar - self.e0i)
    }

    pub fn apply<X>(self, x: X) -> X
    where
        Self: Transform<X>,
    {
        self.transform(x)
    }
}

impl<T: Ring> SimilarityGenerator<T> {
    pub fn new(motion: MotorGenerator<T>, log_scale: T) -> SimilarityGenerator<T> {
        SimilarityGenerator {
            e23: motion.e23,
            e13: motion.e13,
            e12: motion.e12,
            e1i: motion.e1i,
            e2i: motion.e2i,
            e3i: motion.e3i,
            e0i: log_scale,
        }
    }

    /// The rigid body part of the generator
    pub fn motion(self) -> MotorGenerator<T> {
        self.project()
    }

    pub fn log_scale(self) -> T {
        self.e0i
    }
}

impl<T: Ring> SimilarityTransformation<T> {
    /// `m * d`: scale first, then move
    pub fn from_motor_dilator(m: Motor<T>, d: Dilator<T>) -> SimilarityTransformation<T> {
        m * d
    }

    pub fn apply<X>(self, x: X) -> X
    where
        Self: Transform<X>,
    {
        self.transform(x)
    }
}

impl<T: Real> SimilarityTransformation<T> {
    pub fn exp(generator: SimilarityGenerator<T>) -> SimilarityTransformation<T> {
        Motor::exp(generator.motion()) * Dilator::exp(generator.log_scale())
    }

    /// The scale factor λ, from `S ei S̃ = λ ei`
    pub fn scale(self) -> T {
        self.transform(Point::infinity()).ei
    }

    /// Split into the rigid body part and the dilator, `S = M D`
    pub fn factor(self) -> Result<(Motor<T>, Dilator<T>)> {
        let s = self.normalized()?;
        let scale = s.scale();
        if scale <= T::epsilon() {
            return Err(Error::ZeroNorm);
        }
        let d = Dilator::exp(scale.ln());
        let m: Motor<T> = (s * d.reverse()).project();
        Ok((m, d))
    }

    pub fn log(self) -> Result<SimilarityGenerator<T>> {
        let (m, d) = self.factor()?;
        Ok(SimilarityGenerator::new(m.log()?, d.log()))
    }
}
