//! Rigid body motions and their generators
//!
//! A motor generator `(b; t)` holds a rotation plane scaled by the angle
//! on e23, e13, e12 and a translation direction on e1i, e2i, e3i.
//! Its exponential is the screw motion `T(d) R(b)`, where `d` is `t`
//! bent along the rotation.

use crate::algebra::*;
use crate::algebraic_ops::*;
use crate::dual_number::DualNumber;
use crate::error::{Error, Result};
use crate::ops::Norm;
use crate::rotor::small_angle_squared;
use crate::scalar::*;
use nalgebra::SMatrix;
use rand::Rng;

impl<T: Ring> MotorGenerator<T> {
    pub fn new(rotational: RotorGenerator<T>, translational: DirectionVector<T>) -> MotorGenerator<T> {
        MotorGenerator {
            e23: rotational.e23,
            e13: rotational.e13,
            e12: rotational.e12,
            e1i: translational.e1i,
            e2i: translational.e2i,
            e3i: translational.e3i,
        }
    }

    pub fn rotational(self) -> RotorGenerator<T> {
        RotorGenerator::new(self.e23, self.e13, self.e12)
    }

    pub fn translational(self) -> DirectionVector<T> {
        DirectionVector::new(self.e1i, self.e2i, self.e3i)
    }
}

impl<T: Ring + Rational> Motor<T> {
    pub fn identity() -> Motor<T> {
        Motor::from(T::one())
    }

    /// `r * t`: translate first, then rotate
    pub fn from_rotor_translator(r: Rotor<T>, t: Translator<T>) -> Motor<T> {
        r * t
    }

    /// `t * r`: rotate first, then translate
    pub fn from_translator_rotor(t: Translator<T>, r: Rotor<T>) -> Motor<T> {
        t * r
    }

    /// Apply the motor to a geometric object, `M X M̃`
    pub fn apply<X>(self, x: X) -> X
    where
        Self: Transform<X>,
    {
        self.transform(x)
    }

    /// Apply the inverse motion, `M̃ X M`
    pub fn reverse_apply<X>(self, x: X) -> X
    where
        Self: Transform<X>,
    {
        self.reverse().transform(x)
    }
}

impl<T: Real> Motor<T> {
    /// The screw motion generated by `(b; t)`
    ///
    /// With θ = |b| and w the rotation axis,
    /// the translation is `d = sinc(θ) t + f3 (w·t) w + f2 (w × t)`
    /// where `f2 = (1 - cos θ) / θ²` and `f3 = (θ - sin θ) / θ³`.
    pub fn exp(generator: MotorGenerator<T>) -> Motor<T> {
        let b = generator.rotational();
        let w = b.axis();
        let t = generator.translational();
        let t = Vector::new(t.e1i, t.e2i, t.e3i);

        let theta_squared = b.norm_squared();
        let (f1, f2, f3) = if theta_squared < small_angle_squared() {
            (
                T::one() - theta_squared * T::from_fraction(1, 6),
                T::one_half() - theta_squared * T::from_fraction(1, 24),
                T::from_fraction(1, 6) - theta_squared * T::from_fraction(1, 120),
            )
        } else {
            let theta = theta_squared.sqrt();
            let half_sinc = (theta * T::one_half()).sinc();
            (
                theta.sinc(),
                half_sinc * half_sinc * T::one_half(),
                (T::one() - theta.sinc()) / theta_squared,
            )
        };

        let d = t * f1 + w * (f3 * w.dot(t)) + w.cross(t) * f2;
        Translator::exp(DirectionVector::from_vector3(d)) * Rotor::exp(b)
    }

    /// The generator of this motor
    ///
    /// The rotational part follows [Rotor::log]:
    /// angle in [0, π], zero at the identity, canonical axis at π.
    pub fn log(self) -> Result<MotorGenerator<T>> {
        let r: Rotor<T> = self.project();
        let norm = r.norm();
        if norm <= T::epsilon() {
            return Err(Error::ZeroNorm);
        }
        let m = self * norm.recip();
        let m = if m.scalar < T::zero() { -m } else { m };

        let b = m.rotor().log()?;
        let d = m.translator().translation();

        let w = b.axis();
        let theta_squared = b.norm_squared();
        // (1 - (θ/2) cot(θ/2)) / θ²
        let g = if theta_squared < small_angle_squared() {
            T::from_fraction(1, 12) + theta_squared * T::from_fraction(1, 720)
        } else {
            let half_theta = theta_squared.sqrt() * T::one_half();
            (T::one() - half_theta.cos() / half_theta.sinc()) / theta_squared
        };

        let w_cross_d = w.cross(d);
        let t = d - w_cross_d * T::one_half() + w.cross(w_cross_d) * g;
        Ok(MotorGenerator::new(b, DirectionVector::from_vector3(t)))
    }

    /// The rotational part
    pub fn rotor(self) -> Rotor<T> {
        self.project()
    }

    /// The translational part, `M R̃`
    pub fn translator(self) -> Translator<T> {
        (self * self.rotor().reverse()).project()
    }

    /// Derivative of [exp](Motor::exp) with respect to the generator coefficients
    ///
    /// Row i is the motor coefficient in field order
    /// (scalar, e23, e13, e12, e1i, e2i, e3i, e123i);
    /// column j is the generator coefficient (e23, e13, e12, e1i, e2i, e3i).
    pub fn exp_jacobian(generator: MotorGenerator<T>) -> SMatrix<T, 8, 6> {
        let values = generator.vector();
        let columns: [[T; 8]; 6] = core::array::from_fn(|j| {
            let seeded = MotorGenerator::from_vector(seed(values, j));
            Motor::exp(seeded).vector().map(|c| c.dual)
        });
        SMatrix::from_fn(|i, j| columns[j][i])
    }

    /// Derivative of [log](Motor::log) with respect to the motor coefficients
    pub fn log_jacobian(self) -> Result<SMatrix<T, 6, 8>> {
        let values = self.vector();
        let mut columns = [[T::zero(); 6]; 8];
        for (j, column) in columns.iter_mut().enumerate() {
            let seeded = Motor::from_vector(seed(values, j));
            *column = seeded.log()?.vector().map(|c| c.dual);
        }
        Ok(SMatrix::from_fn(|i, j| columns[j][i]))
    }

    /// A random motion: rotation by up to π about a random axis,
    /// and a translation with each coordinate in [-1, 1]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Motor<T> {
        let axis = loop {
            let candidate = Vector::new(
                T::from_f64(rng.gen_range(-1.0..=1.0)),
                T::from_f64(rng.gen_range(-1.0..=1.0)),
                T::from_f64(rng.gen_range(-1.0..=1.0)),
            );
            if let Ok(unit) = candidate.normalized() {
                break unit;
            }
        };
        let angle = T::from_f64(rng.gen_range(0.0..core::f64::consts::PI));
        let rotor = Rotor::new(RotorGenerator::from_axis(axis), angle);
        let translator = Translator::new(
            T::from_f64(rng.gen_range(-1.0..=1.0)),
            T::from_f64(rng.gen_range(-1.0..=1.0)),
            T::from_f64(rng.gen_range(-1.0..=1.0)),
        );
        translator * rotor
    }
}

// Lift values to dual numbers, differentiating with respect to entry `j`
fn seed<T: Real, const N: usize>(values: [T; N], j: usize) -> [DualNumber<T>; N] {
    core::array::from_fn(|i| {
        if i == j {
            DualNumber::variable(values[i])
        } else {
            DualNumber::constant(values[i])
        }
    })
}
