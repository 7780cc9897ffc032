//! Rotations about axes through the origin
//!
//! A rotor by angle θ about the unit generator b̂ is `cos(θ/2) - sin(θ/2) b̂`.
//! The generator blades (e23, e13, e12) correspond to the rotation axis (x, -y, z).

use crate::algebra::*;
use crate::algebraic_ops::*;
use crate::error::{Error, Result};
use crate::scalar::*;
use nalgebra::{Matrix3, Quaternion, Vector4};

impl<T: Ring> RotorGenerator<T> {
    pub fn new(e23: T, e13: T, e12: T) -> RotorGenerator<T> {
        RotorGenerator { e23, e13, e12 }
    }

    /// The generator of a rotation about the given Euclidean axis
    pub fn from_axis(axis: Vector<T>) -> RotorGenerator<T> {
        RotorGenerator {
            e23: axis.e1,
            e13: -axis.e2,
            e12: axis.e3,
        }
    }

    /// The Euclidean rotation axis, scaled by the angle
    pub fn axis(self) -> Vector<T> {
        Vector::new(self.e23, -self.e13, self.e12)
    }

    pub(crate) fn norm_squared(self) -> T {
        self.e23 * self.e23 + self.e13 * self.e13 + self.e12 * self.e12
    }
}

// Squared angle below which the exp/log maps switch to their series expansions
pub(crate) fn small_angle_squared<T: Real>() -> T {
    T::from_f64(1e-6)
}

impl<T: Real> Rotor<T> {
    pub fn identity() -> Rotor<T> {
        Rotor::from(T::one())
    }

    /// The rotor for rotation by `|b|` in the plane of `b`
    pub fn exp(b: RotorGenerator<T>) -> Rotor<T> {
        let theta_squared = b.norm_squared();
        // cos(θ/2) and sin(θ/2)/θ
        let (c, k) = if theta_squared < small_angle_squared() {
            (
                T::one() - theta_squared * T::from_fraction(1, 8),
                T::one_half() - theta_squared * T::from_fraction(1, 48),
            )
        } else {
            let half_theta = theta_squared.sqrt() * T::one_half();
            (half_theta.cos(), half_theta.sinc() * T::one_half())
        };
        Rotor {
            scalar: c,
            e23: -k * b.e23,
            e13: -k * b.e13,
            e12: -k * b.e12,
        }
    }

    /// Rotation by `angle` about a unit generator
    pub fn new(direction: RotorGenerator<T>, angle: T) -> Rotor<T> {
        Rotor::exp(direction * angle)
    }

    /// The generator of this rotor, with angle in [0, π]
    ///
    /// The identity maps to the zero generator.
    /// At exactly π the axis is ambiguous up to sign;
    /// it is chosen so that its first non-negligible component is positive.
    pub fn log(self) -> Result<RotorGenerator<T>> {
        let norm = (self.scalar * self.scalar + self.e23 * self.e23 + self.e13 * self.e13 + self.e12 * self.e12).sqrt();
        if norm <= T::epsilon() {
            return Err(Error::ZeroNorm);
        }
        let r = self * norm.recip();

        // R and -R are the same rotation
        let r = if r.scalar < T::zero() { -r } else { r };

        let b = RotorGenerator::new(r.e23, r.e13, r.e12);
        let b_squared = b.norm_squared();

        // θ / |b|, with θ = 2 atan2(|b|, s)
        let k = if b_squared < small_angle_squared() {
            let s = r.scalar;
            T::from_integer(2) * s.recip() * (T::one() - b_squared * (T::from_integer(3) * s * s).recip())
        } else {
            let b_norm = b_squared.sqrt();
            T::from_integer(2) * b_norm.atan2(r.scalar) / b_norm
        };
        let generator = b * -k;

        if r.scalar.abs() <= T::epsilon() {
            Ok(canonical_half_turn(generator))
        } else {
            Ok(generator)
        }
    }

    /// The rotation angle in [0, π]
    pub fn angle(self) -> Result<T> {
        Ok(self.log()?.norm_squared().sqrt())
    }

    /// The unit Euclidean rotation axis
    pub fn axis(self) -> Result<Vector<T>> {
        let generator = self.log()?;
        let theta = generator.norm_squared().sqrt();
        if theta <= T::epsilon() {
            return Err(Error::ZeroNorm);
        }
        Ok(generator.axis() * theta.recip())
    }

    pub fn apply<X>(self, x: X) -> X
    where
        Self: Transform<X>,
    {
        self.transform(x)
    }

    /// `(w, x, y, z) = (scalar, -e23, e13, -e12)`
    pub fn to_quaternion(self) -> Quaternion<T> {
        Quaternion {
            coords: Vector4::new(-self.e23, self.e13, -self.e12, self.scalar),
        }
    }

    pub fn from_quaternion(q: Quaternion<T>) -> Rotor<T> {
        let (x, y, z, w) = (q.coords[0], q.coords[1], q.coords[2], q.coords[3]);
        Rotor {
            scalar: w,
            e23: -x,
            e13: y,
            e12: -z,
        }
    }

    pub fn to_rotation_matrix(self) -> Matrix3<T> {
        let (w, x, y, z) = (self.scalar, -self.e23, self.e13, -self.e12);
        let one = T::one();
        let two = T::from_integer(2);
        Matrix3::new(
            one - two * (y * y + z * z),
            two * (x * y - z * w),
            two * (x * z + y * w),
            two * (x * y + z * w),
            one - two * (x * x + z * z),
            two * (y * z - x * w),
            two * (x * z - y * w),
            two * (y * z + x * w),
            one - two * (x * x + y * y),
        )
    }

    /// The unit rotor of a rotation matrix
    pub fn from_rotation_matrix(m: Matrix3<T>) -> Rotor<T> {
        let one = T::one();
        let quarter = T::from_fraction(1, 4);
        let trace = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];

        // Pick the largest diagonal term to divide by
        let (w, x, y, z) = if trace > T::zero() {
            let s = (trace + one).sqrt() * T::from_integer(2);
            (
                quarter * s,
                (m[(2, 1)] - m[(1, 2)]) / s,
                (m[(0, 2)] - m[(2, 0)]) / s,
                (m[(1, 0)] - m[(0, 1)]) / s,
            )
        } else if m[(0, 0)] > m[(1, 1)] && m[(0, 0)] > m[(2, 2)] {
            let s = (one + m[(0, 0)] - m[(1, 1)] - m[(2, 2)]).sqrt() * T::from_integer(2);
            (
                (m[(2, 1)] - m[(1, 2)]) / s,
                quarter * s,
                (m[(0, 1)] + m[(1, 0)]) / s,
                (m[(0, 2)] + m[(2, 0)]) / s,
            )
        } else if m[(1, 1)] > m[(2, 2)] {
            let s = (one + m[(1, 1)] - m[(0, 0)] - m[(2, 2)]).sqrt() * T::from_integer(2);
            (
                (m[(0, 2)] - m[(2, 0)]) / s,
                (m[(0, 1)] + m[(1, 0)]) / s,
                quarter * s,
                (m[(1, 2)] + m[(2, 1)]) / s,
            )
        } else {
            let s = (one + m[(2, 2)] - m[(0, 0)] - m[(1, 1)]).sqrt() * T::from_integer(2);
            (
                (m[(1, 0)] - m[(0, 1)]) / s,
                (m[(0, 2)] + m[(2, 0)]) / s,
                (m[(1, 2)] + m[(2, 1)]) / s,
                quarter * s,
            )
        };
        let r = Rotor {
            scalar: w,
            e23: -x,
            e13: y,
            e12: -z,
        };
        if w < T::zero() {
            -r
        } else {
            r
        }
    }
}

fn canonical_half_turn<T: Real>(generator: RotorGenerator<T>) -> RotorGenerator<T> {
    let axis = generator.axis();
    let tolerance = T::from_f64(1e-9);
    let first = [axis.e1, axis.e2, axis.e3]
        .into_iter()
        .find(|c| c.abs() > tolerance)
        .unwrap_or(T::zero());
    if first < T::zero() {
        -generator
    } else {
        generator
    }
}
