//! Rigid body inertia as a linear map from twists to wrenches

use crate::algebra::*;
use crate::algebraic_ops::*;
use crate::scalar::*;
use core::ops::Add;
use nalgebra::Matrix6;

/// The inertia of a rigid body
///
/// Maps a [Twist] with coefficients (e23, e13, e12, e1i, e2i, e3i)
/// onto the [Wrench] (e23, e13, e12, e01, e02, e03) of its momentum.
/// The sign flips on the off-diagonal rotational entries account for
/// the e13 coefficient being the negated y component.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound(
        serialize = "T: Real + serde::Serialize",
        deserialize = "T: Real + serde::Deserialize<'de>"
    ))
)]
pub struct Inertia<T> {
    tensor: Matrix6<T>,
}

impl<T: Real> Inertia<T> {
    /// The inertia of a body with the given mass and rotational inertia tensor about its center of mass
    pub fn new(mass: T, ixx: T, ixy: T, ixz: T, iyy: T, iyz: T, izz: T) -> Inertia<T> {
        let z = T::zero();
        Inertia {
            tensor: Matrix6::from_row_slice(&[
                ixx, -ixy, ixz, z, z, z, //
                -ixy, iyy, -iyz, z, z, z, //
                ixz, -iyz, izz, z, z, z, //
                z, z, z, mass, z, z, //
                z, z, z, z, mass, z, //
                z, z, z, z, z, mass,
            ]),
        }
    }

    pub fn zero() -> Inertia<T> {
        Inertia {
            tensor: Matrix6::from_element(T::zero()),
        }
    }

    pub fn from_tensor(tensor: Matrix6<T>) -> Inertia<T> {
        Inertia { tensor }
    }

    /// The mass, read off the translational block
    pub fn mass(&self) -> T {
        self.tensor[(5, 5)]
    }

    /// The same rotational inertia with its translational block set to `mass`
    ///
    /// Only meaningful for an inertia about the center of mass,
    /// where the translational block is diagonal.
    pub fn with_mass(mut self, mass: T) -> Inertia<T> {
        for i in 3..6 {
            self.tensor[(i, i)] = mass;
        }
        self
    }

    /// The momentum wrench of a body moving with the given twist
    pub fn call(&self, twist: Twist<T>) -> Wrench<T> {
        let v = twist.vector();
        Wrench::from_vector(core::array::from_fn(|i| {
            self.tensor
                .row(i)
                .iter()
                .zip(v.iter())
                .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
        }))
    }

    pub fn tensor(&self) -> Matrix6<T> {
        self.tensor
    }

    /// The same inertia, seen from a frame moved by `m`
    ///
    /// `I'(V) = M I(M̃ V M) M̃`
    pub fn transform(&self, m: Motor<T>) -> Inertia<T> {
        let columns: [[T; 6]; 6] = core::array::from_fn(|j| {
            let mut unit = [T::zero(); 6];
            unit[j] = T::one();
            let body_twist = m.reverse_apply(Twist::from_vector(unit));
            m.apply(self.call(body_twist)).vector()
        });
        Inertia {
            tensor: Matrix6::from_fn(|i, j| columns[j][i]),
        }
    }

    pub fn inverse_transform(&self, m: Motor<T>) -> Inertia<T> {
        self.transform(m.reverse())
    }

    /// `½ P(V) · V`, where P(V) is the momentum
    pub fn kinetic_energy(&self, twist: Twist<T>) -> T {
        self.call(twist).power(twist) * T::one_half()
    }
}

impl<T: Real> PartialEq for Inertia<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tensor == other.tensor
    }
}

impl<T: Real> Add for Inertia<T> {
    type Output = Inertia<T>;

    fn add(self, r: Inertia<T>) -> Inertia<T> {
        Inertia {
            tensor: Matrix6::from_fn(|i, j| self.tensor[(i, j)] + r.tensor[(i, j)]),
        }
    }
}

impl<T: Real> Default for Inertia<T> {
    fn default() -> Self {
        Inertia::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call() {
        let inertia = Inertia::new(2., 1., 0., 0., 3., 0., 5.);
        let w = inertia.call(Twist::from_velocities(Vector::new(1., 1., 1.), Vector::new(1., 2., 3.)));
        assert_eq!(w.torque(), Vector::new(1., 3., 5.));
        assert_eq!(w.force(), Vector::new(2., 4., 6.));
    }

    #[test]
    fn test_with_mass() {
        let inertia = Inertia::<f64>::zero().with_mass(2.);
        assert_eq!(inertia.mass(), 2.);
        let w = inertia.call(Twist::from_velocities(Vector::new(1., 0., 0.), Vector::new(0., 0., 3.)));
        assert_eq!(w.torque(), Vector::zero());
        assert_eq!(w.force(), Vector::new(0., 0., 6.));
    }

    #[test]
    fn test_parallel_axis() {
        // Moving a point-like body one unit along z adds m d² about x and y
        let inertia = Inertia::<f64>::new(10., 1., 0., 0., 1., 0., 1.).transform(Motor::from(Translator::new(0., 0., 1.)));
        let tensor = inertia.tensor();
        assert!((tensor[(0, 0)] - 11.).abs() < 1e-12);
        assert!((tensor[(1, 1)] - 11.).abs() < 1e-12);
        assert!((tensor[(2, 2)] - 1.).abs() < 1e-12);
        assert!((inertia.mass() - 10.).abs() < 1e-12);
        assert!((tensor - tensor.transpose()).norm() < 1e-12);
    }

    #[test]
    fn test_kinetic_energy_is_frame_independent() {
        let inertia = Inertia::new(10., 1., 2., 3., 4., 5., 6.);
        let m = Motor::from_rotor_translator(
            Rotor::new(RotorGenerator::new(0., 0., 1.), core::f64::consts::FRAC_PI_2),
            Translator::new(0., 0., 1.),
        );
        let body_twist = Twist::from_velocities(Vector::new(0.1, -0.2, 0.3), Vector::new(1., 0.5, -2.));
        let space_twist = body_twist.transform(m);
        let e_body = inertia.kinetic_energy(body_twist);
        let e_space = inertia.transform(m).kinetic_energy(space_twist);
        assert!((e_body - e_space).abs() < 1e-9);
        let back = inertia.transform(m).inverse_transform(m);
        assert!((back.tensor() - inertia.tensor()).norm() < 1e-9);
    }
}
