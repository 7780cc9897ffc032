//! Twists and wrenches
//!
//! A [Twist] holds angular velocity on e23, e13, e12 and linear velocity on e1i, e2i, e3i.
//! A [Wrench] holds torque on e23, e13, e12 and force on e01, e02, e03.
//! Both use the axis convention of [RotorGenerator]: the Euclidean x, y, z components
//! of the angular part are (e23, -e13, e12).
//!
//! The power delivered by a wrench moving along a twist is `-⟨W V⟩₀`.

use crate::algebra::*;
use crate::algebraic_ops::*;
use crate::scalar::*;

impl<T: Ring> MotorGenerator<T> {
    /// A twist from Euclidean angular and linear velocity
    pub fn from_velocities(angular: Vector<T>, linear: Vector<T>) -> Twist<T> {
        Twist::new(RotorGenerator::from_axis(angular), DirectionVector::from_vector3(linear))
    }

    pub fn angular(self) -> Vector<T> {
        self.rotational().axis()
    }

    pub fn linear(self) -> Vector<T> {
        Vector::new(self.e1i, self.e2i, self.e3i)
    }

    /// The twist as seen from a frame moved by `m`, `M V M̃`
    pub fn transform(self, m: Motor<T>) -> Twist<T> {
        m.transform(self)
    }

    /// The Lie bracket of two twists
    pub fn commute(self, r: Twist<T>) -> Twist<T> {
        self.commutator(r)
    }
}

impl<T: Ring> Wrench<T> {
    pub fn new(torque: Vector<T>, force: Vector<T>) -> Wrench<T> {
        Wrench {
            e23: torque.e1,
            e13: -torque.e2,
            e12: torque.e3,
            e01: force.e1,
            e02: force.e2,
            e03: force.e3,
        }
    }

    pub fn torque(self) -> Vector<T> {
        Vector::new(self.e23, -self.e13, self.e12)
    }

    pub fn force(self) -> Vector<T> {
        Vector::new(self.e01, self.e02, self.e03)
    }

    /// The wrench as seen from a frame moved by `m`, `M W M̃`
    pub fn transform(self, m: Motor<T>) -> Wrench<T> {
        m.transform(self)
    }

    /// `-⟨W V⟩₀`
    pub fn power(self, twist: Twist<T>) -> T {
        -(self | twist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Norm;

    #[test]
    fn test_power_is_dot_product() {
        let w = Wrench::new(Vector::new(1., 2., 3.), Vector::new(4., 5., 6.));
        let v = Twist::from_velocities(Vector::<f64>::new(0.5, -1., 2.), Vector::new(1., 0., -1.));
        // τ·ω + f·v
        let expected = (0.5 - 2. + 6.) + (4. - 6.);
        assert!((w.power(v) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_components() {
        let v = Twist::from_velocities(Vector::new(1., 2., 3.), Vector::new(4., 5., 6.));
        assert_eq!(v.angular(), Vector::new(1., 2., 3.));
        assert_eq!(v.linear(), Vector::new(4., 5., 6.));
        let w = Wrench::new(Vector::new(1., 2., 3.), Vector::new(4., 5., 6.));
        assert_eq!(w.torque(), Vector::new(1., 2., 3.));
        assert_eq!(w.force(), Vector::new(4., 5., 6.));
    }

    #[test]
    fn test_power_is_frame_independent() {
        let m = Motor::from_translator_rotor(
            Translator::<f64>::new(0.3, -1., 2.),
            Rotor::new(RotorGenerator::new(0.6, 0., 0.8), 0.7),
        )
        .normalized()
        .unwrap();
        let w = Wrench::new(Vector::new(1., 2., 3.), Vector::new(4., 5., 6.));
        let v = Twist::from_velocities(Vector::new(0.5, -1., 2.), Vector::new(1., 0., -1.));
        let p = w.power(v);
        let p_moved = w.transform(m).power(v.transform(m));
        assert!((p - p_moved).abs() < 1e-9);
    }

    #[test]
    fn test_commute_angular() {
        // [ω1, ω2] matches the cross product, up to the sign of the generator convention
        let x = Twist::from_velocities(Vector::<f64>::new(1., 0., 0.), Vector::zero());
        let y = Twist::from_velocities(Vector::new(0., 1., 0.), Vector::zero());
        let z = x.commute(y).angular();
        assert!(z.e1.abs() < 1e-12 && z.e2.abs() < 1e-12);
        assert!((z.e3.abs() - 1.).abs() < 1e-12);
    }
}
