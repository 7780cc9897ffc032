use crate::algebra::*;
use crate::scalar::*;

/// How a joint moves its child link relative to its parent link
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JointKind {
    Fixed,
    Revolute,
    Prismatic,
}

/// Bounds on the motion of an actuated joint
///
/// A zero `velocity` or `torque` bound means unbounded.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits<T> {
    pub position_lower: T,
    pub position_upper: T,
    pub velocity: T,
    pub torque: T,
}

impl<T: Real> Limits<T> {
    pub fn new(position_lower: T, position_upper: T, velocity: T, torque: T) -> Limits<T> {
        Limits {
            position_lower,
            position_upper,
            velocity,
            torque,
        }
    }

    pub fn contains(&self, position: T) -> bool {
        self.position_lower <= position && position <= self.position_upper
    }
}

impl<T: Real> Default for Limits<T> {
    /// One full turn, centered on zero
    fn default() -> Self {
        Limits::new(-T::pi(), T::pi(), T::zero(), T::zero())
    }
}

/// A joint between two links
///
/// The child link sits at `frame * exp(q * axis)` in the parent link's frame.
#[derive(Clone, Debug)]
pub struct Joint<T> {
    name: String,
    kind: JointKind,
    frame: Motor<T>,
    axis: MotorGenerator<T>,
    limits: Limits<T>,
    parent_link: String,
    child_link: String,
}

impl<T: Real> Joint<T> {
    fn new(name: impl Into<String>, kind: JointKind, frame: Motor<T>, axis: MotorGenerator<T>) -> Joint<T> {
        Joint {
            name: name.into(),
            kind,
            frame,
            axis,
            limits: Limits::default(),
            parent_link: String::new(),
            child_link: String::new(),
        }
    }

    pub fn fixed(name: impl Into<String>, frame: Motor<T>) -> Joint<T> {
        Joint::new(name, JointKind::Fixed, frame, MotorGenerator::zero())
    }

    /// A joint rotating about the unit generator `axis`
    pub fn revolute(name: impl Into<String>, frame: Motor<T>, axis: RotorGenerator<T>) -> Joint<T> {
        Joint::new(name, JointKind::Revolute, frame, MotorGenerator::new(axis, DirectionVector::zero()))
    }

    /// A joint sliding along the unit direction `axis`
    pub fn prismatic(name: impl Into<String>, frame: Motor<T>, axis: DirectionVector<T>) -> Joint<T> {
        Joint::new(name, JointKind::Prismatic, frame, MotorGenerator::new(RotorGenerator::zero(), axis))
    }

    /// A revolute joint whose frame is given as `[x, y, z, roll, pitch, yaw]`
    ///
    /// The frame rotation is `Rz(yaw) Ry(pitch) Rx(roll)`, applied after the translation.
    /// `axis` is the Euclidean rotation axis in the joint frame.
    pub fn revolute_from_parameters(name: impl Into<String>, parameters: [T; 6], axis: Vector<T>) -> Joint<T> {
        let [x, y, z, roll, pitch, yaw] = parameters;
        let o = T::zero();
        let l = T::one();
        let rotation = Rotor::new(RotorGenerator::from_axis(Vector::new(o, o, l)), yaw)
            * Rotor::new(RotorGenerator::from_axis(Vector::new(o, l, o)), pitch)
            * Rotor::new(RotorGenerator::from_axis(Vector::new(l, o, o)), roll);
        let frame = Motor::from_translator_rotor(Translator::new(x, y, z), rotation);
        Joint::revolute(name, frame, RotorGenerator::from_axis(axis))
    }

    /// Set the names of the links on either side of this joint
    pub fn connect(mut self, parent_link: impl Into<String>, child_link: impl Into<String>) -> Joint<T> {
        self.parent_link = parent_link.into();
        self.child_link = child_link.into();
        self
    }

    pub fn with_limits(mut self, limits: Limits<T>) -> Joint<T> {
        self.limits = limits;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> JointKind {
        self.kind
    }

    pub fn frame(&self) -> Motor<T> {
        self.frame
    }

    pub fn set_frame(&mut self, frame: Motor<T>) {
        self.frame = frame;
    }

    /// The joint axis in its own frame (zero for fixed joints)
    pub fn axis(&self) -> MotorGenerator<T> {
        self.axis
    }

    pub fn limits(&self) -> &Limits<T> {
        &self.limits
    }

    pub fn set_limits(&mut self, limits: Limits<T>) {
        self.limits = limits;
    }

    pub fn parent_link(&self) -> &str {
        &self.parent_link
    }

    pub fn child_link(&self) -> &str {
        &self.child_link
    }

    pub fn is_actuated(&self) -> bool {
        self.kind != JointKind::Fixed
    }

    /// The motion of the child link at position `q`, `frame * exp(q * axis)`
    pub fn motor(&self, q: T) -> Motor<T> {
        match self.kind {
            JointKind::Fixed => self.frame,
            JointKind::Revolute => self.frame * Rotor::exp(self.axis.rotational() * q),
            JointKind::Prismatic => self.frame * Translator::exp(self.axis.translational() * q),
        }
    }

    /// `d/dq motor(q) = motor(q) * (-½ axis)`
    pub fn motor_derivative(&self, q: T) -> Motor<T> {
        match self.kind {
            JointKind::Fixed => Motor::zero(),
            _ => self.motor(q) * (self.axis * -T::one_half()),
        }
    }

    /// The joint axis carried into the frame of `m`, `M a M̃`
    pub fn current_axis(&self, m: Motor<T>) -> MotorGenerator<T> {
        m.apply(self.axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn test_revolute_quarter_turn() {
        let joint = Joint::revolute("j", Motor::identity(), RotorGenerator::new(0., 0., 1.));
        let p = joint.motor(FRAC_PI_2).apply(Point::new(1., 0., 0.));
        assert!((p.x() - 0.).abs() < 1e-12);
        assert!((p.y() - 1.).abs() < 1e-12);
        assert!((p.z() - 0.).abs() < 1e-12);
    }

    #[test]
    fn test_prismatic() {
        let frame = Motor::from(Translator::<f64>::new(0., 1., 0.));
        let joint = Joint::prismatic("j", frame, DirectionVector::new(1., 0., 0.));
        let p = joint.motor(2.).apply(Point::origin());
        assert!((p.x() - 2.).abs() < 1e-12);
        assert!((p.y() - 1.).abs() < 1e-12);
    }

    #[test]
    fn test_motor_derivative() {
        let frame = Motor::from_rotor_translator(
            Rotor::new(RotorGenerator::new(0., 0., 1.), FRAC_PI_2),
            Translator::new(0., 0., 1.),
        );
        let joint = Joint::revolute("j", frame, RotorGenerator::new(1., 0., 0.));
        let h = 1e-6;
        let q = 0.3;
        let fd = (joint.motor(q + h) - joint.motor(q - h)) * (0.5 / h);
        let analytic = joint.motor_derivative(q);
        for (a, b) in fd.vector().iter().zip(analytic.vector().iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_fixed() {
        let frame = Motor::from(Translator::new(1., 2., 3.));
        let joint = Joint::fixed("j", frame);
        assert!(!joint.is_actuated());
        assert_eq!(joint.motor(1.), frame);
        assert_eq!(joint.motor_derivative(1.), Motor::zero());
    }

    #[test]
    fn test_from_parameters() {
        // Yaw by a quarter turn, then rotate about x in the joint frame
        let joint = Joint::revolute_from_parameters("j", [1., 0., 0., 0., 0., FRAC_PI_2], Vector::new(1., 0., 0.));
        let p = joint.frame().apply(Point::new(1., 0., 0.));
        assert!((p.x() - 1.).abs() < 1e-12);
        assert!((p.y() - 1.).abs() < 1e-12);
        let axis = joint.current_axis(joint.frame()).angular();
        assert!(axis.e1.abs() < 1e-12);
        assert!((axis.e2 - 1.).abs() < 1e-12);
    }
}
