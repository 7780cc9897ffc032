use crate::algebra::*;
use crate::inertia::Inertia;
use crate::scalar::*;

/// A rigid body in a [System](super::System)
#[derive(Clone, Debug)]
pub struct Link<T> {
    name: String,
    mass: T,
    center_of_mass: Translator<T>,
    inertia: Inertia<T>,
    axis: MotorGenerator<T>,
    pub(crate) parent_joint: Option<String>,
    pub(crate) child_joints: Vec<String>,
}

impl<T: Real> Link<T> {
    /// A massless link with its center of mass at the link frame origin
    pub fn new(name: impl Into<String>) -> Link<T> {
        Link {
            name: name.into(),
            mass: T::zero(),
            center_of_mass: Translator::identity(),
            inertia: Inertia::zero(),
            axis: MotorGenerator::zero(),
            parent_joint: None,
            child_joints: vec![],
        }
    }

    /// Also sets the translational block of the inertia
    pub fn with_mass(mut self, mass: T) -> Link<T> {
        self.set_mass(mass);
        self
    }

    pub fn with_center_of_mass(mut self, center_of_mass: Translator<T>) -> Link<T> {
        self.center_of_mass = center_of_mass;
        self
    }

    /// The inertia about the center of mass, which also fixes the mass
    pub fn with_inertia(mut self, inertia: Inertia<T>) -> Link<T> {
        self.set_inertia(inertia);
        self
    }

    pub fn with_axis(mut self, axis: MotorGenerator<T>) -> Link<T> {
        self.axis = axis;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> T {
        self.mass
    }

    pub fn set_mass(&mut self, mass: T) {
        self.mass = mass;
        self.inertia = self.inertia.with_mass(mass);
    }

    pub fn center_of_mass(&self) -> Translator<T> {
        self.center_of_mass
    }

    pub fn set_center_of_mass(&mut self, center_of_mass: Translator<T>) {
        self.center_of_mass = center_of_mass;
    }

    pub fn inertia(&self) -> Inertia<T> {
        self.inertia
    }

    pub fn set_inertia(&mut self, inertia: Inertia<T>) {
        self.mass = inertia.mass();
        self.inertia = inertia;
    }

    pub fn axis(&self) -> MotorGenerator<T> {
        self.axis
    }

    pub fn parent_joint(&self) -> Option<&str> {
        self.parent_joint.as_deref()
    }

    pub fn child_joints(&self) -> &[String] {
        &self.child_joints
    }

    /// The inertia about the link frame origin
    pub fn inertia_in_link_frame(&self) -> Inertia<T> {
        self.inertia.transform(Motor::from(self.center_of_mass))
    }
}
