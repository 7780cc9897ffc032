use super::{DynamicsOptions, KinematicChain, System};
use crate::algebra::*;
use crate::error::Result;
use crate::scalar::*;
use nalgebra::RealField;
use rand::Rng;

/// A serial robot arm: a [System] plus the name of its end-effector joint
///
/// The manipulator takes ownership of the system.
#[derive(Clone, Debug)]
pub struct Manipulator<T> {
    system: System<T>,
    ee_joint: String,
}

impl<T: Real> Manipulator<T> {
    /// Finalizes the system if needed and creates the end-effector chain
    pub fn new(mut system: System<T>, ee_joint: impl Into<String>) -> Result<Manipulator<T>> {
        let ee_joint = ee_joint.into();
        if !system.is_finalized() {
            system.finalize()?;
        }
        if !system.has_kinematic_chain(&ee_joint) {
            system.create_kinematic_chain(&ee_joint)?;
        }
        Ok(Manipulator { system, ee_joint })
    }

    pub fn system(&self) -> &System<T> {
        &self.system
    }

    pub fn into_system(self) -> System<T> {
        self.system
    }

    pub fn ee_joint(&self) -> &str {
        &self.ee_joint
    }

    pub fn dof(&self) -> usize {
        self.system.dof()
    }

    pub fn ee_kinematic_chain(&self) -> Result<&KinematicChain<T>> {
        self.system.get_kinematic_chain(&self.ee_joint)
    }

    pub fn random_configuration<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<T>> {
        self.system.random_configuration(rng)
    }

    pub fn ee_motor(&self, q: &[T]) -> Result<Motor<T>> {
        self.ee_kinematic_chain()?.compute_full_motor(q)
    }

    pub fn ee_analytic_jacobian(&self, q: &[T]) -> Result<Vec<Motor<T>>> {
        self.ee_kinematic_chain()?.compute_analytic_jacobian(q)
    }

    /// The geometric Jacobian in the base frame
    pub fn ee_geometric_jacobian(&self, q: &[T]) -> Result<Vec<Twist<T>>> {
        self.ee_kinematic_chain()?.compute_geometric_jacobian(q)
    }

    /// The geometric Jacobian in the end-effector frame
    pub fn ee_frame_jacobian(&self, q: &[T]) -> Result<Vec<Twist<T>>> {
        let chain = self.ee_kinematic_chain()?;
        let ee_motor = chain.compute_full_motor(q)?;
        Ok(chain
            .compute_geometric_jacobian(q)?
            .into_iter()
            .map(|column| ee_motor.reverse_apply(column))
            .collect())
    }

    /// Inverse dynamics with the given gravity and a wrench exerted by the end effector
    pub fn joint_torques(&self, q: &[T], qd: &[T], qdd: &[T], gravity: T, ee_wrench: Wrench<T>) -> Result<Vec<T>> {
        let options = DynamicsOptions::default()
            .with_gravity(gravity)
            .with_ee_wrench(self.ee_joint.clone(), ee_wrench);
        self.system.compute_inverse_dynamics_with(q, qd, qdd, &options)
    }
}

impl<T: Real + RealField> Manipulator<T> {
    pub fn joint_accelerations(&self, q: &[T], qd: &[T], tau: &[T]) -> Result<Vec<T>> {
        self.system.compute_forward_dynamics(q, qd, tau)
    }
}
