//! Recursive Newton-Euler dynamics over a [System]
//!
//! Every link carries its own frame at its center of mass.
//! The forward pass propagates twists and accelerations from the root outwards;
//! the backward pass accumulates wrenches from the leaves inwards
//! and projects them onto the joint axes.
//! Gravity enters as an upward acceleration of the root link.

use super::System;
use crate::algebra::*;
use crate::algebraic_ops::*;
use crate::error::{Error, Result};
use crate::scalar::*;
use log::trace;
use nalgebra::{DMatrix, DVector, RealField};

/// Standard gravity, in m/s²
pub const GRAVITY: f64 = 9.81;

/// Parameters of a dynamics computation
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicsOptions<T> {
    /// Magnitude of gravity, acting along -z
    pub gravity: T,

    /// A wrench exerted by the child link of the named joint on its environment,
    /// expressed in that link's frame
    pub ee_wrench: Option<(String, Wrench<T>)>,
}

impl<T: Real> Default for DynamicsOptions<T> {
    fn default() -> Self {
        DynamicsOptions {
            gravity: T::from_f64(GRAVITY),
            ee_wrench: None,
        }
    }
}

impl<T: Real> DynamicsOptions<T> {
    pub fn without_gravity() -> Self {
        DynamicsOptions {
            gravity: T::zero(),
            ee_wrench: None,
        }
    }

    pub fn with_gravity(mut self, gravity: T) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_ee_wrench(mut self, joint: impl Into<String>, wrench: Wrench<T>) -> Self {
        self.ee_wrench = Some((joint.into(), wrench));
        self
    }
}

impl<T: Real> System<T> {
    /// Joint torques producing the accelerations `qdd`, under standard gravity
    pub fn compute_inverse_dynamics(&self, q: &[T], qd: &[T], qdd: &[T]) -> Result<Vec<T>> {
        self.compute_inverse_dynamics_with(q, qd, qdd, &DynamicsOptions::default())
    }

    pub fn compute_inverse_dynamics_with(
        &self,
        q: &[T],
        qd: &[T],
        qdd: &[T],
        options: &DynamicsOptions<T>,
    ) -> Result<Vec<T>> {
        self.check_finalized()?;
        for v in [q, qd, qdd] {
            Error::check_dof(self.dof(), v.len())?;
        }

        let ee_link = match &options.ee_wrench {
            Some((joint_name, wrench)) => {
                let joint = self.get_joint(joint_name)?;
                let link_id = self
                    .link_id(joint.child_link())
                    .ok_or_else(|| Error::not_found("link", joint.child_link()))?;
                Some((link_id, *wrench))
            }
            None => None,
        };

        let link_count = self.links().len();
        let root = self.link_order[0];

        // Per-link quantities, each in the link's center of mass frame
        let mut velocity = vec![Twist::zero(); link_count];
        let mut acceleration = vec![Twist::zero(); link_count];
        let mut axis = vec![Twist::zero(); link_count];
        // Motion from the parent's center of mass frame to this link's
        let mut to_parent = vec![Motor::identity(); link_count];
        let mut parent = vec![root; link_count];
        let mut dof_index = vec![None; link_count];

        let root_com = Motor::from(self.link_by_id(root).center_of_mass());
        let gravity = DirectionVector::new(T::zero(), T::zero(), options.gravity);
        acceleration[root] = root_com.reverse_apply(Twist::from(gravity));

        for &link_id in self.link_order[1..].iter() {
            let link = self.link_by_id(link_id);
            let joint_name = link
                .parent_joint()
                .ok_or_else(|| Error::topology(format!("link {:?} has no parent joint", link.name())))?;
            let joint = self.get_joint(joint_name)?;
            let parent_id = self
                .link_id(joint.parent_link())
                .ok_or_else(|| Error::not_found("link", joint.parent_link()))?;
            let index = self.dof_index(joint_name);
            let (qi, qdi, qddi) = match index {
                Some(i) => (q[i], qd[i], qdd[i]),
                None => (T::zero(), T::zero(), T::zero()),
            };

            let parent_com = Motor::from(self.link_by_id(parent_id).center_of_mass());
            let com = Motor::from(link.center_of_mass());
            let x = parent_com.reverse() * joint.motor(qi) * com;
            let a = com.reverse_apply(joint.axis());

            let v = x.reverse_apply(velocity[parent_id]) + a * qdi;
            let dv = x.reverse_apply(acceleration[parent_id]) + a * qddi + a.commute(v) * qdi;
            trace!("link {:?}: twist {:?}, acceleration {:?}", link.name(), v, dv);

            velocity[link_id] = v;
            acceleration[link_id] = dv;
            axis[link_id] = a;
            to_parent[link_id] = x;
            parent[link_id] = parent_id;
            dof_index[link_id] = index;
        }

        let mut force = vec![Wrench::zero(); link_count];
        let mut torques = vec![T::zero(); self.dof()];
        for &link_id in self.link_order[1..].iter().rev() {
            let link = self.link_by_id(link_id);
            let inertia = link.inertia();
            let momentum = inertia.call(velocity[link_id]);
            let bias: Wrench<T> = velocity[link_id].commutator(momentum).project();

            // Children have already added their share into force[link_id]
            let mut f = force[link_id] + inertia.call(acceleration[link_id]) - bias;
            if let Some((ee_link_id, wrench)) = ee_link {
                if ee_link_id == link_id {
                    f += Motor::from(link.center_of_mass()).reverse_apply(wrench);
                }
            }
            trace!("link {:?}: wrench {:?}", link.name(), f);

            force[link_id] = f;
            let parent_id = parent[link_id];
            force[parent_id] += to_parent[link_id].apply(f);
            if let Some(i) = dof_index[link_id] {
                torques[i] = -(f | axis[link_id]);
            }
        }
        Ok(torques)
    }

    /// Joint space mass matrix, column k being the torques for unit acceleration of joint k
    pub fn compute_joint_space_mass_matrix(&self, q: &[T]) -> Result<DMatrix<T>> {
        let n = self.dof();
        let zeros = vec![T::zero(); n];
        let options = DynamicsOptions::without_gravity();
        let mut mass_matrix = DMatrix::from_element(n, n, T::zero());
        for k in 0..n {
            let mut qdd = zeros.clone();
            qdd[k] = T::one();
            let torques = self.compute_inverse_dynamics_with(q, &zeros, &qdd, &options)?;
            mass_matrix.set_column(k, &DVector::from_vec(torques));
        }
        Ok(mass_matrix)
    }
}

impl<T: Real + RealField> System<T> {
    /// Joint accelerations produced by the torques `tau`, under standard gravity
    pub fn compute_forward_dynamics(&self, q: &[T], qd: &[T], tau: &[T]) -> Result<Vec<T>> {
        self.compute_forward_dynamics_with(q, qd, tau, &DynamicsOptions::default())
    }

    /// Solves `M(q) qdd = tau - c(q, qd)`, with the bias `c` from inverse dynamics at zero acceleration
    pub fn compute_forward_dynamics_with(
        &self,
        q: &[T],
        qd: &[T],
        tau: &[T],
        options: &DynamicsOptions<T>,
    ) -> Result<Vec<T>> {
        Error::check_dof(self.dof(), tau.len())?;
        let zeros = vec![<T as Ring>::zero(); self.dof()];
        let bias = self.compute_inverse_dynamics_with(q, qd, &zeros, options)?;
        let mass_matrix = self.compute_joint_space_mass_matrix(q)?;
        let rhs = DVector::from_fn(self.dof(), |i, _| tau[i] - bias[i]);
        let cholesky = mass_matrix.cholesky().ok_or(Error::Singular)?;
        Ok(cholesky.solve(&rhs).iter().copied().collect())
    }
}
