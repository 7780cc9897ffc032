use super::{Joint, Limits};
use crate::algebra::*;
use crate::algebraic_ops::*;
use crate::error::{Error, Result};
use crate::inertia::Inertia;
use crate::scalar::*;
use log::debug;
use nalgebra::DMatrix;
use std::collections::BTreeMap;

/// A serial chain of actuated joints, interleaved with fixed motors
///
/// Joints and fixed motors are appended while the chain is being built.
/// Once [finalized](KinematicChain::finalize), the chain can no longer change
/// and the kinematic computations become available.
///
/// Fixed motors are keyed by the index of the actuated joint they follow
/// (`-1` for a motor placed before the first joint).
#[derive(Clone, Debug)]
pub struct KinematicChain<T> {
    joints: Vec<Joint<T>>,
    fixed_motors: BTreeMap<isize, Motor<T>>,
    finalized: bool,
}

impl<T: Real> Default for KinematicChain<T> {
    fn default() -> Self {
        KinematicChain::new()
    }
}

impl<T: Real> KinematicChain<T> {
    pub fn new() -> KinematicChain<T> {
        KinematicChain {
            joints: vec![],
            fixed_motors: BTreeMap::new(),
            finalized: false,
        }
    }

    pub fn add_actuated_joint(&mut self, joint: Joint<T>) -> Result<()> {
        if self.finalized {
            return Err(Error::ChainFinalized);
        }
        if !joint.is_actuated() {
            return Err(Error::topology(format!("joint {:?} is not actuated", joint.name())));
        }
        self.joints.push(joint);
        Ok(())
    }

    /// Append a fixed motion after the most recently added joint
    ///
    /// Consecutive fixed motors are composed into one.
    pub fn add_fixed_motor(&mut self, motor: Motor<T>) -> Result<()> {
        if self.finalized {
            return Err(Error::ChainFinalized);
        }
        let key = self.joints.len() as isize - 1;
        let composed = match self.fixed_motors.get(&key) {
            Some(&existing) => existing * motor,
            None => motor,
        };
        self.fixed_motors.insert(key, composed);
        Ok(())
    }

    pub fn set_fixed_motors(&mut self, fixed_motors: BTreeMap<isize, Motor<T>>) -> Result<()> {
        if self.finalized {
            return Err(Error::ChainFinalized);
        }
        self.fixed_motors = fixed_motors;
        Ok(())
    }

    pub fn actuated_joints(&self) -> &[Joint<T>] {
        &self.joints
    }

    pub fn fixed_motors(&self) -> &BTreeMap<isize, Motor<T>> {
        &self.fixed_motors
    }

    pub(crate) fn update_joint_limits(&mut self, joint_name: &str, limits: Limits<T>) {
        for joint in self.joints.iter_mut().filter(|joint| joint.name() == joint_name) {
            joint.set_limits(limits);
        }
    }

    pub fn dof(&self) -> usize {
        self.joints.len()
    }

    pub fn finalize(&mut self) {
        if !self.finalized {
            debug!(
                "finalized kinematic chain with {} DOF and {} fixed motors",
                self.joints.len(),
                self.fixed_motors.len()
            );
        }
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn check_finalized(&self) -> Result<()> {
        if self.finalized {
            Ok(())
        } else {
            Err(Error::ChainNotFinalized)
        }
    }

    fn check_positions(&self, positions: &[T]) -> Result<()> {
        self.check_finalized()?;
        Error::check_dof(self.dof(), positions.len())
    }

    fn joint(&self, index: usize) -> Result<&Joint<T>> {
        self.check_finalized()?;
        self.joints.get(index).ok_or(Error::InvalidIndex {
            kind: "joint",
            index,
            count: self.joints.len(),
        })
    }

    // Wrap a joint motor (or its derivative) with the fixed motors around it
    fn with_fixed_motors(&self, index: usize, motor: Motor<T>) -> Motor<T> {
        let motor = match (index, self.fixed_motors.get(&-1)) {
            (0, Some(&before)) => before * motor,
            _ => motor,
        };
        match self.fixed_motors.get(&(index as isize)) {
            Some(&after) => motor * after,
            None => motor,
        }
    }

    fn leading_motor(&self) -> Motor<T> {
        self.fixed_motors.get(&-1).copied().unwrap_or_else(Motor::identity)
    }

    /// The motion contributed by one joint, including the fixed motors around it
    pub fn compute_motor(&self, index: usize, position: T) -> Result<Motor<T>> {
        let joint = self.joint(index)?;
        Ok(self.with_fixed_motors(index, joint.motor(position)))
    }

    pub fn compute_motor_derivative(&self, index: usize, position: T) -> Result<Motor<T>> {
        let joint = self.joint(index)?;
        Ok(self.with_fixed_motors(index, joint.motor_derivative(position)))
    }

    /// `M₀ M₁ ⋯ Mₙ₋₁`
    pub fn compute_full_motor(&self, positions: &[T]) -> Result<Motor<T>> {
        self.check_positions(positions)?;
        if positions.is_empty() {
            return Ok(self.leading_motor());
        }
        let mut motor = Motor::identity();
        for (index, &q) in positions.iter().enumerate() {
            motor = motor * self.compute_motor(index, q)?;
        }
        Ok(motor)
    }

    /// Column i is `M₀ ⋯ Mᵢ₋₁ (dMᵢ/dqᵢ) Mᵢ₊₁ ⋯ Mₙ₋₁`
    pub fn compute_analytic_jacobian(&self, positions: &[T]) -> Result<Vec<Motor<T>>> {
        self.check_positions(positions)?;
        let n = positions.len();
        let motors = positions
            .iter()
            .enumerate()
            .map(|(index, &q)| self.compute_motor(index, q))
            .collect::<Result<Vec<_>>>()?;

        // prefixes[i] = M₀ ⋯ Mᵢ₋₁, suffixes[i] = Mᵢ₊₁ ⋯ Mₙ₋₁
        let mut prefixes = Vec::with_capacity(n);
        let mut prefix = Motor::identity();
        for motor in motors.iter() {
            prefixes.push(prefix);
            prefix = prefix * *motor;
        }
        let mut suffixes = vec![Motor::identity(); n];
        let mut suffix = Motor::identity();
        for i in (0..n).rev() {
            suffixes[i] = suffix;
            suffix = motors[i] * suffix;
        }

        positions
            .iter()
            .enumerate()
            .map(|(i, &q)| Ok(prefixes[i] * self.compute_motor_derivative(i, q)? * suffixes[i]))
            .collect()
    }

    /// The joint axes in the base frame
    pub fn compute_geometric_jacobian(&self, positions: &[T]) -> Result<Vec<Twist<T>>> {
        self.check_positions(positions)?;
        let mut jacobian = Vec::with_capacity(positions.len());
        let mut joint_motor = self.leading_motor();
        for (index, (joint, &q)) in self.joints.iter().zip(positions.iter()).enumerate() {
            jacobian.push(joint.current_axis(joint_motor * joint.frame()));
            joint_motor = joint_motor * joint.motor(q);
            if let Some(&after) = self.fixed_motors.get(&(index as isize)) {
                joint_motor = joint_motor * after;
            }
        }
        Ok(jacobian)
    }

    /// The joint axes in the frame of the chain tip
    pub fn compute_geometric_jacobian_body(&self, positions: &[T]) -> Result<Vec<Twist<T>>> {
        self.check_positions(positions)?;
        let n = positions.len();
        let mut jacobian = vec![Twist::zero(); n];
        let mut joint_motor = self
            .fixed_motors
            .get(&(n as isize - 1))
            .copied()
            .unwrap_or_else(Motor::identity);
        for i in (0..n).rev() {
            let joint = &self.joints[i];
            jacobian[i] = joint.current_axis(joint_motor.reverse());
            joint_motor = joint.motor(positions[i]) * joint_motor;
            if i > 0 {
                if let Some(&before) = self.fixed_motors.get(&(i as isize - 1)) {
                    joint_motor = before * joint_motor;
                }
            }
        }
        Ok(jacobian)
    }

    /// Time derivative of the base frame geometric Jacobian
    ///
    /// Each column moves with the twist of the joints before it,
    /// so its derivative is its commutator with that twist.
    pub fn compute_geometric_jacobian_time_derivative(
        &self,
        positions: &[T],
        velocities: &[T],
    ) -> Result<Vec<Twist<T>>> {
        self.compute_geometric_jacobian_time_derivative_in_frame(positions, velocities, Motor::identity())
    }

    /// As [compute_geometric_jacobian_time_derivative](KinematicChain::compute_geometric_jacobian_time_derivative),
    /// expressed in the frame of `reference`
    pub fn compute_geometric_jacobian_time_derivative_in_frame(
        &self,
        positions: &[T],
        velocities: &[T],
        reference: Motor<T>,
    ) -> Result<Vec<Twist<T>>> {
        Error::check_dof(self.dof(), velocities.len())?;
        let jacobian = self.compute_geometric_jacobian(positions)?;
        let mut twist = Twist::zero();
        let mut derivative = Vec::with_capacity(jacobian.len());
        for (&column, &qd) in jacobian.iter().zip(velocities.iter()) {
            derivative.push(reference.reverse_apply(column.commute(twist)));
            twist += column * qd;
        }
        Ok(derivative)
    }

    /// The joint space mass matrix
    ///
    /// `inertias[j]` is the inertia of the body moved by joint j,
    /// expressed in the frame of `M₀ ⋯ Mⱼ`.
    pub fn compute_mass_matrix(&self, positions: &[T], inertias: &[Inertia<T>]) -> Result<DMatrix<T>> {
        Error::check_dof(self.dof(), inertias.len())?;
        let jacobian = self.compute_geometric_jacobian(positions)?;
        let n = positions.len();
        let mut mass_matrix = DMatrix::from_element(n, n, T::zero());
        let mut motor = Motor::identity();
        for (j, inertia) in inertias.iter().enumerate() {
            motor = motor * self.compute_motor(j, positions[j])?;
            let inertia = inertia.transform(motor);
            for l in 0..=j {
                let momentum = inertia.call(jacobian[l]);
                for k in 0..=j {
                    mass_matrix[(k, l)] = mass_matrix[(k, l)] - (momentum | jacobian[k]);
                }
            }
        }
        Ok(mass_matrix)
    }
}
