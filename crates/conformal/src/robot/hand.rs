//! Systems with several end effectors sharing one base: hands and legged robots
//!
//! The configuration of a group is the concatenation of the configurations
//! of each end-effector chain, in the order the tips were given.

use super::{KinematicChain, System};
use crate::algebra::*;
use crate::algebraic_ops::*;
use crate::error::{Error, Result};
use crate::scalar::*;
use log::debug;
use nalgebra::{RealField, SMatrix, SVector};

/// A [System] with a list of end-effector joints
#[derive(Clone, Debug)]
pub struct EndEffectorGroup<T> {
    system: System<T>,
    tips: Vec<String>,
    kind: &'static str,
    // Start of each end effector in the flattened configuration
    offsets: Vec<usize>,
    dof: usize,
}

impl<T: Real> EndEffectorGroup<T> {
    /// Finalizes the system if needed and creates one chain per tip joint
    ///
    /// `kind` names the end effectors in error messages, e.g. "finger".
    pub fn new(mut system: System<T>, tips: Vec<String>, kind: &'static str) -> Result<EndEffectorGroup<T>> {
        if tips.is_empty() {
            return Err(Error::topology(format!("no {kind}s given")));
        }
        if !system.is_finalized() {
            system.finalize()?;
        }
        let mut offsets = Vec::with_capacity(tips.len());
        let mut dof = 0;
        for tip in tips.iter() {
            if !system.has_kinematic_chain(tip) {
                system.create_kinematic_chain(tip)?;
            }
            offsets.push(dof);
            dof += system.get_kinematic_chain(tip)?.dof();
        }
        debug!("{} with {} {}s and {} DOF", system.name(), tips.len(), kind, dof);
        Ok(EndEffectorGroup {
            system,
            tips,
            kind,
            offsets,
            dof,
        })
    }

    pub fn system(&self) -> &System<T> {
        &self.system
    }

    pub fn into_system(self) -> System<T> {
        self.system
    }

    pub fn tips(&self) -> &[String] {
        &self.tips
    }

    pub fn count(&self) -> usize {
        self.tips.len()
    }

    /// Total DOF over all end-effector chains
    pub fn dof(&self) -> usize {
        self.dof
    }

    pub fn chain(&self, id: usize) -> Result<&KinematicChain<T>> {
        let tip = self.tips.get(id).ok_or(Error::InvalidIndex {
            kind: self.kind,
            index: id,
            count: self.tips.len(),
        })?;
        self.system.get_kinematic_chain(tip)
    }

    pub fn end_effector_dof(&self, id: usize) -> Result<usize> {
        Ok(self.chain(id)?.dof())
    }

    // Split a flattened configuration into per end effector slices
    fn split<'a>(&self, q: &'a [T]) -> Result<Vec<&'a [T]>> {
        Error::check_dof(self.dof, q.len())?;
        Ok(self
            .offsets
            .iter()
            .enumerate()
            .map(|(id, &start)| {
                let end = self.offsets.get(id + 1).copied().unwrap_or(self.dof);
                &q[start..end]
            })
            .collect())
    }

    pub fn motor(&self, id: usize, q: &[T]) -> Result<Motor<T>> {
        self.chain(id)?.compute_full_motor(q)
    }

    pub fn analytic_jacobian(&self, id: usize, q: &[T]) -> Result<Vec<Motor<T>>> {
        self.chain(id)?.compute_analytic_jacobian(q)
    }

    /// The geometric Jacobian of one end effector, in the base frame
    pub fn geometric_jacobian(&self, id: usize, q: &[T]) -> Result<Vec<Twist<T>>> {
        self.chain(id)?.compute_geometric_jacobian(q)
    }

    /// The geometric Jacobian of one end effector, expressed in `reference`
    pub fn geometric_jacobian_in_frame(&self, id: usize, q: &[T], reference: Motor<T>) -> Result<Vec<Twist<T>>> {
        Ok(self
            .geometric_jacobian(id, q)?
            .into_iter()
            .map(|column| reference.reverse_apply(column))
            .collect())
    }

    pub fn motors(&self, q: &[T]) -> Result<Vec<Motor<T>>> {
        self.split(q)?
            .into_iter()
            .enumerate()
            .map(|(id, qi)| self.motor(id, qi))
            .collect()
    }

    /// End-effector positions, the origin moved by each end-effector motor
    pub fn points(&self, q: &[T]) -> Result<Vec<Point<T>>> {
        Ok(self
            .motors(q)?
            .into_iter()
            .map(|m| m.apply(Point::origin()))
            .collect())
    }

    /// Each end effector's analytic Jacobian, placed at its own columns
    pub fn stacked_analytic_jacobian(&self, q: &[T]) -> Result<Vec<Motor<T>>> {
        let mut columns = Vec::with_capacity(self.dof);
        for (id, qi) in self.split(q)?.into_iter().enumerate() {
            columns.extend(self.analytic_jacobian(id, qi)?);
        }
        Ok(columns)
    }

    pub fn stacked_geometric_jacobian(&self, q: &[T]) -> Result<Vec<Twist<T>>> {
        let mut columns = Vec::with_capacity(self.dof);
        for (id, qi) in self.split(q)?.into_iter().enumerate() {
            columns.extend(self.geometric_jacobian(id, qi)?);
        }
        Ok(columns)
    }

    pub fn stacked_geometric_jacobian_in_frame(&self, q: &[T], reference: Motor<T>) -> Result<Vec<Twist<T>>> {
        Ok(self
            .stacked_geometric_jacobian(q)?
            .into_iter()
            .map(|column| reference.reverse_apply(column))
            .collect())
    }

    fn mean_generator(&self, motors: &[Motor<T>]) -> Result<MotorGenerator<T>> {
        let scale = T::from_integer(motors.len() as isize).recip();
        let mut sum = MotorGenerator::zero();
        for m in motors.iter() {
            sum += m.log()?;
        }
        Ok(sum * scale)
    }

    /// `exp(1/n Σ log Mᵢ)`
    pub fn mean_motor(&self, q: &[T]) -> Result<Motor<T>> {
        Ok(Motor::exp(self.mean_generator(&self.motors(q)?)?))
    }

    fn check_count(&self, expected: usize, shape: &str) -> Result<()> {
        if self.count() == expected {
            Ok(())
        } else {
            Err(Error::topology(format!(
                "a {shape} needs {expected} {}s, have {}",
                self.kind,
                self.count()
            )))
        }
    }

    // Per column: the moving end effector and the velocity of its point
    fn point_velocities(&self, q: &[T]) -> Result<Vec<(usize, Point<T>)>> {
        let points = self.points(q)?;
        let mut columns = Vec::with_capacity(self.dof);
        for (id, qi) in self.split(q)?.into_iter().enumerate() {
            for twist in self.geometric_jacobian(id, qi)? {
                columns.push((id, -twist.commutator(points[id])));
            }
        }
        Ok(columns)
    }

    /// The circle through three end-effector points
    pub fn circle(&self, q: &[T]) -> Result<Circle<T>> {
        self.check_count(3, "circle")?;
        let p = self.points(q)?;
        Ok(p[0] ^ p[1] ^ p[2])
    }

    pub fn circle_jacobian(&self, q: &[T]) -> Result<Vec<Circle<T>>> {
        self.check_count(3, "circle")?;
        let p = self.points(q)?;
        Ok(self
            .point_velocities(q)?
            .into_iter()
            .map(|(id, dp)| {
                let mut points = [p[0], p[1], p[2]];
                points[id] = dp;
                points[0] ^ points[1] ^ points[2]
            })
            .collect())
    }

    /// The sphere through four end-effector points
    pub fn sphere(&self, q: &[T]) -> Result<Sphere<T>> {
        self.check_count(4, "sphere")?;
        let p = self.points(q)?;
        Ok(p[0] ^ p[1] ^ p[2] ^ p[3])
    }

    pub fn sphere_jacobian(&self, q: &[T]) -> Result<Vec<Sphere<T>>> {
        self.check_count(4, "sphere")?;
        let p = self.points(q)?;
        Ok(self
            .point_velocities(q)?
            .into_iter()
            .map(|(id, dp)| {
                let mut points = [p[0], p[1], p[2], p[3]];
                points[id] = dp;
                points[0] ^ points[1] ^ points[2] ^ points[3]
            })
            .collect())
    }
}

impl<T: Real + RealField> EndEffectorGroup<T> {
    /// Derivative of the mean motor, by the chain rule through exp and each log
    pub fn mean_motor_analytic_jacobian(&self, q: &[T]) -> Result<Vec<Motor<T>>> {
        let slices = self.split(q)?;
        let motors = slices
            .iter()
            .enumerate()
            .map(|(id, qi)| self.motor(id, qi))
            .collect::<Result<Vec<_>>>()?;
        let exp_jacobian = Motor::exp_jacobian(self.mean_generator(&motors)?);
        let scale = Recip::recip(T::from_integer(motors.len() as isize));

        let mut columns = Vec::with_capacity(self.dof);
        for (id, qi) in slices.into_iter().enumerate() {
            // d exp(Ḡ) / dMᵢ, with Ḡ the mean generator
            let chain: SMatrix<T, 8, 8> = exp_jacobian * motors[id].log_jacobian()? * scale;
            for column in self.analytic_jacobian(id, qi)? {
                let d_motor = chain * SVector::from(column.vector());
                columns.push(Motor::from_vector(core::array::from_fn(|i| d_motor[i])));
            }
        }
        Ok(columns)
    }

    /// Space twists of the mean motor, `-2 dM̄ M̄̃`
    pub fn mean_motor_geometric_jacobian(&self, q: &[T]) -> Result<Vec<Twist<T>>> {
        let mean = self.mean_motor(q)?;
        let minus_two = T::from_integer(-2);
        Ok(self
            .mean_motor_analytic_jacobian(q)?
            .into_iter()
            .map(|column| {
                let twist: Twist<T> = (column * mean.reverse()).project();
                twist * minus_two
            })
            .collect())
    }
}

/// A robot hand, one end effector per finger
#[derive(Clone, Debug)]
pub struct Hand<T> {
    group: EndEffectorGroup<T>,
}

impl<T: Real> Hand<T> {
    pub fn new(system: System<T>, finger_tips: Vec<String>) -> Result<Hand<T>> {
        Ok(Hand {
            group: EndEffectorGroup::new(system, finger_tips, "finger")?,
        })
    }

    pub fn group(&self) -> &EndEffectorGroup<T> {
        &self.group
    }

    pub fn system(&self) -> &System<T> {
        self.group.system()
    }

    pub fn into_system(self) -> System<T> {
        self.group.into_system()
    }

    pub fn finger_count(&self) -> usize {
        self.group.count()
    }

    pub fn dof(&self) -> usize {
        self.group.dof()
    }

    pub fn finger_motor(&self, id: usize, q: &[T]) -> Result<Motor<T>> {
        self.group.motor(id, q)
    }

    pub fn finger_motors(&self, q: &[T]) -> Result<Vec<Motor<T>>> {
        self.group.motors(q)
    }

    pub fn finger_points(&self, q: &[T]) -> Result<Vec<Point<T>>> {
        self.group.points(q)
    }

    pub fn finger_analytic_jacobian(&self, id: usize, q: &[T]) -> Result<Vec<Motor<T>>> {
        self.group.analytic_jacobian(id, q)
    }

    pub fn finger_geometric_jacobian(&self, id: usize, q: &[T]) -> Result<Vec<Twist<T>>> {
        self.group.geometric_jacobian(id, q)
    }

    pub fn finger_geometric_jacobian_in_frame(&self, id: usize, q: &[T], reference: Motor<T>) -> Result<Vec<Twist<T>>> {
        self.group.geometric_jacobian_in_frame(id, q, reference)
    }

    pub fn analytic_jacobian(&self, q: &[T]) -> Result<Vec<Motor<T>>> {
        self.group.stacked_analytic_jacobian(q)
    }

    pub fn geometric_jacobian(&self, q: &[T]) -> Result<Vec<Twist<T>>> {
        self.group.stacked_geometric_jacobian(q)
    }

    pub fn geometric_jacobian_in_frame(&self, q: &[T], reference: Motor<T>) -> Result<Vec<Twist<T>>> {
        self.group.stacked_geometric_jacobian_in_frame(q, reference)
    }

    pub fn mean_motor(&self, q: &[T]) -> Result<Motor<T>> {
        self.group.mean_motor(q)
    }

    /// Only defined for three fingers
    pub fn finger_circle(&self, q: &[T]) -> Result<Circle<T>> {
        self.group.circle(q)
    }

    pub fn finger_circle_jacobian(&self, q: &[T]) -> Result<Vec<Circle<T>>> {
        self.group.circle_jacobian(q)
    }

    /// Only defined for four fingers
    pub fn finger_sphere(&self, q: &[T]) -> Result<Sphere<T>> {
        self.group.sphere(q)
    }

    pub fn finger_sphere_jacobian(&self, q: &[T]) -> Result<Vec<Sphere<T>>> {
        self.group.sphere_jacobian(q)
    }
}

impl<T: Real + RealField> Hand<T> {
    pub fn mean_motor_analytic_jacobian(&self, q: &[T]) -> Result<Vec<Motor<T>>> {
        self.group.mean_motor_analytic_jacobian(q)
    }

    pub fn mean_motor_geometric_jacobian(&self, q: &[T]) -> Result<Vec<Twist<T>>> {
        self.group.mean_motor_geometric_jacobian(q)
    }
}

/// A four-legged robot, one end effector per foot
#[derive(Clone, Debug)]
pub struct Quadruped<T> {
    group: EndEffectorGroup<T>,
}

impl<T: Real> Quadruped<T> {
    pub fn new(system: System<T>, foot_tips: Vec<String>) -> Result<Quadruped<T>> {
        if foot_tips.len() != 4 {
            return Err(Error::topology(format!("a quadruped needs 4 feet, have {}", foot_tips.len())));
        }
        Ok(Quadruped {
            group: EndEffectorGroup::new(system, foot_tips, "foot")?,
        })
    }

    pub fn group(&self) -> &EndEffectorGroup<T> {
        &self.group
    }

    pub fn system(&self) -> &System<T> {
        self.group.system()
    }

    pub fn into_system(self) -> System<T> {
        self.group.into_system()
    }

    pub fn dof(&self) -> usize {
        self.group.dof()
    }

    pub fn foot_motor(&self, id: usize, q: &[T]) -> Result<Motor<T>> {
        self.group.motor(id, q)
    }

    pub fn foot_motors(&self, q: &[T]) -> Result<Vec<Motor<T>>> {
        self.group.motors(q)
    }

    pub fn foot_points(&self, q: &[T]) -> Result<Vec<Point<T>>> {
        self.group.points(q)
    }

    pub fn foot_analytic_jacobian(&self, id: usize, q: &[T]) -> Result<Vec<Motor<T>>> {
        self.group.analytic_jacobian(id, q)
    }

    pub fn foot_geometric_jacobian(&self, id: usize, q: &[T]) -> Result<Vec<Twist<T>>> {
        self.group.geometric_jacobian(id, q)
    }

    pub fn foot_geometric_jacobian_in_frame(&self, id: usize, q: &[T], reference: Motor<T>) -> Result<Vec<Twist<T>>> {
        self.group.geometric_jacobian_in_frame(id, q, reference)
    }

    pub fn analytic_jacobian(&self, q: &[T]) -> Result<Vec<Motor<T>>> {
        self.group.stacked_analytic_jacobian(q)
    }

    pub fn geometric_jacobian(&self, q: &[T]) -> Result<Vec<Twist<T>>> {
        self.group.stacked_geometric_jacobian(q)
    }

    pub fn geometric_jacobian_in_frame(&self, q: &[T], reference: Motor<T>) -> Result<Vec<Twist<T>>> {
        self.group.stacked_geometric_jacobian_in_frame(q, reference)
    }

    pub fn mean_motor(&self, q: &[T]) -> Result<Motor<T>> {
        self.group.mean_motor(q)
    }

    pub fn foot_sphere(&self, q: &[T]) -> Result<Sphere<T>> {
        self.group.sphere(q)
    }

    pub fn foot_sphere_jacobian(&self, q: &[T]) -> Result<Vec<Sphere<T>>> {
        self.group.sphere_jacobian(q)
    }
}

impl<T: Real + RealField> Quadruped<T> {
    pub fn mean_motor_analytic_jacobian(&self, q: &[T]) -> Result<Vec<Motor<T>>> {
        self.group.mean_motor_analytic_jacobian(q)
    }

    pub fn mean_motor_geometric_jacobian(&self, q: &[T]) -> Result<Vec<Twist<T>>> {
        self.group.mean_motor_geometric_jacobian(q)
    }
}
