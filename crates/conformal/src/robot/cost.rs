//! Least-squares costs on the end effector of a [Manipulator]
//!
//! Each cost is the squared norm of an error vector `e(q)`.
//! Its gradient is `2 Jᵀe` and its Gauss-Newton Hessian is `2 JᵀJ`,
//! where `J = ∂e/∂q`.
//! The error vectors hold blade coefficients,
//! so they are read out through [Coefficients].

use super::Manipulator;
use crate::algebra::*;
use crate::algebraic_ops::*;
use crate::error::Result;
use crate::scalar::*;
use core::ops::{BitOr, BitXor};
use log::trace;
use nalgebra::{DMatrix, DVector, RealField, SVector};

/// A twice-differentiable objective over joint positions
pub trait Cost<T: Real + RealField> {
    /// The residual whose squared norm is the cost
    fn error(&self, q: &[T]) -> Result<DVector<T>>;

    /// `∂e/∂q`, one column per joint
    fn jacobian(&self, q: &[T]) -> Result<DMatrix<T>>;

    fn value(&self, q: &[T]) -> Result<T> {
        let error = self.error(q)?;
        Ok(error.dot(&error))
    }

    fn gradient(&self, q: &[T]) -> Result<DVector<T>> {
        let error = self.error(q)?;
        let jacobian = self.jacobian(q)?;
        Ok(jacobian.tr_mul(&error) * T::from_integer(2))
    }

    /// The gradient, and the Gauss-Newton approximation of the Hessian
    fn gradient_and_hessian(&self, q: &[T]) -> Result<(DVector<T>, DMatrix<T>)> {
        let error = self.error(q)?;
        let jacobian = self.jacobian(q)?;
        let two = T::from_integer(2);
        Ok((jacobian.tr_mul(&error) * two, jacobian.tr_mul(&jacobian) * two))
    }
}

fn coefficients<T: Real, E: Coefficients<T>>(error: &E) -> DVector<T> {
    let count = E::BLADE_INDICES.len();
    DVector::from_iterator(count, (0..count).map(|i| error.coefficient(i)))
}

// The derivative of M X M̃ along each column of the analytic Jacobian
fn transformed_derivatives<T: Real>(motor: Motor<T>, columns: &[Motor<T>], x: Multivector<T>) -> Vec<Multivector<T>> {
    let m: Multivector<T> = motor.into();
    columns
        .iter()
        .map(|&column| {
            let dm: Multivector<T> = column.into();
            dm * x * m.reverse() + m * x * dm.reverse()
        })
        .collect()
}

// Rows are the blades of the error type, columns the joints
fn jacobian_from_columns<T: Real, E: Coefficients<T>>(columns: &[Multivector<T>]) -> DMatrix<T> {
    DMatrix::from_fn(E::BLADE_INDICES.len(), columns.len(), |i, k| {
        columns[k].get(E::BLADE_INDICES[i])
    })
}

/// Bring a tool held by the end effector onto a target
///
/// The error is the outer product `target ∧ M X M̃` of the target with the
/// transformed tool, which vanishes when the tool lies on the target,
/// e.g. a point tool on a point, sphere or plane target.
#[derive(Clone, Debug)]
pub struct SingleManipulatorTarget<'a, T, Tool, Target> {
    manipulator: &'a Manipulator<T>,
    tool: Tool,
    target: Target,
}

impl<'a, T, Tool, Target> SingleManipulatorTarget<'a, T, Tool, Target> {
    pub fn new(manipulator: &'a Manipulator<T>, tool: Tool, target: Target) -> Self {
        SingleManipulatorTarget {
            manipulator,
            tool,
            target,
        }
    }

    pub fn manipulator(&self) -> &'a Manipulator<T> {
        self.manipulator
    }
}

impl<'a, T, Tool, Target, E> Cost<T> for SingleManipulatorTarget<'a, T, Tool, Target>
where
    T: Real + RealField,
    Motor<T>: Transform<Tool>,
    Tool: Copy + Into<Multivector<T>>,
    Target: Copy + Into<Multivector<T>> + BitXor<Tool, Output = E>,
    E: Coefficients<T>,
{
    fn error(&self, q: &[T]) -> Result<DVector<T>> {
        let motor = self.manipulator.ee_motor(q)?;
        Ok(coefficients(&(self.target ^ motor.apply(self.tool))))
    }

    fn jacobian(&self, q: &[T]) -> Result<DMatrix<T>> {
        let motor = self.manipulator.ee_motor(q)?;
        let analytic = self.manipulator.ee_analytic_jacobian(q)?;
        let target: Multivector<T> = self.target.into();
        let columns: Vec<Multivector<T>> = transformed_derivatives(motor, &analytic, self.tool.into())
            .into_iter()
            .map(|dx| target ^ dx)
            .collect();
        trace!("target jacobian over {} joints", columns.len());
        Ok(jacobian_from_columns::<T, E>(&columns))
    }
}

/// Bring a tool held by the end effector onto a target, through their duals
///
/// The error is the inner product `target* · (M X M̃)*`.
/// For two unit points its magnitude is half their squared distance,
/// and for a point and a sphere it measures the power of the point.
#[derive(Clone, Debug)]
pub struct SingleManipulatorDualTarget<'a, T, Tool, Target> {
    manipulator: &'a Manipulator<T>,
    tool: Tool,
    target: Target,
}

impl<'a, T, Tool, Target> SingleManipulatorDualTarget<'a, T, Tool, Target> {
    pub fn new(manipulator: &'a Manipulator<T>, tool: Tool, target: Target) -> Self {
        SingleManipulatorDualTarget {
            manipulator,
            tool,
            target,
        }
    }

    pub fn manipulator(&self) -> &'a Manipulator<T> {
        self.manipulator
    }
}

impl<'a, T, Tool, Target, ToolDual, TargetDual, E> Cost<T> for SingleManipulatorDualTarget<'a, T, Tool, Target>
where
    T: Real + RealField,
    Motor<T>: Transform<Tool>,
    Tool: Copy + Dual<Output = ToolDual>,
    Target: Copy + Dual<Output = TargetDual>,
    ToolDual: Into<Multivector<T>>,
    TargetDual: Into<Multivector<T>> + BitOr<ToolDual, Output = E>,
    E: Coefficients<T>,
{
    fn error(&self, q: &[T]) -> Result<DVector<T>> {
        let motor = self.manipulator.ee_motor(q)?;
        Ok(coefficients(&(self.target.dual() | motor.apply(self.tool).dual())))
    }

    fn jacobian(&self, q: &[T]) -> Result<DMatrix<T>> {
        let motor = self.manipulator.ee_motor(q)?;
        let analytic = self.manipulator.ee_analytic_jacobian(q)?;
        let target: Multivector<T> = self.target.dual().into();
        // Motors commute with the pseudoscalar, so the dual moves like the tool
        let columns: Vec<Multivector<T>> = transformed_derivatives(motor, &analytic, self.tool.dual().into())
            .into_iter()
            .map(|dx| target | dx)
            .collect();
        Ok(jacobian_from_columns::<T, E>(&columns))
    }
}

/// Drive the end-effector motor onto a target motor
///
/// The error is the generator `log(T̃ M)` of the remaining motion,
/// with the rotational coefficients first.
#[derive(Clone, Debug)]
pub struct SingleManipulatorMotorCost<'a, T> {
    manipulator: &'a Manipulator<T>,
    target: Motor<T>,
}

impl<'a, T: Real> SingleManipulatorMotorCost<'a, T> {
    pub fn new(manipulator: &'a Manipulator<T>, target: Motor<T>) -> Self {
        SingleManipulatorMotorCost { manipulator, target }
    }

    pub fn manipulator(&self) -> &'a Manipulator<T> {
        self.manipulator
    }

    pub fn target(&self) -> Motor<T> {
        self.target
    }

    fn relative_motor(&self, q: &[T]) -> Result<Motor<T>> {
        Ok(self.target.reverse() * self.manipulator.ee_motor(q)?)
    }
}

impl<'a, T: Real + RealField> Cost<T> for SingleManipulatorMotorCost<'a, T> {
    fn error(&self, q: &[T]) -> Result<DVector<T>> {
        let generator = self.relative_motor(q)?.log()?;
        Ok(DVector::from_vec(generator.vector().to_vec()))
    }

    fn jacobian(&self, q: &[T]) -> Result<DMatrix<T>> {
        let log_jacobian = self.relative_motor(q)?.log_jacobian()?;
        let columns: Vec<SVector<T, 6>> = self
            .manipulator
            .ee_analytic_jacobian(q)?
            .into_iter()
            .map(|column| log_jacobian * SVector::from((self.target.reverse() * column).vector()))
            .collect();
        Ok(DMatrix::from_fn(6, columns.len(), |i, k| columns[k][i]))
    }
}
