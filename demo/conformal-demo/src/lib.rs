//! A double pendulum swinging under gravity, integrated with forward dynamics

use conformal::robot::{Joint, Link, Manipulator, System};
use conformal::*;
use log::debug;

/// Two unit-length links hinged about x at the origin
///
/// At zero joint angles both links point along +y.
pub fn double_pendulum() -> Result<Manipulator<f64>> {
    let mut system = System::new("double pendulum");
    system.add_link(Link::new("world"))?;
    for name in ["upper", "lower"] {
        let link = Link::new(name)
            .with_mass(1.)
            .with_center_of_mass(Translator::new(0., 0.5, 0.))
            .with_inertia(Inertia::new(1., 0.09, 0., 0., 0.01, 0., 0.09));
        system.add_link(link)?;
    }
    system.add_link(Link::new("tip"))?;

    let hinge = RotorGenerator::from_axis(Vector::new(1., 0., 0.));
    let one_along_y = Motor::from(Translator::new(0., 1., 0.));
    system.add_joint(Joint::revolute("shoulder", Motor::identity(), hinge).connect("world", "upper"))?;
    system.add_joint(Joint::revolute("elbow", one_along_y, hinge).connect("upper", "lower"))?;
    system.add_joint(Joint::fixed("tip_joint", one_along_y).connect("lower", "tip"))?;

    Manipulator::new(system, "tip_joint")
}

pub struct PhysicsState {
    pub q: Vec<f64>,
    pub qd: Vec<f64>,
    pub time: f64,
}

impl PhysicsState {
    pub fn new(q: Vec<f64>) -> PhysicsState {
        let qd = vec![0.; q.len()];
        PhysicsState { q, qd, time: 0. }
    }

    /// Semi-implicit Euler step with no joint torques
    pub fn step(&mut self, manipulator: &Manipulator<f64>, dt: f64) -> Result<()> {
        let tau = vec![0.; self.q.len()];
        let qdd = manipulator.joint_accelerations(&self.q, &self.qd, &tau)?;
        for ((q, qd), qdd) in self.q.iter_mut().zip(self.qd.iter_mut()).zip(qdd) {
            *qd += qdd * dt;
            *q += *qd * dt;
        }
        self.time += dt;
        debug!("t = {:.3}: q = {:?}, qd = {:?}", self.time, self.q, self.qd);
        Ok(())
    }

    /// `½ q̇ᵀ M(q) q̇`
    pub fn kinetic_energy(&self, manipulator: &Manipulator<f64>) -> Result<f64> {
        let m = manipulator.system().compute_joint_space_mass_matrix(&self.q)?;
        let qd = nalgebra::DVector::from_column_slice(&self.qd);
        Ok(0.5 * qd.dot(&(m * &qd)))
    }

    pub fn tip(&self, manipulator: &Manipulator<f64>) -> Result<Point<f64>> {
        Ok(manipulator.ee_motor(&self.q)?.apply(Point::origin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pendulum_falls() {
        let pendulum = double_pendulum().unwrap();
        let mut state = PhysicsState::new(vec![0., 0.]);
        let start = state.tip(&pendulum).unwrap();
        for _ in 0..100 {
            state.step(&pendulum, 1e-3).unwrap();
        }
        let end = state.tip(&pendulum).unwrap();
        assert!(end.z() < start.z());
        assert!(state.kinetic_energy(&pendulum).unwrap() > 0.);
    }
}
