//! Rigid multibody systems: joints, links, kinematic chains, dynamics
//! and end-effector costs for optimization

mod cost;
mod dynamics;
mod hand;
mod joint;
mod kinematic_chain;
mod link;
mod manipulator;
mod system;

pub use cost::{Cost, SingleManipulatorDualTarget, SingleManipulatorMotorCost, SingleManipulatorTarget};
pub use dynamics::{DynamicsOptions, GRAVITY};
pub use hand::{EndEffectorGroup, Hand, Quadruped};
pub use joint::{Joint, JointKind, Limits};
pub use kinematic_chain::KinematicChain;
pub use link::Link;
pub use manipulator::Manipulator;
pub use system::System;
