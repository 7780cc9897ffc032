#![allow(dead_code)]

use conformal::robot::{Joint, KinematicChain, Link, System};
use conformal::*;
use core::f64::consts::PI;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_coefficients_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!((a - e).abs() < tol, "coefficient {i}: {actual:?} !~= {expected:?}");
    }
}

pub fn rotation_about(axis: Vector<f64>, angle: f64) -> Rotor<f64> {
    Rotor::new(RotorGenerator::from_axis(axis), angle)
}

pub fn z() -> RotorGenerator<f64> {
    RotorGenerator::from_axis(Vector::new(0., 0., 1.))
}

/// Two revolute z joints one unit apart along y, and a tip one more unit along y
pub fn planar_chain() -> KinematicChain<f64> {
    let step = Motor::from(Translator::new(0., 1., 0.));
    let mut chain = KinematicChain::new();
    chain.add_actuated_joint(Joint::revolute("j1", step, z())).unwrap();
    chain.add_actuated_joint(Joint::revolute("j2", step, z())).unwrap();
    chain.add_fixed_motor(step).unwrap();
    chain.finalize();
    chain
}

/// Revolute, revolute and prismatic joints in general position, with a base offset
pub fn mixed_chain() -> KinematicChain<f64> {
    let mut chain = KinematicChain::new();
    chain
        .add_fixed_motor(Motor::from(Translator::new(0.2, 0., 0.3)))
        .unwrap();
    chain
        .add_actuated_joint(Joint::revolute("shoulder", Motor::from(Translator::new(0., 1., 0.)), z()))
        .unwrap();
    chain
        .add_actuated_joint(Joint::revolute(
            "elbow",
            Motor::from_translator_rotor(Translator::new(0., 0., 1.), rotation_about(Vector::new(0., 0., 1.), 0.3)),
            RotorGenerator::from_axis(Vector::new(1., 0., 0.)),
        ))
        .unwrap();
    chain
        .add_actuated_joint(Joint::prismatic(
            "slide",
            Motor::from(Translator::new(0.5, 0., 0.)),
            DirectionVector::new(0., 1., 0.),
        ))
        .unwrap();
    chain
        .add_fixed_motor(Motor::from(Translator::new(0., 0., 0.4)))
        .unwrap();
    chain.finalize();
    chain
}

/// Four links in a line joined by three revolute z joints
pub fn planar_system() -> System<f64> {
    let mut system = System::new("planar");
    for i in 0..4 {
        system
            .add_link(Link::new(format!("l{i}")).with_inertia(Inertia::new(0.1, 1., 0., 0., 1., 0., 1.)))
            .unwrap();
    }
    for i in 1..4 {
        let joint = Joint::revolute(format!("j{i}"), Motor::from(Translator::new(0., 1., 0.)), z())
            .connect(format!("l{}", i - 1), format!("l{i}"));
        system.add_joint(joint).unwrap();
    }
    system.finalize().unwrap();
    system
}

/// The joints of [mixed_chain] as a system, with offset centers of mass
pub fn mixed_system() -> System<f64> {
    let mut system = System::new("mixed");
    system.add_link(Link::new("base")).unwrap();
    for name in ["upper", "lower", "slider"] {
        let link = Link::new(name)
            .with_mass(2.)
            .with_center_of_mass(Translator::new(0.1, 0.2, -0.1))
            .with_inertia(Inertia::new(2., 0.3, 0.05, 0.02, 0.4, 0.01, 0.5));
        system.add_link(link).unwrap();
    }
    let joints = [
        Joint::revolute("shoulder", Motor::from(Translator::new(0., 1., 0.)), z()).connect("base", "upper"),
        Joint::revolute(
            "elbow",
            Motor::from_translator_rotor(Translator::new(0., 0., 1.), rotation_about(Vector::new(0., 0., 1.), 0.3)),
            RotorGenerator::from_axis(Vector::new(1., 0., 0.)),
        )
        .connect("upper", "lower"),
        Joint::prismatic(
            "slide",
            Motor::from(Translator::new(0.5, 0., 0.)),
            DirectionVector::new(0., 1., 0.),
        )
        .connect("lower", "slider"),
    ];
    for joint in joints {
        system.add_joint(joint).unwrap();
    }
    system.finalize().unwrap();
    system
}

/// A palm with `count` two-joint fingers spread evenly around z
pub fn hand_system(count: usize) -> (System<f64>, Vec<String>) {
    let mut system = System::new("hand");
    system.add_link(Link::new("palm")).unwrap();
    let mut tips = vec![];
    for i in 0..count {
        let angle = 2. * PI * i as f64 / count as f64;
        // Keep every finger rotation inside (-π, π)
        let angle = if angle > PI { angle - 2. * PI } else { angle };
        let base = format!("finger{i}_base");
        let middle = format!("finger{i}_middle");
        let tip = format!("finger{i}_tip");
        for name in [&base, &middle, &tip] {
            system
                .add_link(Link::new(name.clone()).with_inertia(Inertia::new(0.05, 1e-3, 0., 0., 1e-3, 0., 1e-3)))
                .unwrap();
        }
        let spread = Motor::from_rotor_translator(
            rotation_about(Vector::new(0., 0., 1.), angle),
            Translator::new(1., 0., 0.),
        );
        system
            .add_joint(Joint::revolute(format!("finger{i}_j1"), spread, z()).connect("palm", base.clone()))
            .unwrap();
        system
            .add_joint(
                Joint::revolute(
                    format!("finger{i}_j2"),
                    Motor::from(Translator::new(0.5, 0., 0.)),
                    RotorGenerator::from_axis(Vector::new(0., 1., 0.)),
                )
                .connect(base.clone(), middle.clone()),
            )
            .unwrap();
        let tip_joint = format!("finger{i}_tip_joint");
        system
            .add_joint(Joint::fixed(tip_joint.clone(), Motor::from(Translator::new(0.3, 0., 0.))).connect(middle, tip))
            .unwrap();
        tips.push(tip_joint);
    }
    (system, tips)
}
