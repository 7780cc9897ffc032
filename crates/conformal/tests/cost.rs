mod common;

use common::*;
use conformal::robot::{
    Cost, Manipulator, SingleManipulatorDualTarget, SingleManipulatorMotorCost, SingleManipulatorTarget,
};
use conformal::*;
use nalgebra::DVector;

const Q_TARGET: [f64; 3] = [0.4, -0.3, 0.25];
const Q: [f64; 3] = [-0.2, 0.5, 0.1];

fn manipulator() -> Manipulator<f64> {
    Manipulator::new(mixed_system(), "slide").unwrap()
}

fn shifted(q: &[f64], k: usize, h: f64) -> Vec<f64> {
    let mut q = q.to_vec();
    q[k] += h;
    q
}

// Central differences of the value against the analytic gradient,
// and of the error against each Jacobian column
fn assert_derivatives_match<C: Cost<f64>>(cost: &C, q: &[f64]) {
    let h = 1e-6;
    let gradient = cost.gradient(q).unwrap();
    let jacobian = cost.jacobian(q).unwrap();
    assert_eq!(gradient.len(), q.len());
    assert_eq!(jacobian.ncols(), q.len());
    for k in 0..q.len() {
        let plus = shifted(q, k, h);
        let minus = shifted(q, k, -h);
        let fd = (cost.value(&plus).unwrap() - cost.value(&minus).unwrap()) / (2. * h);
        assert!(
            (fd - gradient[k]).abs() < 1e-5 * gradient[k].abs().max(1.),
            "joint {k}: finite difference {fd}, gradient {}",
            gradient[k]
        );

        let fd_column: DVector<f64> = (cost.error(&plus).unwrap() - cost.error(&minus).unwrap()) / (2. * h);
        for i in 0..fd_column.len() {
            assert!(
                (fd_column[i] - jacobian[(i, k)]).abs() < 1e-5,
                "({i}, {k}): finite difference {}, jacobian {}",
                fd_column[i],
                jacobian[(i, k)]
            );
        }
    }

    let (g, hessian) = cost.gradient_and_hessian(q).unwrap();
    assert_eq!(g, gradient);
    assert_eq!(hessian, jacobian.tr_mul(&jacobian) * 2.);
}

#[test]
fn test_point_target() {
    init_logging();
    let manipulator = manipulator();
    let target = manipulator.ee_motor(&Q_TARGET).unwrap().apply(Point::<f64>::origin());
    let cost = SingleManipulatorTarget::new(&manipulator, Point::<f64>::origin(), target);

    // Two points wedge into a point pair
    assert_eq!(cost.error(&Q).unwrap().len(), 10);
    assert!(cost.value(&Q).unwrap() > 1e-3);
    assert!(cost.value(&Q_TARGET).unwrap() < 1e-20);
    assert_derivatives_match(&cost, &Q);
    assert_derivatives_match(&cost, &[0.; 3]);
}

#[test]
fn test_sphere_and_plane_targets() {
    let manipulator = manipulator();
    let motor = manipulator.ee_motor(&Q_TARGET).unwrap();

    let sphere = motor.apply(Sphere::from_center_radius(Point::<f64>::origin(), 0.1));
    let cost = SingleManipulatorTarget::new(&manipulator, Point::<f64>::origin(), sphere);
    assert!(cost.value(&Q).unwrap() > 1e-6);
    assert_derivatives_match(&cost, &Q);

    // Any configuration that keeps the tip in the plane costs nothing
    let plane = motor.apply(Plane::from_points(
        Point::<f64>::origin(),
        Point::new(1., 0., 0.),
        Point::new(0., 1., 0.),
    ));
    let cost = SingleManipulatorTarget::new(&manipulator, Point::<f64>::origin(), plane);
    assert!(cost.value(&Q_TARGET).unwrap() < 1e-20);
    assert!(cost.value(&Q).unwrap() > 1e-6);
    assert_derivatives_match(&cost, &Q);
}

#[test]
fn test_dual_target() {
    let manipulator = manipulator();
    let target = manipulator.ee_motor(&Q_TARGET).unwrap().apply(Point::<f64>::origin());
    let cost = SingleManipulatorDualTarget::new(&manipulator, Point::<f64>::origin(), target);

    // The inner product of two unit points is half their squared distance
    let tip = manipulator.ee_motor(&Q).unwrap().apply(Point::<f64>::origin());
    let half_squared = 0.5 * tip.distance(target).powi(2);
    assert_eq!(cost.error(&Q).unwrap().len(), 1);
    assert!((cost.value(&Q).unwrap() - half_squared * half_squared).abs() < 1e-9);
    assert!(cost.value(&Q_TARGET).unwrap() < 1e-20);
    assert_derivatives_match(&cost, &Q);

    let sphere = manipulator
        .ee_motor(&Q_TARGET)
        .unwrap()
        .apply(Sphere::from_center_radius(Point::<f64>::origin(), 0.1));
    let cost = SingleManipulatorDualTarget::new(&manipulator, Point::<f64>::origin(), sphere);
    assert_derivatives_match(&cost, &Q);
}

#[test]
fn test_motor_cost() {
    let manipulator = manipulator();
    let target = manipulator.ee_motor(&Q_TARGET).unwrap();
    let cost = SingleManipulatorMotorCost::new(&manipulator, target);

    assert_eq!(cost.error(&Q).unwrap().len(), 6);
    assert!(cost.value(&Q_TARGET).unwrap() < 1e-20);
    assert!(cost.value(&Q).unwrap() > 1e-3);
    assert_derivatives_match(&cost, &Q);

    // A pure translation away from the target shows up on the translational coefficients only
    let offset = SingleManipulatorMotorCost::new(&manipulator, target * Motor::from(Translator::new(0., 0., 0.5)));
    let error = offset.error(&Q_TARGET).unwrap();
    assert_coefficients_close(&error.as_slice()[..3], &[0.; 3], 1e-12);
    assert!((error.norm() - 0.5).abs() < 1e-12);
}

#[test]
fn test_cost_errors() {
    let manipulator = manipulator();
    let cost = SingleManipulatorMotorCost::new(&manipulator, Motor::identity());
    assert_eq!(
        cost.value(&[0.; 2]),
        Err(Error::DofMismatch {
            expected: 3,
            actual: 2
        })
    );
}
