mod common;

use common::*;
use conformal::robot::{Hand, Quadruped};
use conformal::*;

fn central_difference<F>(q: &[f64], i: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let step = 1e-6;
    let mut plus = q.to_vec();
    let mut minus = q.to_vec();
    plus[i] += step;
    minus[i] -= step;
    f(&plus)
        .iter()
        .zip(f(&minus).iter())
        .map(|(a, b)| (a - b) / (2. * step))
        .collect()
}

fn three_finger_hand() -> Hand<f64> {
    let (system, tips) = hand_system(3);
    Hand::new(system, tips).unwrap()
}

const Q: [f64; 6] = [0.1, 0.4, -0.2, 0.3, 0.25, -0.5];

#[test]
fn test_finger_layout() {
    init_logging();
    let hand = three_finger_hand();
    assert_eq!(hand.finger_count(), 3);
    assert_eq!(hand.dof(), 6);

    let motors = hand.finger_motors(&Q).unwrap();
    let points = hand.finger_points(&Q).unwrap();
    for id in 0..3 {
        let qi = &Q[2 * id..2 * id + 2];
        let m = hand.finger_motor(id, qi).unwrap();
        assert_coefficients_close(&m.vector(), &motors[id].vector(), 1e-12);
        assert_coefficients_close(&m.apply(Point::origin()).vector(), &points[id].vector(), 1e-12);
    }
}

#[test]
fn test_finger_errors() {
    let hand = three_finger_hand();
    assert_eq!(
        hand.finger_motor(5, &[0., 0.]),
        Err(Error::InvalidIndex {
            kind: "finger",
            index: 5,
            count: 3
        })
    );
    assert_eq!(
        hand.finger_motor(0, &[0., 0., 0.]),
        Err(Error::DofMismatch {
            expected: 2,
            actual: 3
        })
    );
    assert_eq!(
        hand.finger_points(&[0.; 5]),
        Err(Error::DofMismatch {
            expected: 6,
            actual: 5
        })
    );
    assert!(matches!(hand.finger_sphere(&Q), Err(Error::Topology(_))));
}

#[test]
fn test_stacked_jacobians() {
    let hand = three_finger_hand();
    let analytic = hand.analytic_jacobian(&Q).unwrap();
    let geometric = hand.geometric_jacobian(&Q).unwrap();
    assert_eq!(analytic.len(), 6);
    assert_eq!(geometric.len(), 6);
    for id in 0..3 {
        let qi = &Q[2 * id..2 * id + 2];
        let own = hand.finger_geometric_jacobian(id, qi).unwrap();
        for j in 0..2 {
            assert_coefficients_close(&geometric[2 * id + j].vector(), &own[j].vector(), 1e-12);
        }
    }

    let reference = hand.mean_motor(&Q).unwrap();
    let in_frame = hand.geometric_jacobian_in_frame(&Q, reference).unwrap();
    for (space, seen) in geometric.iter().zip(in_frame.iter()) {
        assert_coefficients_close(&reference.reverse_apply(*space).vector(), &seen.vector(), 1e-12);
    }
}

#[test]
fn test_mean_motor() {
    // Three fingers spread evenly: the mean rotation cancels out
    let hand = three_finger_hand();
    let mean = hand.mean_motor(&[0.; 6]).unwrap();
    assert!(mean.rotor().log().unwrap().vector().iter().all(|c| c.abs() < 1e-9));

    let analytic = hand.mean_motor_analytic_jacobian(&Q).unwrap();
    for (i, column) in analytic.iter().enumerate() {
        let fd = central_difference(&Q, i, |q| hand.mean_motor(q).unwrap().vector().to_vec());
        assert_coefficients_close(&column.vector(), &fd, 1e-6);
    }

    let m = hand.mean_motor(&Q).unwrap();
    let geometric = hand.mean_motor_geometric_jacobian(&Q).unwrap();
    for (column, twist) in analytic.iter().zip(geometric.iter()) {
        let expected: Twist<f64> = (*column * m.reverse()).project();
        assert_coefficients_close(&twist.vector(), &(expected * -2.).vector(), 1e-12);
    }
}

#[test]
fn test_finger_circle() {
    let hand = three_finger_hand();
    let circle = hand.finger_circle(&Q).unwrap();
    let points = hand.finger_points(&Q).unwrap();
    let expected = Circle::from_points(points[0], points[1], points[2]);
    assert_coefficients_close(&circle.vector(), &expected.vector(), 1e-12);

    let jacobian = hand.finger_circle_jacobian(&Q).unwrap();
    assert_eq!(jacobian.len(), 6);
    for (i, column) in jacobian.iter().enumerate() {
        let fd = central_difference(&Q, i, |q| hand.finger_circle(q).unwrap().vector().to_vec());
        assert_coefficients_close(&column.vector(), &fd, 1e-6);
    }
}

#[test]
fn test_quadruped_foot_sphere() {
    let (system, tips) = hand_system(4);
    let quadruped = Quadruped::new(system, tips).unwrap();
    assert_eq!(quadruped.dof(), 8);

    let q = [0.1, 0.4, -0.2, 0.3, 0.25, -0.5, 0.6, 0.2];
    let sphere = quadruped.foot_sphere(&q).unwrap();
    let center = sphere.center().unwrap();
    let radius = sphere.radius().unwrap();
    for foot in quadruped.foot_points(&q).unwrap() {
        assert!((foot.distance(center) - radius).abs() < 1e-9);
    }

    let jacobian = quadruped.foot_sphere_jacobian(&q).unwrap();
    assert_eq!(jacobian.len(), 8);
    for (i, column) in jacobian.iter().enumerate() {
        let fd = central_difference(&q, i, |q| quadruped.foot_sphere(q).unwrap().vector().to_vec());
        assert_coefficients_close(&column.vector(), &fd, 1e-6);
    }

    let (system, tips) = hand_system(3);
    assert!(matches!(Quadruped::new(system, tips), Err(Error::Topology(_))));
}
