#![cfg(test)]

use crate::algebra::*;
use crate::error::Error;
use crate::ops::*;
use core::f64::consts::{FRAC_PI_2, PI};
use nalgebra::{SMatrix, Vector3};

macro_rules! assert_close {
    ($left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                assert!(
                    (*left_val).is_close(*right_val),
                    "{:?} !~= {:?}",
                    left_val,
                    right_val
                );
            }
        }
    };
}

trait IsClose {
    fn is_close(self, rhs: Self) -> bool;
}

impl IsClose for f64 {
    fn is_close(self, rhs: f64) -> bool {
        (self - rhs).abs() < 1e-9
    }
}

macro_rules! impl_is_close {
    ($($type:ident),*) => {
        $(
            impl IsClose for $type<f64> {
                fn is_close(self, rhs: Self) -> bool {
                    self.vector()
                        .iter()
                        .zip(rhs.vector().iter())
                        .all(|(a, b)| (a - b).abs() < 1e-9)
                }
            }
        )*
    };
}

impl_is_close!(
    Vector,
    Point,
    RotorGenerator,
    DirectionVector,
    MotorGenerator,
    SimilarityGenerator,
    Rotor,
    Translator,
    Dilator,
    Motor
);

fn sample_generator() -> MotorGenerator<f64> {
    MotorGenerator::new(RotorGenerator::new(0.4, -0.2, 0.9), DirectionVector::new(0.5, -1., 2.))
}

#[test]
fn test_rotor_quarter_turn() {
    let r = Rotor::new(RotorGenerator::new(0., 0., 1.), FRAC_PI_2);
    assert_close!(r.apply(Point::new(1., 0., 0.)), Point::new(0., 1., 0.));

    // About y, z goes to x
    let r = Rotor::new(RotorGenerator::from_axis(Vector::new(0., 1., 0.)), FRAC_PI_2);
    assert_close!(r.apply(Point::new(0., 0., 1.)), Point::new(1., 0., 0.));
}

#[test]
fn test_rotor_log() {
    let b = RotorGenerator::new(0.3, -0.5, 0.7);
    assert_close!(Rotor::exp(b).log().unwrap(), b);

    let tiny = RotorGenerator::new(1e-5, 0., -2e-5);
    assert_close!(Rotor::exp(tiny).log().unwrap(), tiny);

    assert_close!(Rotor::<f64>::identity().log().unwrap(), RotorGenerator::zero());
    assert_eq!(Rotor::<f64>::zero().log(), Err(Error::ZeroNorm));
}

#[test]
fn test_rotor_log_half_turn() {
    // Both signs of the axis give the same rotation; the positive one is returned
    let up = RotorGenerator::new(0., 0., PI);
    assert_close!(Rotor::exp(-up).log().unwrap(), up);
    assert_close!(Rotor::exp(up).log().unwrap(), up);
    assert_close!(Rotor::exp(up).angle().unwrap(), PI);
}

#[test]
fn test_rotation_matrix() {
    let r = Rotor::new(RotorGenerator::from_axis(Vector::new(1. / 3., 2. / 3., 2. / 3.)), 0.8);
    let m = r.to_rotation_matrix();
    assert_close!(Rotor::from_rotation_matrix(m), r);

    let v = m * Vector3::new(1., -2., 0.5);
    let p = r.apply(Point::new(1., -2., 0.5));
    assert_close!(Point::new(v[0], v[1], v[2]), p);

    assert_close!(Rotor::from_quaternion(r.to_quaternion()), r);
}

#[test]
fn test_translator() {
    let t = Translator::new(1., 2., 3.);
    assert_close!(t.apply(Point::origin()), Point::new(1., 2., 3.));
    assert_close!(t.log(), DirectionVector::new(1., 2., 3.));
    assert_close!(t * t.inverse().unwrap(), Translator::identity());
    assert!(Translator::<f64>::zero().inverse().is_err());
}

#[test]
fn test_motor_exp_log() {
    let g = sample_generator();
    assert_close!(Motor::exp(g).log().unwrap(), g);

    // A negated motor is the same motion
    assert_close!((-Motor::exp(g)).log().unwrap(), g);

    assert_close!(Motor::<f64>::identity().log().unwrap(), MotorGenerator::zero());
    assert_eq!(Motor::<f64>::zero().log(), Err(Error::ZeroNorm));
}

#[test]
fn test_motor_exp_special_cases() {
    let pure_translation = MotorGenerator::new(RotorGenerator::zero(), DirectionVector::new(1., 2., 3.));
    assert_close!(Motor::exp(pure_translation), Motor::from(Translator::new(1., 2., 3.)));

    let b = RotorGenerator::new(0.2, 0.1, -0.3);
    let pure_rotation = MotorGenerator::new(b, DirectionVector::zero());
    assert_close!(Motor::exp(pure_rotation), Motor::from(Rotor::exp(b)));
}

#[test]
fn test_motor_parts() {
    let r = Rotor::new(RotorGenerator::new(0.6, 0., 0.8), 1.1);
    let t = Translator::new(-1., 0.5, 2.);
    let m = Motor::from_translator_rotor(t, r);
    assert_close!(m.rotor(), r);
    assert_close!(m.translator(), t);
    assert_close!(m.apply(Point::origin()), Point::new(-1., 0.5, 2.));
    assert_close!(m.reverse_apply(m.apply(Point::new(1., 2., 3.))), Point::new(1., 2., 3.));
}

#[test]
fn test_motor_composition() {
    let m1 = Motor::exp(sample_generator());
    let m2 = Motor::from_rotor_translator(
        Rotor::new(RotorGenerator::new(0., 1., 0.), 0.4),
        Translator::new(0., 0., 2.),
    );
    let p = Point::new(0.3, -0.2, 1.);
    assert_close!((m1 * m2).apply(p), m1.apply(m2.apply(p)));
    assert_close!((m1 * m2).norm(), 1.);
    assert_close!(m1.apply(m1.reverse_apply(p)), p);
}

#[test]
fn test_exp_jacobian_finite_difference() {
    let g = sample_generator();
    let jacobian = Motor::exp_jacobian(g);
    let h = 1e-6;
    for j in 0..6 {
        let mut plus = g.vector();
        let mut minus = g.vector();
        plus[j] += h;
        minus[j] -= h;
        let a = Motor::exp(MotorGenerator::from_vector(plus)).vector();
        let b = Motor::exp(MotorGenerator::from_vector(minus)).vector();
        for i in 0..8 {
            let fd = (a[i] - b[i]) / (2. * h);
            assert!((jacobian[(i, j)] - fd).abs() < 1e-6, "({i}, {j}): {} vs {fd}", jacobian[(i, j)]);
        }
    }
}

#[test]
fn test_log_jacobian_inverts_exp_jacobian() {
    let g = sample_generator();
    let product = Motor::exp(g).log_jacobian().unwrap() * Motor::exp_jacobian(g);
    assert!((product - SMatrix::<f64, 6, 6>::identity()).norm() < 1e-9);
}

#[test]
fn test_dilator() {
    let d = Dilator::new(2.);
    assert_close!(d.apply(Point::new(1., 2., 3.)).unitized().unwrap(), Point::new(2., 4., 6.));
    assert_close!(d.scale(), 2.);
    assert_close!(d.log(), 2f64.ln());
}

#[test]
fn test_similarity_factor() {
    let m = Motor::exp(sample_generator());
    let d = Dilator::new(1.5);
    let s = SimilarityTransformation::from_motor_dilator(m, d);
    assert_close!(s.scale(), 1.5);

    let (m2, d2) = s.factor().unwrap();
    assert_close!(m2, m);
    assert_close!(d2, d);

    // Scale about the origin, then move
    let p = Point::new(1., 0., -1.);
    let expected = m.apply(Point::new(1.5, 0., -1.5));
    assert_close!(s.apply(p).unitized().unwrap(), expected);
}

#[test]
fn test_similarity_exp_log() {
    let g = SimilarityGenerator::new(sample_generator(), 0.4);
    assert_close!(SimilarityTransformation::exp(g).log().unwrap(), g);
    assert_close!(g.motion(), sample_generator());
    assert_close!(g.log_scale(), 0.4);
}

#[test]
fn test_point_pair_endpoints() {
    let pp = PointPair::from_points(Point::new(1., 2., 3.), Point::new(4., 5., 6.));
    assert_close!(pp.point1(), Point::new(1., 2., 3.));
    assert_close!(pp.point2(), Point::new(4., 5., 6.));
    assert_close!(Point::new(1., 2., 3.).distance(Point::new(4., 6., 3.)), 5.);
}

#[test]
fn test_circle() {
    let c = Circle::from_points(Point::new(1., 0., 0.), Point::new(0., 1., 0.), Point::new(-1., 0., 0.));
    assert_close!(c.center().unwrap(), Point::origin());
    assert_close!(c.radius().unwrap(), 1.);

    let c = Circle::from_points(Point::new(2., 0., 1.), Point::new(0., 2., 1.), Point::new(-2., 0., 1.));
    assert_close!(c.center().unwrap(), Point::new(0., 0., 1.));
    assert_close!(c.radius().unwrap(), 2.);

    // Moving the circle moves its center
    let m = Motor::exp(sample_generator());
    assert_close!(m.apply(c).center().unwrap(), m.apply(Point::new(0., 0., 1.)));
    assert_close!(m.apply(c).radius().unwrap(), 2.);
}

#[test]
fn test_sphere() {
    let s = Sphere::from_points(
        Point::new(1., 0., 0.),
        Point::new(0., 1., 0.),
        Point::new(-1., 0., 0.),
        Point::new(0., 0., 1.),
    );
    assert_close!(s.center().unwrap(), Point::origin());
    assert_close!(s.radius().unwrap(), 1.);

    let s = Sphere::from_center_radius(Point::new(1., 2., 3.), 2.);
    assert_close!(s.center().unwrap(), Point::new(1., 2., 3.));
    assert_close!(s.radius().unwrap(), 2.);
}

#[test]
fn test_plane_normal() {
    let plane = Plane::from_points(Point::<f64>::origin(), Point::new(0., 1., 0.), Point::new(0., 0., 1.));
    let n = plane.normal();
    assert!(n.e1.abs() > 1e-9);
    assert_close!(n.e2, 0.);
    assert_close!(n.e3, 0.);
}

#[test]
fn test_normalized() {
    let m = Motor::exp(sample_generator()) * 3.;
    let unit = m.normalized().unwrap();
    assert_close!(unit.norm(), 1.);
    assert_eq!(Motor::<f64>::zero().normalized(), Err(Error::ZeroNorm));
}
