use conformal::algebraic_ops::*;
use conformal::geometric_algebra;
use conformal::scalar::*;

mod vga2d {
    use super::*;

    geometric_algebra! {
        basis![e1, e2];
        metric![1, 1];
        blades![scalar, e1, e2, e12];

        #[multivector]
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        pub struct Vector<T> {
            pub e1: T,
            pub e2: T,
        }

        #[multivector]
        #[versor]
        #[derive(Clone, Copy, Debug, Default, PartialEq)]
        pub struct Even<T> {
            pub a: T,
            pub e12: T,
        }
    }
}

#[test]
fn test_custom_algebra_products() {
    let x = vga2d::Vector { e1: 1., e2: 0. };
    let y = vga2d::Vector { e1: 0., e2: 1. };
    assert_eq!(x | x, 1.);
    assert_eq!(x | y, 0.);
    assert_eq!(x * y, vga2d::Even { a: 0., e12: 1. });
    assert_eq!(y * x, vga2d::Even { a: 0., e12: -1. });
    assert_eq!((x ^ y).e12, 1.);
}

#[test]
fn test_custom_algebra_rotation() {
    let theta = 0.6f64;
    let r = vga2d::Even {
        a: (theta / 2.).cos(),
        e12: -(theta / 2.).sin(),
    };
    let v = r.transform(vga2d::Vector { e1: 1., e2: 0. });
    assert!((v.e1 - theta.cos()).abs() < 1e-12);
    assert!((v.e2 - theta.sin()).abs() < 1e-12);

    let back = r.reverse().transform(v);
    assert!((back.e1 - 1.).abs() < 1e-12);
    assert!(back.e2.abs() < 1e-12);
}

#[test]
fn test_blade_layout() {
    use conformal::{Motor, Point, Twist};

    assert_eq!(Point::<f64>::SIZE, 5);
    assert_eq!(Motor::<f64>::SIZE, 8);
    assert_eq!(Twist::<f64>::SIZE, 6);
    assert_eq!(Motor::<f64>::blades().len(), 8);
    assert_eq!(Motor::<f64>::BLADES[0], conformal::blades::SCALAR);
    assert_eq!(Motor::<f64>::BLADES[7], conformal::blades::E123I);

    assert_eq!(conformal::blades::COUNT, 32);
    assert_eq!(conformal::blades::E0123I, 31);
    assert_eq!(conformal::blades::GRADES[conformal::blades::E123I], 4);
    assert_eq!(conformal::blades::NAMES[conformal::blades::E1I], "e1i");
    assert_eq!(Point::<f64>::new(1., 2., 3.).get(conformal::blades::E2), 2.);
    assert_eq!(Point::<f64>::new(1., 2., 3.).get(conformal::blades::E12), 0.);
}

#[test]
fn test_reverse_and_grades() {
    use conformal::Motor;

    let m = Motor::<f64>::from_vector([1., 2., 3., 4., 5., 6., 7., 8.]);
    // Bivectors flip sign under reversal, the grade 4 part does not
    assert_eq!(m.reverse().vector(), [1., -2., -3., -4., -5., -6., -7., 8.]);
    assert_eq!(m.grade_part(0).vector(), [1., 0., 0., 0., 0., 0., 0., 0.]);
    assert_eq!(m.grade_part(4).vector(), [0., 0., 0., 0., 0., 0., 0., 8.]);
}
