//! The conformal geometric algebra of 3D Euclidean space
//!
//! Five basis vectors: e1, e2, e3 square to 1,
//! and the null vectors e0 (the origin) and ei (the point at infinity)
//! satisfy e0 · ei = -1.
//!
//! Every type below is a fixed subset of the 32 basis blades.
//! The [blades](crate::blades) module fixes the global index and grade of each blade;
//! the coefficients of a type are stored in declaration order.

use crate::algebraic_ops::*;
use crate::geometric_algebra;
use crate::scalar::*;

geometric_algebra! {
    basis![e0, e1, e2, e3, ei];
    metric![
        [0, 0, 0, 0, -1],
        [0, 1, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 0, 1, 0],
        [-1, 0, 0, 0, 0],
    ];
    blades![
        scalar,
        e1, e2, e3, ei, e0,
        e23, e13, e12, e1i, e2i, e3i, e01, e02, e03, e0i,
        e123, e12i, e13i, e23i, e012, e013, e023, e01i, e02i, e03i,
        e123i, e0123, e012i, e023i, e013i,
        e0123i,
    ];

    /// A Euclidean vector, e.g. a direction or displacement
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Vector<T> {
        pub e1: T,
        pub e2: T,
        pub e3: T,
    }

    /// A conformal point
    ///
    /// The point at Euclidean location x is embedded as
    /// `x + ½|x|² ei + e0`.
    /// Any non-zero multiple of this represents the same location;
    /// the e0 coefficient is the weight.
    ///
    /// ## Example Operations
    /// * Two points wedge into a [PointPair].
    /// * Three points wedge into a [Circle].
    /// * Four points wedge into a [Sphere].
    /// * The inner product of two unit-weight points is -½ of their squared distance.
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Point<T> {
        pub e1: T,
        pub e2: T,
        pub e3: T,
        pub ei: T,
        pub e0: T,
    }

    /// The generator of a [Rotor]; a rotation plane scaled by the angle
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RotorGenerator<T> {
        pub e23: T,
        pub e13: T,
        pub e12: T,
    }

    /// A direction vector t1 e1i + t2 e2i + t3 e3i
    ///
    /// This is also the generator of a [Translator].
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DirectionVector<T> {
        pub e1i: T,
        pub e2i: T,
        pub e3i: T,
    }

    /// The generator of a [Motor]: a rotational part and a translational part
    ///
    /// As a physical quantity, this is a [Twist]
    /// (angular velocity in e23, e13, e12 and linear velocity in e1i, e2i, e3i.)
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MotorGenerator<T> {
        pub e23: T,
        pub e13: T,
        pub e12: T,
        pub e1i: T,
        pub e2i: T,
        pub e3i: T,
    }

    /// The generator of a [SimilarityTransformation]: a motor generator plus a log-scale on e0i
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SimilarityGenerator<T> {
        pub e23: T,
        pub e13: T,
        pub e12: T,
        pub e1i: T,
        pub e2i: T,
        pub e3i: T,
        pub e0i: T,
    }

    /// A rotation about an axis through the origin
    #[multivector]
    #[versor]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Rotor<T> {
        pub scalar: T,
        pub e23: T,
        pub e13: T,
        pub e12: T,
    }

    /// A pure translation, `1 - ½ t ei`
    #[multivector]
    #[versor]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Translator<T> {
        pub scalar: T,
        pub e1i: T,
        pub e2i: T,
        pub e3i: T,
    }

    /// A uniform scaling about the origin
    #[multivector]
    #[versor]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Dilator<T> {
        pub scalar: T,
        pub e0i: T,
    }

    /// A rigid body motion (rotation and translation)
    ///
    /// A unit motor is the product of a [Translator] and a [Rotor].
    /// Motors compose with the geometric product:
    /// `m1 * m2` applies `m2` first, then `m1`.
    ///
    /// The e123i coefficient is zero for motors built from a single
    /// rotation about an axis through the origin followed by a translation,
    /// and non-zero for general screw motions.
    #[multivector]
    #[versor]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Motor<T> {
        pub scalar: T,
        pub e23: T,
        pub e13: T,
        pub e12: T,
        pub e1i: T,
        pub e2i: T,
        pub e3i: T,
        pub e123i: T,
    }

    /// A force and torque pair
    ///
    /// Torque lives on e23, e13, e12 and force on e01, e02, e03.
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Wrench<T> {
        pub e23: T,
        pub e13: T,
        pub e12: T,
        pub e01: T,
        pub e02: T,
        pub e03: T,
    }

    /// Two points, as their outer product
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PointPair<T> {
        pub e23: T,
        pub e13: T,
        pub e12: T,
        pub e1i: T,
        pub e2i: T,
        pub e3i: T,
        pub e01: T,
        pub e02: T,
        pub e03: T,
        pub e0i: T,
    }

    /// A line, as the outer product of two points and ei
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Line<T> {
        pub e12i: T,
        pub e13i: T,
        pub e23i: T,
        pub e01i: T,
        pub e02i: T,
        pub e03i: T,
    }

    /// A circle, as the outer product of three points
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Circle<T> {
        pub e123: T,
        pub e12i: T,
        pub e13i: T,
        pub e23i: T,
        pub e012: T,
        pub e013: T,
        pub e023: T,
        pub e01i: T,
        pub e02i: T,
        pub e03i: T,
    }

    /// A plane, as the outer product of three points and ei
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Plane<T> {
        pub e123i: T,
        pub e012i: T,
        pub e023i: T,
        pub e013i: T,
    }

    /// A sphere, as the outer product of four points
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Sphere<T> {
        pub e123i: T,
        pub e0123: T,
        pub e012i: T,
        pub e023i: T,
        pub e013i: T,
    }

    /// A rigid body motion combined with a uniform scaling
    #[multivector]
    #[versor]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SimilarityTransformation<T> {
        pub scalar: T,
        pub e12: T,
        pub e13: T,
        pub e23: T,
        pub e0i: T,
        pub e1i: T,
        pub e2i: T,
        pub e012i: T,
        pub e3i: T,
        pub e013i: T,
        pub e023i: T,
        pub e123i: T,
    }

    /// A general multivector holding every blade
    #[multivector]
    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Multivector<T> {
        pub scalar: T,
        pub e1: T,
        pub e2: T,
        pub e3: T,
        pub ei: T,
        pub e0: T,
        pub e23: T,
        pub e13: T,
        pub e12: T,
        pub e1i: T,
        pub e2i: T,
        pub e3i: T,
        pub e01: T,
        pub e02: T,
        pub e03: T,
        pub e0i: T,
        pub e123: T,
        pub e12i: T,
        pub e13i: T,
        pub e23i: T,
        pub e012: T,
        pub e013: T,
        pub e023: T,
        pub e01i: T,
        pub e02i: T,
        pub e03i: T,
        pub e123i: T,
        pub e0123: T,
        pub e012i: T,
        pub e023i: T,
        pub e013i: T,
        pub e0123i: T,
    }
}

/// The generator of a [Translator]
pub type TranslatorGenerator<T> = DirectionVector<T>;

/// Angular and linear velocity
pub type Twist<T> = MotorGenerator<T>;

// Products that land on the scalar return a bare float
macro_rules! scalar_coefficients {
    ($($float:ty),*) => {$(
        impl Coefficients<$float> for $float {
            const BLADE_INDICES: &'static [usize] = &[blades::SCALAR];

            fn coefficient(&self, i: usize) -> $float {
                if i == 0 {
                    *self
                } else {
                    0.
                }
            }
        }
    )*};
}

scalar_coefficients!(f32, f64);
