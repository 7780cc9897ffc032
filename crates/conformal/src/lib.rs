//! conformal is a library for rigid body geometry, kinematics and dynamics
//! in the conformal geometric algebra of 3D space.
//!
//! Points, point pairs, lines, circles, planes and spheres are all
//! [multivectors](algebra) over the five basis vectors e1, e2, e3, e0 and ei.
//! Rotations, translations and their combinations ([Motor]s) act on every one of them
//! through the same sandwich product, and compose with the geometric product.
//!
//! On top of the algebra sit:
//! * the exponential and logarithm maps of [Rotor], [Translator], [Motor]
//!   and [SimilarityTransformation], with the Jacobians of the motor maps
//! * [kinematic chains](robot::KinematicChain) computing forward kinematics,
//!   analytic and geometric Jacobians, Jacobian time derivatives and mass matrices
//! * [systems](robot::System) of links and joints with forward and inverse dynamics,
//!   plus [manipulator](robot::Manipulator), [hand](robot::Hand) and
//!   [quadruped](robot::Quadruped) specializations
//!
//! All products are generated at compile time per pair of types,
//! so every output coefficient is one fused expression of the inputs
//! and nothing allocates.
//!
//! conformal is generic over the [scalar] datatype.
//! The algebra itself only needs [scalar addition and multiplication](scalar::Ring);
//! the Lie-group maps and robotics layer need [Real](scalar::Real),
//! which is implemented for `f32`, `f64` and [DualNumber].
//!
//! ```
//! use conformal::*;
//! use core::f64::consts::FRAC_PI_2;
//!
//! // A quarter turn about z
//! let rotor = Rotor::new(RotorGenerator::new(0., 0., 1.), FRAC_PI_2);
//! let p = Motor::from(rotor).apply(Point::new(1., 0., 0.));
//! assert!((p.x() - 0.).abs() < 1e-12);
//! assert!((p.y() - 1.).abs() < 1e-12);
//! ```

/// Generate geometric operations on the given set of structs
///
/// The [algebra] module is generated with this macro.
///
/// ```
/// mod pga2d {
///     use conformal::geometric_algebra;
///
///     // These traits must be brought into scope before invoking the macro:
///     use conformal::scalar::*;
///     use conformal::algebraic_ops::*;
///
///     geometric_algebra! {
///         // Basis vectors may be single letters,
///         // or a common prefix plus a single character e.g. [e0, e1, e2]
///         basis![e0, e1, e2];
///
///         // Either the diagonal of the metric, or every row of it
///         metric![0, 1, 1];
///
///         // Every blade, in the order that fixes its global index
///         blades![scalar, e0, e1, e2, e01, e02, e12, e012];
///
///         #[multivector] // Use this pseudo-macro to call out that a struct is a multivector
///         #[derive(Clone, Copy, Debug, Default, PartialEq)]
///         pub struct Vector<T> {
///             pub e1: T,
///             pub e2: T,
///         }
///
///         // The return type of an operation is the *first struct*
///         // that can represent the output, so compound structs go last.
///         #[multivector]
///         #[versor] // Generate sandwich products acting on every other struct
///         #[derive(Clone, Copy, Debug, Default, PartialEq)]
///         pub struct Even<T> {
///             pub a: T, // A field whose name isn't composed of basis vectors is the scalar
///             pub e01: T,
///             pub e02: T,
///             pub e12: T,
///         }
///     }
/// }
///
/// let v = pga2d::Vector { e1: 1., e2: 0. };
/// let w = pga2d::Vector { e1: 0., e2: 1. };
/// let e = v * w;
/// assert_eq!(e.e12, 1.);
/// assert_eq!(v | v, 1.);
/// ```
pub use conformal_macros::geometric_algebra;

pub mod algebra;
pub mod algebraic_ops;
pub mod dual_number;
pub mod error;
pub mod inertia;
pub mod motor;
pub mod ops;
pub mod primitives;
pub mod robot;
pub mod rotor;
pub mod scalar;
pub mod similarity;
pub mod translator;
pub mod wrench;

pub use algebra::*;
pub use algebraic_ops::*;
pub use dual_number::DualNumber;
pub use error::{Error, Result};
pub use inertia::Inertia;
pub use ops::*;
pub use scalar::*;

mod test;
