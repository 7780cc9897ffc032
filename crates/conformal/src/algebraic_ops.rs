//! Low-level geometric algebra operations
//!
//! These traits are implemented by the [geometric_algebra](crate::geometric_algebra) macro
//! for every applicable combination of multivector types.
//! The products themselves are the standard operators:
//!
//! * `a * b` is the geometric product
//! * `a | b` is the inner product (grade `|s - t|` part of each blade pairing)
//! * `a ^ b` is the outer product (grade `s + t` part of each blade pairing)

/// The reverse operator Ã
///
/// A blade of grade k is multiplied by (-1)^(k(k-1)/2)
pub trait Reverse {
    fn reverse(self) -> Self;
}

/// The dual, right multiplication by the pseudoscalar e0123i
///
/// This maps a blade set onto its complement,
/// e.g. a [Sphere](crate::Sphere) onto the [Point](crate::Point) holding its center and radius.
pub trait Dual {
    type Output;
    fn dual(self) -> Self::Output;
}

/// The scalar part of X X̃
///
/// The conformal metric is not positive definite,
/// so this may be negative.
pub trait SquaredNorm<T> {
    fn squared_norm(self) -> T;
}

/// The commutator product ½(AB - BA)
///
/// On generators this is the Lie bracket.
pub trait Commutator<T> {
    type Output;
    fn commutator(self, r: T) -> Self::Output;
}

/// The sandwich product V X Ṽ, restricted to the blades of X
///
/// Implemented for every versor type acting on every geometric type.
pub trait Transform<T> {
    fn transform(self, r: T) -> T;
}

/// Keep the coefficients shared with the target type and drop the rest
pub trait Project<T> {
    fn project(self) -> T;
}

/// The stored coefficients of a multivector, in field order
///
/// Coefficients are read with the canonical blade orientation,
/// so they line up with `get` on any other type.
pub trait Coefficients<T> {
    /// Global blade index of each coefficient
    const BLADE_INDICES: &'static [usize];

    fn coefficient(&self, i: usize) -> T;
}
