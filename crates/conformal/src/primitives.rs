//! Constructors and queries for the geometric primitives
//!
//! Round objects are built by wedging points together;
//! flat objects additionally wedge in the point at infinity.

use crate::algebra::*;
use crate::algebraic_ops::*;
use crate::error::{Error, Result};
use crate::scalar::*;

impl<T: Ring> Vector<T> {
    pub fn new(x: T, y: T, z: T) -> Vector<T> {
        Vector {
            e1: x,
            e2: y,
            e3: z,
        }
    }

    pub fn dot(self, r: Vector<T>) -> T {
        self | r
    }

    pub fn cross(self, r: Vector<T>) -> Vector<T> {
        Vector {
            e1: self.e2 * r.e3 - self.e3 * r.e2,
            e2: self.e3 * r.e1 - self.e1 * r.e3,
            e3: self.e1 * r.e2 - self.e2 * r.e1,
        }
    }
}

impl<T: Ring + Rational> Point<T> {
    /// The point at (x, y, z), with unit weight
    pub fn new(x: T, y: T, z: T) -> Point<T> {
        Point {
            e1: x,
            e2: y,
            e3: z,
            ei: (x * x + y * y + z * z) * T::one_half(),
            e0: T::one(),
        }
    }

    pub fn origin() -> Point<T> {
        Point::new(T::zero(), T::zero(), T::zero())
    }

    pub fn from_vector3(v: Vector<T>) -> Point<T> {
        Point::new(v.e1, v.e2, v.e3)
    }
}

impl<T: Ring> Point<T> {
    /// The point at infinity, ei
    pub fn infinity() -> Point<T> {
        Point {
            e1: T::zero(),
            e2: T::zero(),
            e3: T::zero(),
            ei: T::one(),
            e0: T::zero(),
        }
    }

    pub fn x(&self) -> T {
        self.e1
    }

    pub fn y(&self) -> T {
        self.e2
    }

    pub fn z(&self) -> T {
        self.e3
    }

    /// The Euclidean part, ignoring the weight
    pub fn euclidean(&self) -> Vector<T> {
        Vector::new(self.e1, self.e2, self.e3)
    }
}

impl<T: Real> Point<T> {
    /// Divide by the e0 weight so that the Euclidean coordinates can be read off
    pub fn unitized(self) -> Result<Point<T>> {
        if self.e0.abs() <= T::epsilon() {
            return Err(Error::ZeroNorm);
        }
        Ok(self * self.e0.recip())
    }

    /// Euclidean distance between two unit-weight points
    pub fn distance(self, r: Point<T>) -> T {
        // p · q = -½ |p - q|²
        (-(self | r) * T::from_integer(2)).abs().sqrt()
    }
}

impl<T: Ring> PointPair<T> {
    pub fn from_points(p1: Point<T>, p2: Point<T>) -> PointPair<T> {
        p1 ^ p2
    }
}

impl<T: Real> PointPair<T> {
    /// The first point of the pair (NaN for the zero pair)
    pub fn point1(self) -> Point<T> {
        self.endpoint(-T::one())
    }

    /// The second point of the pair (NaN for the zero pair)
    pub fn point2(self) -> Point<T> {
        self.endpoint(T::one())
    }

    // (T ± sqrt(T · T)) (ei ⌋ T)
    fn endpoint(self, sign: T) -> Point<T> {
        let d = (self | self).abs().sqrt();
        let contraction = Point::infinity() | self;
        let p: Point<T> = (self * contraction + contraction * (sign * d)).project();
        p * p.e0.recip()
    }
}

impl<T: Ring> Line<T> {
    pub fn from_points(p1: Point<T>, p2: Point<T>) -> Line<T> {
        (p1 ^ p2 ^ Point::infinity()).project()
    }
}

impl<T: Ring> Circle<T> {
    pub fn from_points(p1: Point<T>, p2: Point<T>, p3: Point<T>) -> Circle<T> {
        p1 ^ p2 ^ p3
    }

    /// The plane containing the circle, C ∧ ei
    pub fn plane(self) -> Plane<T> {
        (self ^ Point::infinity()).project()
    }
}

impl<T: Real> Circle<T> {
    /// The center, from the reflection of infinity in the circle (C ei C)
    pub fn center(self) -> Result<Point<T>> {
        let c: Point<T> = (self * Point::infinity() * self).project();
        c.unitized()
    }

    pub fn radius(self) -> Result<T> {
        let plane_squared_norm = self.plane().squared_norm();
        if plane_squared_norm.abs() <= T::epsilon() {
            return Err(Error::ZeroNorm);
        }
        Ok((self.squared_norm() / plane_squared_norm).abs().sqrt())
    }
}

impl<T: Ring> Plane<T> {
    pub fn from_points(p1: Point<T>, p2: Point<T>, p3: Point<T>) -> Plane<T> {
        (p1 ^ p2 ^ p3 ^ Point::infinity()).project()
    }

    /// The (unnormalized) normal direction
    pub fn normal(self) -> Vector<T> {
        let dual: Point<T> = self.dual().into();
        dual.euclidean()
    }
}

impl<T: Ring + Rational> Sphere<T> {
    /// The dual of the point `c - ½ r² ei`
    pub fn from_center_radius(center: Point<T>, radius: T) -> Sphere<T> {
        let dual_sphere = center - Point::infinity() * (radius * radius * T::one_half());
        dual_sphere.dual().into()
    }
}

impl<T: Ring> Sphere<T> {
    pub fn from_points(p1: Point<T>, p2: Point<T>, p3: Point<T>, p4: Point<T>) -> Sphere<T> {
        p1 ^ p2 ^ p3 ^ p4
    }
}

impl<T: Real> Sphere<T> {
    pub fn center(self) -> Result<Point<T>> {
        let s: Point<T> = self.dual().into();
        s.unitized()
            .map(|c| Point::new(c.e1, c.e2, c.e3))
    }

    pub fn radius(self) -> Result<T> {
        let s: Point<T> = self.dual().into();
        if s.e0.abs() <= T::epsilon() {
            return Err(Error::ZeroNorm);
        }
        let r2 = s.e1 * s.e1 + s.e2 * s.e2 + s.e3 * s.e3 - T::from_integer(2) * s.ei * s.e0;
        Ok(r2.abs().sqrt() / s.e0.abs())
    }
}
