//! Pure translations, `1 - ½ t ei`

use crate::algebra::*;
use crate::algebraic_ops::*;
use crate::scalar::*;

impl<T: Ring> DirectionVector<T> {
    pub fn new(x: T, y: T, z: T) -> DirectionVector<T> {
        DirectionVector {
            e1i: x,
            e2i: y,
            e3i: z,
        }
    }

    pub fn from_vector3(v: Vector<T>) -> DirectionVector<T> {
        DirectionVector::new(v.e1, v.e2, v.e3)
    }
}

impl<T: Ring + Rational> Translator<T> {
    pub fn identity() -> Translator<T> {
        Translator::from(T::one())
    }

    /// Translation exponentials are exact: no trigonometric terms
    pub fn exp(t: TranslatorGenerator<T>) -> Translator<T> {
        let half = -T::one_half();
        Translator {
            scalar: T::one(),
            e1i: half * t.e1i,
            e2i: half * t.e2i,
            e3i: half * t.e3i,
        }
    }

    /// Translation by (x, y, z)
    pub fn new(x: T, y: T, z: T) -> Translator<T> {
        Translator::exp(DirectionVector::new(x, y, z))
    }

    pub fn log(self) -> TranslatorGenerator<T> {
        let minus_two = -T::from_integer(2);
        DirectionVector {
            e1i: minus_two * self.e1i,
            e2i: minus_two * self.e2i,
            e3i: minus_two * self.e3i,
        }
    }

    pub fn translation(self) -> Vector<T> {
        let t = self.log();
        Vector::new(t.e1i, t.e2i, t.e3i)
    }

    pub fn apply<X>(self, x: X) -> X
    where
        Self: Transform<X>,
    {
        self.transform(x)
    }
}
