//! Affine symmetry operations with exact rational translations.

use std::fmt;
use std::ops::Mul;

use itertools::Itertools;
use nalgebra::{Matrix3, Vector3};
use num::rational::Rational64;
use num_traits::{Inv, Pow, Signed, Zero};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "operation_tests.rs"]
mod operation_tests;

/// The denominator of fractional translations in space-group operation tables.
pub const DENOMINATOR: i64 = 12;

/// The largest order of a crystallographic rotation.
pub const MAX_ROTATION_ORDER: u32 = 6;

// ======================================
// Struct definitions and implementations
// ======================================

/// A structure to represent an affine symmetry operation $`(\mathbf{W}, \mathbf{w})`$ acting on
/// fractional coordinates, optionally combined with time reversal.
///
/// The linear part is an integer matrix and the translation is held as exact rationals, so
/// equality and hashing never involve floating-point comparisons. Two operations compare equal
/// only if their translations are identical; use [`Self::reduced`] or [`Self::is_equivalent`]
/// to compare modulo lattice translations.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    /// The linear part $`\mathbf{W}`$.
    linear: Matrix3<i32>,

    /// The translation part $`\mathbf{w}`$.
    translation: Vector3<Rational64>,

    /// Boolean indicating if this operation is composed with time reversal.
    time_reversal: bool,
}

impl Operation {
    /// Constructs an operation from its linear part, translation part, and time-reversal flag.
    #[must_use]
    pub fn new(linear: Matrix3<i32>, translation: Vector3<Rational64>, time_reversal: bool) -> Self {
        Self {
            linear,
            translation,
            time_reversal,
        }
    }

    /// Returns the identity operation.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros(), false)
    }

    /// Returns a pure translation.
    #[must_use]
    pub fn from_translation(translation: Vector3<Rational64>) -> Self {
        Self::new(Matrix3::identity(), translation, false)
    }

    /// Returns a pure linear operation without translation.
    #[must_use]
    pub fn from_linear(linear: Matrix3<i32>) -> Self {
        Self::new(linear, Vector3::zeros(), false)
    }

    /// The linear part of this operation.
    pub fn linear(&self) -> &Matrix3<i32> {
        &self.linear
    }

    /// The translation part of this operation.
    pub fn translation(&self) -> &Vector3<Rational64> {
        &self.translation
    }

    /// Returns `true` if this operation contains time reversal.
    pub fn time_reversal(&self) -> bool {
        self.time_reversal
    }

    /// The linear part of this operation as a rational matrix.
    pub fn rational_linear(&self) -> Matrix3<Rational64> {
        to_rational_matrix(&self.linear)
    }

    /// The determinant of the linear part.
    pub fn determinant(&self) -> i32 {
        integer_determinant(&self.linear)
    }

    /// Returns `true` if this is the identity: unit linear part, zero translation, and no time
    /// reversal.
    pub fn is_identity(&self) -> bool {
        self.linear == Matrix3::identity()
            && self.translation.iter().all(Zero::is_zero)
            && !self.time_reversal
    }

    /// Returns `true` if the linear part is the identity matrix.
    pub fn is_pure_translation(&self) -> bool {
        self.linear == Matrix3::identity()
    }

    /// Returns a copy of this operation with the translation reduced into $`[0, 1)`$ component
    /// by component.
    #[must_use]
    pub fn reduced(&self) -> Self {
        Self::new(
            self.linear,
            reduce_modulo_one(&self.translation),
            self.time_reversal,
        )
    }

    /// Returns `true` if this operation and `other` coincide modulo integer lattice
    /// translations.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.reduced() == other.reduced()
    }

    /// Returns a copy of this operation with its time-reversal flag replaced.
    #[must_use]
    pub fn with_time_reversal(mut self, time_reversal: bool) -> Self {
        self.time_reversal = time_reversal;
        self
    }

    /// Returns a copy of this operation with `shift` added to its translation.
    #[must_use]
    pub fn translated(&self, shift: &Vector3<Rational64>) -> Self {
        Self::new(self.linear, self.translation + shift, self.time_reversal)
    }

    /// Conjugates this operation by the pure translation $`(\mathbf{I}, \mathbf{v})`$, *i.e.*
    /// $`(\mathbf{W}, \mathbf{w}) \to (\mathbf{W}, \mathbf{w} + \mathbf{v} - \mathbf{W}\mathbf{v})`$.
    #[must_use]
    pub fn with_origin_shift(&self, shift: &Vector3<Rational64>) -> Self {
        let translation = self.translation + shift - self.rational_linear() * shift;
        Self::new(self.linear, translation, self.time_reversal)
    }

    /// Computes the inverse $`(\mathbf{W}^{-1}, -\mathbf{W}^{-1}\mathbf{w})`$.
    ///
    /// # Returns
    ///
    /// `None` if the linear part is not unimodular, in which case its inverse is not an integer
    /// matrix.
    pub fn inverse(&self) -> Option<Self> {
        let inv_linear = rational_inverse(&self.rational_linear())?;
        let linear = to_integer_matrix(&inv_linear)?;
        let translation = -(inv_linear * self.translation);
        Some(Self::new(linear, translation, self.time_reversal))
    }

    /// The order of the linear part, *i.e.* the smallest $`n`$ with $`\mathbf{W}^n = \mathbf{I}`$.
    ///
    /// # Returns
    ///
    /// `None` if no such $`n \le 6`$ exists, which cannot happen for a crystallographic linear
    /// part.
    pub fn rotation_order(&self) -> Option<u32> {
        let identity = Matrix3::<i32>::identity();
        let mut power = self.linear;
        for n in 1..=MAX_ROTATION_ORDER {
            if power == identity {
                return Some(n);
            }
            power *= self.linear;
        }
        None
    }
}

impl fmt::Display for Operation {
    /// Writes the operation in Jones' faithful notation, *e.g.* `-y,x-y,z+1/3`. A time-reversed
    /// operation has `,-1` appended.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = (0..3)
            .map(|i| {
                let mut row = String::new();
                for (j, coordinate) in ["x", "y", "z"].iter().enumerate() {
                    match self.linear[(i, j)] {
                        0 => {}
                        1 => {
                            if !row.is_empty() {
                                row.push('+');
                            }
                            row.push_str(coordinate);
                        }
                        -1 => {
                            row.push('-');
                            row.push_str(coordinate);
                        }
                        coeff => {
                            if coeff > 0 && !row.is_empty() {
                                row.push('+');
                            }
                            row.push_str(&format!("{coeff}{coordinate}"));
                        }
                    }
                }
                let t = self.translation[i];
                if t.is_positive() && !row.is_empty() {
                    row.push('+');
                }
                if !t.is_zero() {
                    row.push_str(&t.to_string());
                }
                if row.is_empty() {
                    row.push('0');
                }
                row
            })
            .join(",");
        if self.time_reversal {
            write!(f, "{rows},-1")
        } else {
            write!(f, "{rows}")
        }
    }
}

// ---
// Mul
// ---
impl Mul<&'_ Operation> for &Operation {
    type Output = Operation;

    /// Composes two operations, with `rhs` acting first.
    fn mul(self, rhs: &Operation) -> Self::Output {
        Operation::new(
            self.linear * rhs.linear,
            self.rational_linear() * rhs.translation + self.translation,
            self.time_reversal != rhs.time_reversal,
        )
    }
}

impl Mul<&'_ Operation> for Operation {
    type Output = Operation;

    fn mul(self, rhs: &Operation) -> Self::Output {
        &self * rhs
    }
}

impl Mul<Operation> for Operation {
    type Output = Operation;

    fn mul(self, rhs: Operation) -> Self::Output {
        &self * &rhs
    }
}

impl Mul<Operation> for &Operation {
    type Output = Operation;

    fn mul(self, rhs: Operation) -> Self::Output {
        self * &rhs
    }
}

// ---
// Inv
// ---
impl Inv for &Operation {
    type Output = Option<Operation>;

    fn inv(self) -> Self::Output {
        self.inverse()
    }
}

impl Inv for Operation {
    type Output = Option<Operation>;

    fn inv(self) -> Self::Output {
        self.inverse()
    }
}

// ---
// Pow
// ---
impl Pow<u32> for &Operation {
    type Output = Operation;

    fn pow(self, rhs: u32) -> Self::Output {
        (0..rhs).fold(Operation::identity(), |acc, _| self * acc)
    }
}

impl Pow<u32> for Operation {
    type Output = Operation;

    fn pow(self, rhs: u32) -> Self::Output {
        (&self).pow(rhs)
    }
}

// =========
// Functions
// =========

/// Reduces every component of a fractional vector into $`[0, 1)`$.
pub fn reduce_modulo_one(vector: &Vector3<Rational64>) -> Vector3<Rational64> {
    vector.map(|x| x - x.floor())
}

/// Constructs a fractional vector from numerators over [`DENOMINATOR`].
pub fn twelfths(numerators: [i64; 3]) -> Vector3<Rational64> {
    Vector3::from_iterator(
        numerators
            .into_iter()
            .map(|n| Rational64::new(n, DENOMINATOR)),
    )
}

/// Converts an integer matrix into a rational one.
pub(crate) fn to_rational_matrix(matrix: &Matrix3<i32>) -> Matrix3<Rational64> {
    matrix.map(|x| Rational64::from_integer(i64::from(x)))
}

/// Converts a rational matrix into an integer one.
///
/// # Returns
///
/// `None` if any entry is not an integer representable as an `i32`.
pub(crate) fn to_integer_matrix(matrix: &Matrix3<Rational64>) -> Option<Matrix3<i32>> {
    let entries = matrix
        .iter()
        .map(|x| {
            if x.is_integer() {
                i32::try_from(x.to_integer()).ok()
            } else {
                None
            }
        })
        .collect::<Option<Vec<i32>>>()?;
    Some(Matrix3::from_column_slice(&entries))
}

/// Cofactor of entry `(r, c)` of a $`3 \times 3`$ matrix. Cyclic index ordering absorbs the
/// sign.
fn cofactor(matrix: &Matrix3<Rational64>, r: usize, c: usize) -> Rational64 {
    let (r1, r2) = ((r + 1) % 3, (r + 2) % 3);
    let (c1, c2) = ((c + 1) % 3, (c + 2) % 3);
    matrix[(r1, c1)] * matrix[(r2, c2)] - matrix[(r1, c2)] * matrix[(r2, c1)]
}

/// Exact determinant of a rational $`3 \times 3`$ matrix.
pub(crate) fn rational_determinant(matrix: &Matrix3<Rational64>) -> Rational64 {
    (0..3)
        .map(|c| matrix[(0, c)] * cofactor(matrix, 0, c))
        .fold(Rational64::zero(), |acc, x| acc + x)
}

/// Exact inverse of a rational $`3 \times 3`$ matrix via its adjugate.
///
/// # Returns
///
/// `None` if the matrix is singular.
pub(crate) fn rational_inverse(matrix: &Matrix3<Rational64>) -> Option<Matrix3<Rational64>> {
    let det = rational_determinant(matrix);
    if det.is_zero() {
        return None;
    }
    Some(Matrix3::from_fn(|i, j| cofactor(matrix, j, i) / det))
}

/// Determinant of an integer $`3 \times 3`$ matrix.
pub(crate) fn integer_determinant(matrix: &Matrix3<i32>) -> i32 {
    matrix[(0, 0)] * (matrix[(1, 1)] * matrix[(2, 2)] - matrix[(1, 2)] * matrix[(2, 1)])
        - matrix[(0, 1)] * (matrix[(1, 0)] * matrix[(2, 2)] - matrix[(1, 2)] * matrix[(2, 0)])
        + matrix[(0, 2)] * (matrix[(1, 0)] * matrix[(2, 1)] - matrix[(1, 1)] * matrix[(2, 0)])
}
