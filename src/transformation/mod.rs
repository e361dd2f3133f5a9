//! Changes of basis between crystallographic settings.

use std::error::Error;
use std::fmt;

use indexmap::IndexSet;
use itertools::Itertools;
use nalgebra::{Matrix3, Vector3};
use num::rational::Rational64;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::operation::{
    rational_determinant, rational_inverse, to_integer_matrix, to_rational_matrix, Operation,
};

pub mod setting;

#[cfg(test)]
#[path = "transformation_tests.rs"]
mod transformation_tests;

// =================
// Error definitions
// =================

/// Enumerated type for failures of a change of basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformationError {
    /// The transformed coset does not have the size implied by the determinant of the
    /// transformation.
    IndexMismatch {
        /// The expected index $`1/|\det \mathbf{P}|`$.
        index: usize,

        /// The number of operations before the transformation.
        original_order: usize,

        /// The number of distinct operations after the transformation.
        transformed_order: usize,
    },

    /// The conjugated linear part of an operation is not an integer matrix.
    NonIntegralLinearPart(String),

    /// The linear part of the transformation is singular.
    SingularLinearPart,

    /// The Hall number, ITA number, or setting choice is not recognised.
    UnknownSetting(String),
}

impl fmt::Display for TransformationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexMismatch {
                index,
                original_order,
                transformed_order,
            } => write!(
                f,
                "Transformation error: {transformed_order} distinct operation(s) × index {index} ≠ {original_order} original operation(s)."
            ),
            Self::NonIntegralLinearPart(op) => write!(
                f,
                "Transformation error: the conjugated linear part of `{op}` is not integral."
            ),
            Self::SingularLinearPart => {
                write!(f, "Transformation error: the linear part is singular.")
            }
            Self::UnknownSetting(setting) => {
                write!(f, "Transformation error: unknown setting `{setting}`.")
            }
        }
    }
}

impl Error for TransformationError {}

// ======================================
// Struct definitions and implementations
// ======================================

/// A structure to represent a change of basis $`(\mathbf{P}, \mathbf{p})`$.
///
/// The basis vectors change as
/// $`(\mathbf{a}', \mathbf{b}', \mathbf{c}') = (\mathbf{a}, \mathbf{b}, \mathbf{c})\mathbf{P}`$,
/// and $`\mathbf{p}`$ is the new origin expressed in the old basis. Fractional coordinates then
/// change as $`\mathbf{x}' = (\mathbf{P}, \mathbf{p})^{-1}\mathbf{x}`$.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transformation {
    /// The linear part $`\mathbf{P}`$. Always non-singular.
    linear: Matrix3<Rational64>,

    /// The origin shift $`\mathbf{p}`$.
    origin_shift: Vector3<Rational64>,
}

impl Transformation {
    /// Constructs a transformation from its linear part and origin shift.
    ///
    /// # Errors
    ///
    /// Errors if `linear` is singular.
    pub fn new(
        linear: Matrix3<Rational64>,
        origin_shift: Vector3<Rational64>,
    ) -> Result<Self, TransformationError> {
        if rational_determinant(&linear).is_zero() {
            return Err(TransformationError::SingularLinearPart);
        }
        Ok(Self {
            linear,
            origin_shift,
        })
    }

    /// Constructs a transformation with an integer linear part and no origin shift.
    ///
    /// # Errors
    ///
    /// Errors if `linear` is singular.
    pub fn from_integer_linear(linear: &Matrix3<i32>) -> Result<Self, TransformationError> {
        Self::new(to_rational_matrix(linear), Vector3::zeros())
    }

    /// The identity transformation.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            linear: Matrix3::identity(),
            origin_shift: Vector3::zeros(),
        }
    }

    /// The linear part.
    pub fn linear(&self) -> &Matrix3<Rational64> {
        &self.linear
    }

    /// The origin shift.
    pub fn origin_shift(&self) -> &Vector3<Rational64> {
        &self.origin_shift
    }

    /// The determinant of the linear part, *i.e.* the volume ratio of the new cell to the old.
    pub fn determinant(&self) -> Rational64 {
        rational_determinant(&self.linear)
    }

    fn inverse_linear(&self) -> Result<Matrix3<Rational64>, TransformationError> {
        rational_inverse(&self.linear).ok_or(TransformationError::SingularLinearPart)
    }

    /// Computes the inverse $`(\mathbf{P}^{-1}, -\mathbf{P}^{-1}\mathbf{p})`$.
    ///
    /// # Errors
    ///
    /// Errors if the linear part is singular, which cannot happen for a transformation built
    /// through [`Self::new`].
    pub fn inverse(&self) -> Result<Self, TransformationError> {
        let inv_linear = self.inverse_linear()?;
        let origin_shift = -(inv_linear * self.origin_shift);
        Ok(Self {
            linear: inv_linear,
            origin_shift,
        })
    }

    /// Composes this transformation with `other`, with `self` applied first:
    /// $`(\mathbf{P}, \mathbf{p})(\mathbf{Q}, \mathbf{q}) = (\mathbf{PQ}, \mathbf{Pq} + \mathbf{p})`$.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            linear: self.linear * other.linear,
            origin_shift: self.linear * other.origin_shift + self.origin_shift,
        }
    }

    /// Conjugates a single operation into the new setting:
    /// $`(\mathbf{W}, \mathbf{w}) \to (\mathbf{P}^{-1}\mathbf{W}\mathbf{P},
    /// \mathbf{P}^{-1}(\mathbf{W}\mathbf{p} + \mathbf{w} - \mathbf{p}))`$.
    /// Time reversal is carried over unchanged, and the translation is not reduced.
    ///
    /// # Errors
    ///
    /// Errors if the conjugated linear part is not an integer matrix.
    pub fn transform_operation(&self, op: &Operation) -> Result<Operation, TransformationError> {
        let inv_linear = self.inverse_linear()?;
        self.conjugate(op, &inv_linear)
    }

    fn conjugate(
        &self,
        op: &Operation,
        inv_linear: &Matrix3<Rational64>,
    ) -> Result<Operation, TransformationError> {
        let w = op.rational_linear();
        let linear = to_integer_matrix(&(inv_linear * w * self.linear))
            .ok_or_else(|| TransformationError::NonIntegralLinearPart(op.to_string()))?;
        let translation =
            inv_linear * (w * self.origin_shift + op.translation() - self.origin_shift);
        Ok(Operation::new(linear, translation, op.time_reversal()))
    }

    /// Conjugates every operation of a coset into the new setting and reduces the translations
    /// modulo lattice translations of the new setting.
    ///
    /// When the new cell is smaller by an integral factor $`k = 1/|\det \mathbf{P}|`$,
    /// operations differing only by lost centering translations collapse. The result is then
    /// de-duplicated with the identity first, and must contain exactly $`1/k`$ of the original
    /// operations.
    ///
    /// # Errors
    ///
    /// Errors if a conjugated linear part is not integral, or if the de-duplicated size does not
    /// match the index implied by the determinant.
    pub fn transform_coset(&self, coset: &[Operation]) -> Result<Vec<Operation>, TransformationError> {
        let inv_linear = self.inverse_linear()?;
        let transformed = coset
            .iter()
            .map(|op| self.conjugate(op, &inv_linear).map(|op| op.reduced()))
            .collect::<Result<Vec<_>, _>>()?;

        let det = self.determinant().abs();
        if det >= Rational64::one() {
            return Ok(transformed);
        }

        let index = det.recip();
        let index_mismatch = |transformed_order: usize| {
            let err = TransformationError::IndexMismatch {
                index: index.to_integer().unsigned_abs() as usize,
                original_order: coset.len(),
                transformed_order,
            };
            log::error!("{err}");
            err
        };
        if !index.is_integer() {
            return Err(index_mismatch(transformed.len()));
        }
        let k = index.to_integer().unsigned_abs() as usize;

        let mut deduplicated = IndexSet::from([Operation::identity()]);
        deduplicated.extend(transformed);
        if deduplicated.len() * k != coset.len() {
            return Err(index_mismatch(deduplicated.len()));
        }
        log::debug!(
            "Coset of order {} reduced to {} operation(s) under a transformation of index {k}.",
            coset.len(),
            deduplicated.len()
        );
        Ok(deduplicated.into_iter().collect())
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P = [{}], p = ({})",
            self.linear
                .row_iter()
                .map(|row| row.iter().join(" "))
                .join("; "),
            self.origin_shift.iter().join(", ")
        )
    }
}
