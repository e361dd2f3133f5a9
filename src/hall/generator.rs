//! Resolution of parsed generator descriptors into concrete operations.

use nalgebra::Vector3;
use num::rational::Rational64;

use crate::hall::hall_parser::GeneratorDescriptor;
use crate::hall::hall_tables::{glide_translation, rotation_matrix, TableLookupError};
use crate::operation::Operation;

impl GeneratorDescriptor {
    /// Resolves this descriptor into an operation.
    ///
    /// The linear part is the tabulated rotation (negated if improper). The translation is the
    /// sum of every screw fraction, placed along the rotation axis, and every glide vector.
    ///
    /// # Errors
    ///
    /// Errors if the rotation is not tabulated, or if a screw subscript is attached to a
    /// non-principal axis.
    pub fn resolve(&self) -> Result<Operation, TableLookupError> {
        let rotation = rotation_matrix(self.order, self.axis)?;
        let linear = if self.improper { -rotation } else { rotation };

        let mut translation = Vector3::<Rational64>::zeros();
        for &digit in self.screws.iter() {
            let index = self.axis.principal_index().ok_or_else(|| {
                TableLookupError::new(format!("{}{}{digit}", self.order, self.axis))
            })?;
            translation[index] += Rational64::new(i64::from(digit), i64::from(self.order));
        }
        for &letter in self.glides.iter() {
            translation += glide_translation(letter)?;
        }

        let op = Operation::new(linear, translation, self.time_reversal);
        log::trace!("Generator `{}` resolved as {op}.", self.token);
        Ok(op)
    }
}
