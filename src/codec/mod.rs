//! Compact integer encoding of operations for embedding in static tables.
//!
//! A rotation with entries in $`\{-1, 0, 1\}`$ is packed as nine ternary digits, most
//! significant first, into $`[0, 3^9)`$. A translation with components in multiples of
//! $`1/12`$ is packed as $`12^2 x + 12 y + z`$ into $`[0, 12^3)`$. A symmetry operation is
//! encoded as `translation_code * 3^9 + rotation_code`, and a magnetic operation adds
//! $`3^9 \cdot 12^3`$ if it carries time reversal.

use std::error::Error;
use std::fmt;

use nalgebra::{Matrix3, Vector3};
use num::rational::Rational64;

use crate::operation::{Operation, DENOMINATOR};


/// The number of distinct rotation codes, $`3^9`$.
pub const ROTATION_CODE_COUNT: u32 = 19_683;

/// The number of distinct translation codes, $`12^3`$.
pub const TRANSLATION_CODE_COUNT: u32 = 1_728;

/// The offset added to the code of a time-reversed operation, $`3^9 \cdot 12^3`$.
pub const TIME_REVERSAL_OFFSET: u32 = ROTATION_CODE_COUNT * TRANSLATION_CODE_COUNT;

// =================
// Error definitions
// =================

/// Error for an operation outside the representable domain of the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRangeError {
    /// A description of the offending component.
    pub reason: String,
}

impl fmt::Display for EncodeRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Encode range error: {}.", self.reason)
    }
}

impl Error for EncodeRangeError {}

// =========
// Functions
// =========

/// Encodes a rotation matrix.
///
/// # Errors
///
/// Errors if any entry lies outside $`\{-1, 0, 1\}`$.
pub fn encode_rotation(rotation: &Matrix3<i32>) -> Result<u32, EncodeRangeError> {
    let mut code = 0;
    for i in 0..3 {
        for j in 0..3 {
            let entry = rotation[(i, j)];
            if !(-1..=1).contains(&entry) {
                return Err(EncodeRangeError {
                    reason: format!("rotation entry ({i}, {j}) = {entry} is not in {{-1, 0, 1}}"),
                });
            }
            code = code * 3 + (entry + 1) as u32;
        }
    }
    Ok(code)
}

/// Decodes a rotation matrix, or returns `None` if `code` is not below $`3^9`$.
pub fn decode_rotation(code: u32) -> Option<Matrix3<i32>> {
    if code >= ROTATION_CODE_COUNT {
        return None;
    }
    let mut rotation = Matrix3::zeros();
    let mut rest = code;
    for k in (0..9).rev() {
        rotation[(k / 3, k % 3)] = (rest % 3) as i32 - 1;
        rest /= 3;
    }
    Some(rotation)
}

/// Encodes a translation, reduced modulo lattice translations.
///
/// # Errors
///
/// Errors if any component is not a multiple of $`1/12`$.
pub fn encode_translation(translation: &Vector3<Rational64>) -> Result<u32, EncodeRangeError> {
    let mut code = 0;
    for (i, component) in translation.iter().enumerate() {
        let scaled = *component * DENOMINATOR;
        if !scaled.is_integer() {
            return Err(EncodeRangeError {
                reason: format!("translation component {i} = {component} is not a multiple of 1/{DENOMINATOR}"),
            });
        }
        let digit = scaled.to_integer().rem_euclid(DENOMINATOR) as u32;
        code = code * DENOMINATOR as u32 + digit;
    }
    Ok(code)
}

/// Decodes a translation in $`[0, 1)`$, or returns `None` if `code` is not below $`12^3`$.
pub fn decode_translation(code: u32) -> Option<Vector3<Rational64>> {
    if code >= TRANSLATION_CODE_COUNT {
        return None;
    }
    let base = DENOMINATOR as u32;
    let numerators = [code / (base * base), (code / base) % base, code % base];
    Some(Vector3::from_iterator(
        numerators
            .into_iter()
            .map(|n| Rational64::new(i64::from(n), DENOMINATOR)),
    ))
}

/// Encodes the rotation and translation of an operation, ignoring time reversal.
///
/// # Errors
///
/// Errors if the rotation or the translation is outside the representable domain.
pub fn encode_symmetry(op: &Operation) -> Result<u32, EncodeRangeError> {
    let rotation_code = encode_rotation(op.linear())?;
    let translation_code = encode_translation(op.translation())?;
    Ok(translation_code * ROTATION_CODE_COUNT + rotation_code)
}

/// Decodes an operation without time reversal, or returns `None` if `code` is not below
/// $`3^9 \cdot 12^3`$.
pub fn decode_symmetry(code: u32) -> Option<Operation> {
    let linear = decode_rotation(code % ROTATION_CODE_COUNT)?;
    let translation = decode_translation(code / ROTATION_CODE_COUNT)?;
    Some(Operation::new(linear, translation, false))
}

/// Encodes an operation including its time-reversal flag.
///
/// # Errors
///
/// Errors if the rotation or the translation is outside the representable domain, or if the
/// code would not fit in a signed 32-bit integer.
pub fn encode_magnetic_operation(op: &Operation) -> Result<u32, EncodeRangeError> {
    let code = encode_symmetry(op)?
        + if op.time_reversal() {
            TIME_REVERSAL_OFFSET
        } else {
            0
        };
    if i32::try_from(code).is_err() {
        return Err(EncodeRangeError {
            reason: format!("magnetic operation code {code} does not fit in 31 bits"),
        });
    }
    Ok(code)
}

/// Decodes an operation including its time-reversal flag, or returns `None` if `code` is not
/// below $`2 \cdot 3^9 \cdot 12^3`$.
pub fn decode_magnetic_operation(code: u32) -> Option<Operation> {
    let time_reversal = code >= TIME_REVERSAL_OFFSET;
    let symmetry_code = if time_reversal {
        code - TIME_REVERSAL_OFFSET
    } else {
        code
    };
    decode_symmetry(symmetry_code).map(|op| op.with_time_reversal(time_reversal))
}
